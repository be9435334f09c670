//! End-to-end scripted battles

use std::collections::HashSet;

use hexfall_core::{ai, scenario, BoardState, Event, Rules, RulesConfig};

const TURN_LIMIT: u32 = 300;

fn run(seed: u64) -> (BoardState, Vec<Event>) {
    let mut rules = Rules::new(RulesConfig::default().with_seed(seed));
    let mut state = scenario::skirmish(&mut rules, true);
    while !state.is_over() && state.turn < TURN_LIMIT && state.active().is_some() {
        state = ai::take_turn(&mut rules, state);
        check_invariants(&state);
    }
    (state, rules.take_events())
}

fn check_invariants(state: &BoardState) {
    let potential = state.potential();
    assert!(potential.current() <= potential.max());

    let mut occupied = HashSet::new();
    for (entity, _) in state.characters() {
        assert!(entity.health > 0, "{} is dead but still on the board", entity.id);
        assert!(entity.health <= entity.max_health);
        assert!(state.board().contains(entity.position));
        assert!(occupied.insert(entity.position), "two units share {}", entity.position);
    }
}

#[test]
fn test_scripted_skirmish_terminates() {
    for seed in [1, 7, 42] {
        let (state, events) = run(seed);
        assert!(state.is_over() || state.turn >= TURN_LIMIT);
        if let Some(winner) = state.winner() {
            assert_eq!(state.side_members(winner.opponent()).count(), 0);
            assert!(events.iter().any(|e| matches!(e, Event::GameOver { .. })));
        }
        assert!(events.iter().any(|e| matches!(e, Event::ActionCompleted { .. })));
    }
}

#[test]
fn test_same_seed_same_battle() {
    let (a, events_a) = run(11);
    let (b, events_b) = run(11);
    assert_eq!(events_a, events_b);
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.winner(), b.winner());
}
