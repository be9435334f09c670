//! Scripted turns for non-player characters
//!
//! Each decision previews candidate actions on copies of the state and
//! commits the best one through the normal pipeline.

use crate::action::{Action, ActionKind};
use crate::entity::{Behavior, EntityId, Side};
use crate::event::Event;
use crate::hex::Hex;
use crate::pipeline::{self, side_of};
use crate::rules::Rules;
use crate::search::nearest_neighbor;
use crate::state::BoardState;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Extra score for finishing off a unit
const KILL_BONUS: i32 = 5;

/// Score per status landed on an opponent
const STATUS_VALUE: i32 = 1;

/// Damage to allies counts this many times against an action
const FRIENDLY_FIRE_WEIGHT: i32 = 2;

/// Ending the battle outweighs anything else
const WIN_VALUE: i32 = 1000;

/// Summoners stop summoning once their side leads by this many units
const SUMMON_MARGIN: usize = 2;

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// One scripted decision for `id` on its own turn. Does not end the turn.
pub fn act(rules: &mut Rules, state: BoardState, id: EntityId) -> BoardState {
    decide(rules, state, id, true)
}

/// Act out of turn on a command.
///
/// Runs with fresh per-turn flags and restores the commander's flags
/// afterwards. Commanded units never issue commands themselves.
pub fn act_commanded(rules: &mut Rules, mut state: BoardState, id: EntityId) -> BoardState {
    let saved = (state.has_moved, state.has_attacked);
    state.has_moved = false;
    state.has_attacked = false;
    let mut state = decide(rules, state, id, false);
    state.has_moved = saved.0;
    state.has_attacked = saved.1;
    state
}

/// Act for the active character, then pass the turn on
pub fn take_turn(rules: &mut Rules, state: BoardState) -> BoardState {
    let state = match state.active() {
        Some(id) => act(rules, state, id),
        None => state,
    };
    rules.advance_turn(state)
}

fn decide(rules: &mut Rules, state: BoardState, id: EntityId, allow_command: bool) -> BoardState {
    if state.is_over() {
        return state;
    }
    let Some(behavior) = state
        .character(id)
        .and_then(|e| e.as_character())
        .map(|c| c.behavior)
    else {
        return state;
    };
    tracing::trace!(actor = %id, ?behavior, "scripted decision");
    match behavior {
        Behavior::Manual => state,
        Behavior::Melee => melee(rules, state, id),
        Behavior::Skirmisher => skirmish(rules, state, id),
        Behavior::Summoner => summon(rules, state, id, allow_command),
    }
}

// ============================================================================
// BEHAVIOURS
// ============================================================================

fn melee(rules: &mut Rules, state: BoardState, id: EntityId) -> BoardState {
    let state = attack(rules, state, id);
    let state = approach(rules, state, id, 1);
    attack(rules, state, id)
}

/// Attack from range; close in only as far as the longest reach
fn skirmish(rules: &mut Rules, state: BoardState, id: EntityId) -> BoardState {
    let keep = state
        .character(id)
        .and_then(|e| e.as_character())
        .map(|c| {
            c.actions
                .iter()
                .filter(|a| is_offensive(a))
                .map(|a| pipeline::effective_range(c, a) as i32)
                .max()
                .unwrap_or(1)
        })
        .unwrap_or(1);
    let state = attack(rules, state, id);
    let state = approach(rules, state, id, keep);
    attack(rules, state, id)
}

fn summon(rules: &mut Rules, mut state: BoardState, id: EntityId, allow_command: bool) -> BoardState {
    let Some(entity) = state.character(id) else {
        return state;
    };
    let Some(character) = entity.as_character() else {
        return state;
    };
    let position = entity.position;
    let side = character.side;
    let command = character
        .actions
        .iter()
        .find(|a| matches!(a.kind, ActionKind::Command { .. }))
        .cloned();
    let spawn = character
        .actions
        .iter()
        .find(|a| matches!(a.kind, ActionKind::Spawn { .. }))
        .cloned();

    if allow_command {
        if let Some(action) = command {
            state = pipeline::trigger(rules, state, id, &action, &mut Some(position));
        }
    }
    let allies = state.side_members(side).count();
    let foes = state.side_members(side.opponent()).count();
    if !state.has_attacked && allies < foes + SUMMON_MARGIN {
        if let Some(action) = spawn {
            state = pipeline::trigger(rules, state, id, &action, &mut Some(position));
        }
    }
    skirmish(rules, state, id)
}

// ============================================================================
// ATTACKS
// ============================================================================

fn is_offensive(action: &Action) -> bool {
    !matches!(action.kind, ActionKind::Spawn { .. } | ActionKind::Command { .. })
        && (action.deals_damage() || action.status.is_some())
}

/// Net value of a previewed action for `side`
fn score(before: &BoardState, side: Side, events: &[Event]) -> i32 {
    let mut total = 0;
    for event in events {
        match event {
            Event::Damaged { id, amount, remaining } => match side_of(before, *id) {
                Some(s) if s == side => total -= amount * FRIENDLY_FIRE_WEIGHT,
                Some(_) => {
                    total += amount;
                    if *remaining <= 0 {
                        total += KILL_BONUS;
                    }
                }
                None => {}
            },
            Event::StatusApplied { id, .. } => match side_of(before, *id) {
                Some(s) if s == side => total -= STATUS_VALUE,
                Some(_) => total += STATUS_VALUE,
                None => {}
            },
            Event::GameOver { winner } if *winner == side => total += WIN_VALUE,
            Event::GameOver { .. } => total -= WIN_VALUE,
            _ => {}
        }
    }
    total
}

/// Highest-scoring offensive action and target, if any scores above zero
fn best_attack(rules: &Rules, state: &BoardState, id: EntityId) -> Option<(Action, Hex)> {
    if state.has_attacked {
        return None;
    }
    let entity = state.character(id)?;
    let character = entity.as_character()?;
    let mut best: Option<(i32, usize, Hex)> = None;

    for (index, action) in character.actions.iter().enumerate() {
        if !is_offensive(action) || (action.is_movement() && state.has_moved) {
            continue;
        }
        let mut targets: Vec<Hex> = pipeline::targets_for(rules, state, id, action)
            .into_keys()
            .collect();
        targets.sort();
        for target in targets {
            if target == entity.position && action.requires_displacement() {
                continue;
            }
            let Ok((_, events)) = pipeline::preview(rules, state, id, action, target) else {
                continue;
            };
            let value = score(state, character.side, &events);
            if value > 0 && best.map_or(true, |(top, _, _)| value > top) {
                best = Some((value, index, target));
            }
        }
    }

    let (value, index, target) = best?;
    tracing::debug!(actor = %id, action = %character.actions[index].name, %target, value, "attack chosen");
    Some((character.actions[index].clone(), target))
}

fn attack(rules: &mut Rules, state: BoardState, id: EntityId) -> BoardState {
    match best_attack(rules, &state, id) {
        Some((action, target)) => pipeline::trigger(rules, state, id, &action, &mut Some(target)),
        None => state,
    }
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Walk towards the closest opponent, stopping `keep` hexes away.
///
/// Melee units aim for the neighbour of the opponent nearest to them.
fn approach(rules: &mut Rules, state: BoardState, id: EntityId, keep: i32) -> BoardState {
    if state.has_moved || state.is_over() {
        return state;
    }
    let Some(entity) = state.character(id) else {
        return state;
    };
    let Some(character) = entity.as_character() else {
        return state;
    };
    let position = entity.position;
    let Some(foe) = state
        .side_members(character.side.opponent())
        .min_by_key(|e| (e.position.distance_to(position), e.id))
        .map(|e| e.position)
    else {
        return state;
    };
    let Some(walk) = character
        .actions
        .iter()
        .find(|a| a.kind == ActionKind::Move)
        .cloned()
    else {
        return state;
    };

    let goal = nearest_neighbor(position, foe);
    let rank = |hex: Hex| {
        if keep <= 1 {
            hex.distance_to(goal)
        } else {
            (hex.distance_to(foe) - keep).abs()
        }
    };
    let reachable = pipeline::targets_for(rules, &state, id, &walk);
    let Some((&destination, _)) = reachable
        .iter()
        .min_by_key(|&(&hex, &cost)| (rank(hex), cost, hex))
    else {
        return state;
    };
    if rank(destination) >= rank(position) {
        return state;
    }
    pipeline::trigger(rules, state, id, &walk, &mut Some(destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Terrain};
    use crate::config::RulesConfig;
    use crate::hex::DIRECTIONS;
    use crate::roster::Archetype;
    use crate::state::Potential;

    fn arena() -> BoardState {
        BoardState::new(Board::uniform(6, 6, Terrain::Ground), Potential::new(4, 10))
    }

    #[test]
    fn test_melee_attacks_adjacent() {
        let mut state = arena();
        let knight = state.add_entity(Archetype::Knight.build(Hex::ORIGIN, Side::Hero));
        let grunt = state.add_entity(Archetype::Grunt.build(DIRECTIONS[0], Side::Enemy));
        let mut rules = Rules::new(RulesConfig::default());
        let state = act(&mut rules, state, grunt);
        let target = state.entity(knight).unwrap();
        assert_eq!(target.health, target.max_health - 2);
        assert!(state.has_attacked);
    }

    #[test]
    fn test_melee_approaches() {
        let mut state = arena();
        let knight = state.add_entity(Archetype::Knight.build(DIRECTIONS[0] * 5, Side::Hero));
        let grunt = state.add_entity(Archetype::Grunt.build(Hex::ORIGIN, Side::Enemy));
        let mut rules = Rules::new(RulesConfig::default());
        let state = act(&mut rules, state, grunt);
        let grunt_at = state.entity(grunt).unwrap().position;
        let knight_at = state.entity(knight).unwrap().position;
        assert_eq!(grunt_at.distance_to(knight_at), 2);
        assert!(state.has_moved);
    }

    #[test]
    fn test_manual_does_nothing() {
        let mut state = arena();
        let knight = state.add_entity(Archetype::Knight.build(Hex::ORIGIN, Side::Hero));
        state.add_entity(Archetype::Grunt.build(DIRECTIONS[0], Side::Enemy));
        let mut rules = Rules::new(RulesConfig::default());
        let state = act(&mut rules, state, knight);
        assert!(!state.has_attacked && !state.has_moved);
        assert!(rules.events().is_empty());
    }

    #[test]
    fn test_commanded_keeps_flags() {
        let mut state = arena();
        state.add_entity(Archetype::Knight.build(Hex::ORIGIN, Side::Hero));
        let grunt = state.add_entity(Archetype::Grunt.build(DIRECTIONS[0], Side::Enemy));
        let mut rules = Rules::new(RulesConfig::default());
        let state = act_commanded(&mut rules, state, grunt);
        assert!(!state.has_attacked);
        assert!(rules
            .events()
            .iter()
            .any(|e| matches!(e, Event::Damaged { .. })));
    }

    #[test]
    fn test_take_turn_advances() {
        let mut state = arena();
        state.add_entity(Archetype::Knight.build_scripted(DIRECTIONS[3] * 3, Side::Hero));
        state.add_entity(Archetype::Grunt.build(DIRECTIONS[0] * 3, Side::Enemy));
        let mut rules = Rules::new(RulesConfig::default());
        let state = rules.advance_turn(state);
        let first = state.active().unwrap();
        let state = take_turn(&mut rules, state);
        assert_ne!(state.active(), Some(first));
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn test_score_penalises_friendly_fire() {
        let mut state = arena();
        let hero = state.add_entity(Archetype::Knight.build(Hex::ORIGIN, Side::Hero));
        let enemy = state.add_entity(Archetype::Grunt.build(DIRECTIONS[0], Side::Enemy));
        let events = vec![
            Event::Damaged { id: enemy, amount: 3, remaining: 5 },
            Event::Damaged { id: hero, amount: 2, remaining: 12 },
        ];
        assert_eq!(score(&state, Side::Hero, &events), 3 - 4);
    }
}
