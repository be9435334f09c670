//! Timer-based initiative
//!
//! Every character carries a timer; the lowest acts next. After a turn
//! all timers are rebased so the actor sits at zero, then the actor's
//! cooldown is added back onto its own timer.

use crate::entity::EntityId;
use crate::rules::Rules;
use crate::state::BoardState;

/// Character with the lowest timer, ties going to the earlier entity
pub fn next_actor(state: &BoardState) -> Option<EntityId> {
    state
        .characters()
        .min_by_key(|(_, c)| c.timer)
        .map(|(e, _)| e.id)
}

/// Shift every timer so `actor` is at zero, then charge its cooldown
fn rebase(state: &mut BoardState, actor: EntityId) {
    let Some(offset) = state.character(actor).and_then(|e| e.as_character()).map(|c| c.timer) else {
        return;
    };
    let ids: Vec<EntityId> = state.characters().map(|(e, _)| e.id).collect();
    for id in ids {
        if let Some(character) = state.character_mut(id) {
            character.timer -= offset;
            if id == actor {
                character.timer += character.cooldown;
            }
        }
    }
}

/// End the active turn and start the next one.
///
/// Turn-end statuses tick for the finishing actor. The next actor takes
/// its turn-start damage; a frozen actor is skipped and the search moves
/// on, at most once per character.
pub fn advance(rules: &mut Rules, mut state: BoardState) -> BoardState {
    if state.is_over() {
        return state;
    }

    if let Some(current) = state.active().filter(|&id| state.character(id).is_some()) {
        rebase(&mut state, current);
        state = rules.end_of_turn(state, current);
    }
    state.turn += 1;
    state.has_moved = false;
    state.has_attacked = false;

    let attempts = state.characters().count();
    for _ in 0..=attempts {
        let Some(next) = next_actor(&state) else {
            state.set_active(None);
            return state;
        };
        state.set_active(Some(next));
        let (after, skipped) = rules.start_of_turn(state, next);
        state = after;
        if state.is_over() {
            return state;
        }
        if state.character(next).is_none() {
            // died to damage over time
            continue;
        }
        if !skipped {
            tracing::debug!(actor = %next, turn = state.turn, "turn started");
            return state;
        }
        rebase(&mut state, next);
        state = rules.end_of_turn(state, next);
    }
    state
}

/// Predict the next `count` actors without touching `state`.
///
/// Statuses are ignored, so frozen characters still appear.
pub fn forecast(state: &BoardState, count: usize) -> Vec<EntityId> {
    let mut scratch = state.snapshot();
    let mut order = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(next) = next_actor(&scratch) else {
            break;
        };
        order.push(next);
        rebase(&mut scratch, next);
    }
    order
}
