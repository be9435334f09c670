//! Action resolution
//!
//! [`trigger`] is the single entry point: look up the actor, ask the
//! input for a target, validate it against the spatial queries, pay,
//! then dispatch on [`ActionKind`]. Rejections leave the state and the
//! event log exactly as they were.

use crate::action::{Action, ActionKind, PatternAnchor};
use crate::ai;
use crate::entity::{Behavior, Character, Entity, EntityId, Side};
use crate::error::ActionError;
use crate::event::Event;
use crate::hex::Hex;
use crate::rules::Rules;
use crate::search::{self, CostMap};
use crate::state::BoardState;
use crate::status;
use rand::seq::SliceRandom;

/// Supplies the target hex for an action; `None` cancels it.
///
/// Human input may block here until a click arrives. Scripted actors and
/// previews answer immediately.
pub trait TargetSource {
    fn target(&mut self, state: &BoardState, actor: EntityId, action: &Action) -> Option<Hex>;
}

/// A target chosen in advance
impl TargetSource for Option<Hex> {
    fn target(&mut self, _state: &BoardState, _actor: EntityId, _action: &Action) -> Option<Hex> {
        *self
    }
}

/// Base range plus the character's bonus. Movement ranges are exact
/// distances and take no bonus.
pub fn effective_range(character: &Character, action: &Action) -> u32 {
    if action.is_movement() {
        action.range
    } else {
        action.range + character.range_bonus
    }
}

/// Every legal target with the search cost of reaching it
pub fn targets_for(rules: &Rules, state: &BoardState, actor: EntityId, action: &Action) -> CostMap {
    let Some(character) = state.character(actor).and_then(|e| e.as_character()) else {
        return CostMap::default();
    };
    let budget = if character.is_hero() {
        rules.budget(state, actor).saturating_sub(action.cost)
    } else {
        rules.budget(state, actor)
    };
    search::valid_targets(
        state,
        actor,
        action.targeting,
        effective_range(character, action),
        budget,
    )
}

/// Run an action and commit it, or leave everything untouched.
///
/// Any rejection returns the input state and drops the events emitted
/// on the way.
pub fn trigger(
    rules: &mut Rules,
    state: BoardState,
    actor: EntityId,
    action: &Action,
    input: &mut dyn TargetSource,
) -> BoardState {
    match try_trigger(rules, &state, actor, action, input) {
        Ok(next) => next,
        Err(err) => {
            tracing::debug!(%actor, action = %action.name, %err, "action rejected");
            state
        }
    }
}

/// Like [`trigger`], reporting why an action was rejected
pub fn try_trigger(
    rules: &mut Rules,
    state: &BoardState,
    actor: EntityId,
    action: &Action,
    input: &mut dyn TargetSource,
) -> Result<BoardState, ActionError> {
    let mark = rules.mark();
    let result = resolve(rules, state, actor, action, input);
    if result.is_err() {
        rules.rollback(mark);
    }
    result
}

/// Evaluate an action against a copy, returning the would-be state and
/// its events. Neither the authoritative RNG nor its log is touched.
pub fn preview(
    rules: &Rules,
    state: &BoardState,
    actor: EntityId,
    action: &Action,
    target: Hex,
) -> Result<(BoardState, Vec<Event>), ActionError> {
    let mut scratch = rules.preview();
    let next = try_trigger(&mut scratch, state, actor, action, &mut Some(target))?;
    Ok((next, scratch.take_events()))
}

// ============================================================================
// RESOLUTION
// ============================================================================

fn resolve(
    rules: &mut Rules,
    state: &BoardState,
    actor: EntityId,
    action: &Action,
    input: &mut dyn TargetSource,
) -> Result<BoardState, ActionError> {
    if state.is_over() {
        return Err(ActionError::GameOver);
    }
    let entity = state
        .character(actor)
        .filter(|e| e.is_alive())
        .ok_or(ActionError::MissingActor(actor))?;
    let Some(character) = entity.as_character() else {
        return Err(ActionError::MissingActor(actor));
    };
    let origin = entity.position;
    let hero = character.is_hero();

    if action.is_movement() && status::is_immobilized(&entity.statuses) {
        return Err(ActionError::Immobilized(actor));
    }
    let available = state.potential().current();
    if hero && action.cost > available {
        return Err(ActionError::InsufficientPotential {
            needed: action.cost,
            available,
        });
    }

    let target = input
        .target(state, actor, action)
        .ok_or(ActionError::Cancelled)?;
    if target == origin && action.requires_displacement() {
        return Err(ActionError::TargetIsSelf);
    }
    let legal = targets_for(rules, state, actor, action);
    let &search_cost = legal.get(&target).ok_or(ActionError::IllegalTarget(target))?;

    let plan = plan(rules, state, actor, action, origin, target)?;

    let mut spend = action.cost;
    if matches!(action.kind, ActionKind::Move) {
        spend += search_cost;
    }
    let mut next = state.snapshot();
    if hero && spend > 0 {
        if spend > available {
            return Err(ActionError::InsufficientPotential {
                needed: spend,
                available,
            });
        }
        next = rules.lose_potential(next, spend);
    }

    let (mut next, moved, attacked) = match execute(rules, next, actor, action, origin, target, plan) {
        Outcome::Done { state, moved, attacked } => (state, moved, attacked),
        Outcome::Stalled(state) => return Ok(state),
    };

    if let Some(effect) = &action.tile_effect {
        if next.entity(actor).is_some_and(|e| e.position != origin) {
            next = rules.create_tile_effect(next, effect, origin);
        }
    }
    next = rules.complete_action(next, actor, &action.name, moved, attacked);

    if let Some(follow_up) = &action.follow_up {
        if next.character(actor).is_some() {
            next = trigger(rules, next, actor, follow_up, input);
        }
    }
    Ok(next)
}

/// Checks that must pass before anything is paid
enum Plan {
    Ready,
    Path(Vec<Hex>),
    Direction(Hex),
    Victim(EntityId),
    Spawn(Hex),
    Allies(Vec<EntityId>),
}

fn plan(
    rules: &mut Rules,
    state: &BoardState,
    actor: EntityId,
    action: &Action,
    origin: Hex,
    target: Hex,
) -> Result<Plan, ActionError> {
    match &action.kind {
        ActionKind::Attack | ActionKind::FixedMove | ActionKind::Repeat { .. } => Ok(Plan::Ready),
        ActionKind::Move => search::find_path(state, actor, target)
            .map(Plan::Path)
            .ok_or(ActionError::NoPath(target)),
        ActionKind::Line { .. } | ActionKind::Charge | ActionKind::Dash => origin
            .axis_direction_to(target)
            .map(Plan::Direction)
            .ok_or(ActionError::IllegalTarget(target)),
        ActionKind::Swap => state
            .occupant_at(target)
            .filter(|e| e.id != actor)
            .map(|e| Plan::Victim(e.id))
            .ok_or(ActionError::NoOccupant(target)),
        ActionKind::Spawn { .. } => origin
            .neighbors()
            .into_iter()
            .find(|&h| state.is_landable(h))
            .map(Plan::Spawn)
            .ok_or(ActionError::NoSpace),
        ActionKind::Command { count } => {
            let side = state.character(actor).and_then(|e| e.side());
            let eligible: Vec<EntityId> = state
                .characters()
                .filter(|(e, c)| {
                    e.id != actor && Some(c.side) == side && c.behavior != Behavior::Manual
                })
                .map(|(e, _)| e.id)
                .collect();
            if eligible.is_empty() {
                return Err(ActionError::NoAllies);
            }
            let chosen = eligible
                .choose_multiple(rules.rng(), *count)
                .copied()
                .collect();
            Ok(Plan::Allies(chosen))
        }
    }
}

enum Outcome {
    Done {
        state: BoardState,
        moved: bool,
        attacked: bool,
    },
    /// Paid for but stopped before completing
    Stalled(BoardState),
}

fn execute(
    rules: &mut Rules,
    state: BoardState,
    actor: EntityId,
    action: &Action,
    origin: Hex,
    target: Hex,
    plan: Plan,
) -> Outcome {
    let done = |state, moved, attacked| Outcome::Done { state, moved, attacked };
    match (&action.kind, plan) {
        (ActionKind::Move, Plan::Path(path)) => done(rules.move_entity(state, actor, path), true, false),

        (ActionKind::FixedMove, _) => done(rules.teleport(state, actor, target), true, false),

        (ActionKind::Attack, _) => {
            let hexes = pattern_hexes(action, origin, target);
            let victims = occupants(&state, actor, action, &hexes);
            let state = strike_all(rules, state, actor, action, &victims);
            done(push_all(rules, state, action, origin, target, &victims), false, true)
        }

        (ActionKind::Repeat { times }, _) => {
            let hexes = pattern_hexes(action, origin, target);
            let mut state = state;
            let mut struck = Vec::new();
            for _ in 0..*times {
                let victims = occupants(&state, actor, action, &hexes);
                state = strike_all(rules, state, actor, action, &victims);
                for id in victims {
                    if !struck.contains(&id) {
                        struck.push(id);
                    }
                }
            }
            done(push_all(rules, state, action, origin, target, &struck), false, true)
        }

        (ActionKind::Line { length }, Plan::Direction(direction)) => {
            let mut hexes = Vec::new();
            for step in 1..=*length as i32 {
                let hex = origin + direction * step;
                match state.board().get(hex) {
                    Some(tile) if !tile.blocks_los => hexes.push(hex),
                    _ => break,
                }
            }
            let victims = occupants(&state, actor, action, &hexes);
            let state = strike_all(rules, state, actor, action, &victims);
            done(push_all(rules, state, action, origin, target, &victims), false, true)
        }

        (ActionKind::Charge, Plan::Direction(direction)) => {
            charge(rules, state, actor, action, origin, target, direction)
        }

        (ActionKind::Dash, Plan::Direction(direction)) => {
            dash(rules, state, actor, action, origin, target, direction)
        }

        (ActionKind::Swap, Plan::Victim(victim)) => {
            let state = rules.swap(state, actor, victim);
            if is_spared(&state, actor, action, victim) {
                return done(state, true, false);
            }
            let state = strike(rules, state, actor, action, victim);
            done(state, true, true)
        }

        (ActionKind::Spawn { archetype }, Plan::Spawn(at)) => {
            let Some(caster) = state.character(actor).and_then(|e| e.as_character()) else {
                return done(state, false, false);
            };
            let mut summon = archetype.build(at, caster.side);
            let timer = caster.timer;
            if let Some(c) = summon.as_character_mut() {
                c.timer = timer + c.cooldown;
            }
            let (state, id) = rules.add_entity(state, summon);
            tracing::debug!(%actor, summoned = %id, "spawned {}", archetype.name());
            done(state, false, true)
        }

        (ActionKind::Command { .. }, Plan::Allies(allies)) => {
            let mut state = state;
            for ally in allies {
                if state.character(ally).is_some() {
                    rules.message(format!("{ally} answers the call"));
                    state = ai::act_commanded(rules, state, ally);
                }
            }
            done(state, false, true)
        }

        // plan() always pairs these kinds with their payload
        (_, _) => done(state, false, false),
    }
}

/// Rush along the axis as far as the target, stopping short of the
/// first unit in the way and hitting it. An unobstructed charge also
/// hits whatever stands one hex past the target.
///
/// Potential and flags are committed before the walk, so a charge whose
/// first hex is blocked stops paid for and unfinished.
fn charge(
    rules: &mut Rules,
    state: BoardState,
    actor: EntityId,
    action: &Action,
    origin: Hex,
    target: Hex,
    direction: Hex,
) -> Outcome {
    let mut state = rules.mark_acted(state, true, true);

    let distance = origin.distance_to(target);
    let mut path = Vec::new();
    let mut hit = None;
    for step in 1..=distance + 1 {
        let hex = origin + direction * step;
        if let Some(occupant) = state.occupant_at(hex) {
            hit = Some(occupant.id);
            break;
        }
        // the hex past the target is struck, never entered
        if step > distance {
            break;
        }
        let Some(tile) = state.board().get(hex) else {
            break;
        };
        if !tile.walkable {
            break;
        }
        path.push(hex);
        if tile.terrain.is_hard_stop() {
            break;
        }
    }

    if path.is_empty() && hit.is_none() {
        tracing::warn!(%actor, %target, "charge blocked at its first hex; cost already paid");
        return Outcome::Stalled(state);
    }
    if !path.is_empty() {
        state = rules.rush(state, actor, path);
    }
    let victims: Vec<EntityId> = hit
        .filter(|&id| !is_spared(&state, actor, action, id))
        .into_iter()
        .collect();
    if state.character(actor).is_some() {
        state = strike_all(rules, state, actor, action, &victims);
        let from = state.entity(actor).map_or(origin, |e| e.position);
        state = push_all(rules, state, action, from, from, &victims);
    }
    Outcome::Done {
        state,
        moved: true,
        attacked: true,
    }
}

/// Run through units along the axis up to the target, striking each and
/// landing on the last free hex before the target.
fn dash(
    rules: &mut Rules,
    mut state: BoardState,
    actor: EntityId,
    action: &Action,
    origin: Hex,
    target: Hex,
    direction: Hex,
) -> Outcome {
    let distance = origin.distance_to(target);
    let mut path = Vec::new();
    let mut landing = 0;
    let mut passed = Vec::new();
    for step in 1..=distance {
        let hex = origin + direction * step;
        let Some(tile) = state.board().get(hex) else {
            break;
        };
        if !tile.walkable {
            break;
        }
        match state.occupant_at(hex) {
            Some(occupant) => passed.push(occupant.id),
            None if step < distance => landing = path.len() + 1,
            None => {}
        }
        path.push(hex);
        if tile.terrain.is_hard_stop() {
            break;
        }
    }
    path.truncate(landing);
    let moved = !path.is_empty();
    if moved {
        state = rules.rush(state, actor, path);
    }
    let victims: Vec<EntityId> = passed
        .into_iter()
        .filter(|&id| !is_spared(&state, actor, action, id))
        .collect();
    if state.character(actor).is_some() {
        state = strike_all(rules, state, actor, action, &victims);
        state = push_all(rules, state, action, origin, target, &victims);
    }
    Outcome::Done {
        state,
        moved,
        attacked: !victims.is_empty(),
    }
}

// ============================================================================
// EFFECT APPLICATION
// ============================================================================

/// Pattern hexes, rotated to face the target
fn pattern_hexes(action: &Action, origin: Hex, target: Hex) -> Vec<Hex> {
    let pattern = action
        .pattern
        .oriented_towards(search::heading(origin, target));
    match action.anchor {
        PatternAnchor::Target => pattern.at(target),
        PatternAnchor::Caster => pattern.at(origin),
    }
}

fn is_spared(state: &BoardState, actor: EntityId, action: &Action, victim: EntityId) -> bool {
    let side = |id| state.character(id).and_then(Entity::side);
    action.ally_safe && side(victim).is_some() && side(victim) == side(actor)
}

/// Characters standing on `hexes` that the action may hit
fn occupants(state: &BoardState, actor: EntityId, action: &Action, hexes: &[Hex]) -> Vec<EntityId> {
    hexes
        .iter()
        .filter_map(|&h| state.occupant_at(h))
        .filter(|e| e.as_character().is_some())
        .map(|e| e.id)
        .filter(|&id| !is_spared(state, actor, action, id))
        .collect()
}

fn strike_all(
    rules: &mut Rules,
    mut state: BoardState,
    actor: EntityId,
    action: &Action,
    victims: &[EntityId],
) -> BoardState {
    for &victim in victims {
        state = strike(rules, state, actor, action, victim);
    }
    state
}

/// Damage, status, then combo on one unit
fn strike(rules: &mut Rules, state: BoardState, actor: EntityId, action: &Action, victim: EntityId) -> BoardState {
    let Some(attacker) = state.character(actor).and_then(|e| e.as_character()) else {
        return state;
    };
    let amount = attacker.scale(action.power);
    let mut state = rules.damage(state, victim, amount);
    if state.entity(victim).is_none() {
        return state;
    }
    if let Some(effect) = &action.status {
        state = rules.apply_status(state, victim, effect);
    }
    if let Some(combo) = &action.combo {
        state = detonate(rules, state, actor, combo, victim);
    }
    state
}

/// Strip the victim's first element and hit once per stack
fn detonate(rules: &mut Rules, state: BoardState, actor: EntityId, combo: &Action, victim: EntityId) -> BoardState {
    let (state, stacks) = rules.combo(state, actor, victim);
    if stacks == 0 {
        return state;
    }
    let Some(attacker) = state.character(actor).and_then(|e| e.as_character()) else {
        return state;
    };
    let amount = attacker.scale(combo.power * stacks as i32);
    let mut state = rules.damage(state, victim, amount);
    if let Some(effect) = &combo.status {
        if state.entity(victim).is_some() {
            state = rules.apply_status(state, victim, effect);
        }
    }
    state
}

/// Knock back every surviving victim. Units around a target-anchored
/// area are pushed away from its centre, anything else away from the
/// caster.
fn push_all(
    rules: &mut Rules,
    mut state: BoardState,
    action: &Action,
    caster: Hex,
    target: Hex,
    victims: &[EntityId],
) -> BoardState {
    if action.push == 0 {
        return state;
    }
    for &victim in victims {
        let Some(position) = state.character(victim).map(|e| e.position) else {
            continue;
        };
        let source = if action.anchor == PatternAnchor::Target && position != target {
            target
        } else {
            caster
        };
        if source == position {
            continue;
        }
        let direction = search::push_direction(source, position);
        state = rules.push(state, victim, direction, action.push);
    }
    state
}

/// Which side an event's subject was on, if it was a character
pub(crate) fn side_of(state: &BoardState, id: EntityId) -> Option<Side> {
    state.character(id).and_then(Entity::side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{self, TargetCategory};
    use crate::board::{Board, Terrain};
    use crate::config::RulesConfig;
    use crate::entity::TileEffect;
    use crate::hex::DIRECTIONS;
    use crate::roster::Archetype;
    use crate::state::Potential;
    use crate::status::StatusEffect;

    fn arena(potential: u32) -> BoardState {
        BoardState::new(Board::uniform(6, 6, Terrain::Ground), Potential::new(potential, 10))
    }

    fn place(state: &mut BoardState, archetype: Archetype, at: Hex, side: Side) -> EntityId {
        state.add_entity(archetype.build(at, side))
    }

    #[test]
    fn test_cancel_is_noop() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        place(&mut state, Archetype::Grunt, DIRECTIONS[0], Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, knight, &action::strike(3), &mut None::<Hex>);
        assert_eq!(result.unwrap_err(), ActionError::Cancelled);
        assert!(rules.events().is_empty());
    }

    #[test]
    fn test_missing_actor_is_noop() {
        let state = arena(5);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state.clone(), EntityId(99), &action::strike(1), &mut Some(Hex::ORIGIN));
        assert_eq!(next.entities().len(), state.entities().len());
        assert!(rules.events().is_empty());
    }

    #[test]
    fn test_self_target_rejected() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, knight, &action::strike(3), &mut Some(Hex::ORIGIN));
        assert_eq!(result.unwrap_err(), ActionError::TargetIsSelf);
    }

    #[test]
    fn test_strike_scales_with_power() {
        let mut state = arena(5);
        let pyro = place(&mut state, Archetype::Pyromancer, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[0] * 2, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, pyro, &action::fire_bolt(), &mut Some(DIRECTIONS[0] * 2));
        let victim = next.entity(grunt).unwrap();
        // power 2 at 1.5x
        assert_eq!(victim.health, victim.max_health - 3);
        assert_eq!(victim.statuses.len(), 1);
        assert!(next.has_attacked);
        assert!(rules
            .events()
            .iter()
            .any(|e| matches!(e, Event::ActionCompleted { .. })));
    }

    #[test]
    fn test_insufficient_potential() {
        let mut state = arena(0);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        place(&mut state, Archetype::Grunt, DIRECTIONS[0], Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, knight, &action::shield_bash(), &mut Some(DIRECTIONS[0]));
        assert!(matches!(result, Err(ActionError::InsufficientPotential { needed: 1, .. })));
    }

    #[test]
    fn test_illegal_target_rejected() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let far = DIRECTIONS[0] * 3;
        let result = try_trigger(&mut rules, &state, knight, &action::strike(3), &mut Some(far));
        assert_eq!(result.unwrap_err(), ActionError::IllegalTarget(far));
    }

    #[test]
    fn test_shield_bash_pushes_and_follows() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[0], Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, knight, &action::shield_bash(), &mut Some(DIRECTIONS[0]));
        assert_eq!(next.entity(grunt).unwrap().position, DIRECTIONS[0] * 3);
        assert_eq!(next.entity(knight).unwrap().position, DIRECTIONS[0]);
        assert_eq!(next.potential().current(), 4);
    }

    #[test]
    fn test_move_pays_search_cost() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        // normal curve: steps 1..=3 cost 0, 1, 1
        let goal = DIRECTIONS[2] * 3;
        let next = trigger(&mut rules, state, knight, &action::walk(), &mut Some(goal));
        assert_eq!(next.entity(knight).unwrap().position, goal);
        assert_eq!(next.potential().current(), 3);
        assert!(next.has_moved);
    }

    #[test]
    fn test_enemies_do_not_pay() {
        let mut state = arena(5);
        place(&mut state, Archetype::Knight, DIRECTIONS[3] * 4, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, Hex::ORIGIN, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, grunt, &action::walk(), &mut Some(DIRECTIONS[0] * 3));
        assert_eq!(next.entity(grunt).unwrap().position, DIRECTIONS[0] * 3);
        assert_eq!(next.potential().current(), 5);
    }

    #[test]
    fn test_immobilized_cannot_move() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        state.entity_mut(knight).unwrap().statuses.push(StatusEffect::chill(1));
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, knight, &action::walk(), &mut Some(DIRECTIONS[0]));
        assert_eq!(result.unwrap_err(), ActionError::Immobilized(knight));
    }

    #[test]
    fn test_flame_cone_faces_target() {
        let mut state = arena(5);
        let pyro = place(&mut state, Archetype::Pyromancer, Hex::ORIGIN, Side::Hero);
        let front = place(&mut state, Archetype::Grunt, DIRECTIONS[2], Side::Enemy);
        let behind = place(&mut state, Archetype::Grunt, DIRECTIONS[5], Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, pyro, &action::flame_cone(), &mut Some(DIRECTIONS[2]));
        let hit = next.entity(front).unwrap();
        assert!(hit.health < hit.max_health);
        let missed = next.entity(behind).unwrap();
        assert_eq!(missed.health, missed.max_health);
    }

    #[test]
    fn test_detonate_scales_with_stacks() {
        let mut state = arena(5);
        let pyro = place(&mut state, Archetype::Pyromancer, Hex::ORIGIN, Side::Hero);
        let knight = place(&mut state, Archetype::Knight, DIRECTIONS[0] * 2, Side::Enemy);
        {
            let target = state.entity_mut(knight).unwrap();
            target.statuses.push(StatusEffect::burn(1, 3));
            target.statuses.push(StatusEffect::burn(1, 3));
        }
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, pyro, &action::detonate(), &mut Some(DIRECTIONS[0] * 2));
        let target = next.entity(knight).unwrap();
        // 2 per stack, two stacks, 1.5x power
        assert_eq!(target.health, target.max_health - 6);
        assert!(target.statuses.is_empty());
        // paid 1, earned 1 back from the combo
        assert_eq!(next.potential().current(), 5);
    }

    #[test]
    fn test_charge_stops_before_unit() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[0] * 3, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, knight, &action::charge(), &mut Some(DIRECTIONS[0] * 3));
        assert_eq!(next.entity(knight).unwrap().position, DIRECTIONS[0] * 2);
        let victim = next.entity(grunt).unwrap();
        assert_eq!(victim.health, victim.max_health - 3);
        assert_eq!(victim.position, DIRECTIONS[0] * 4);
        assert!(next.has_moved && next.has_attacked);
    }

    #[test]
    fn test_charge_blocked_keeps_payment() {
        let board = Board::uniform(6, 6, Terrain::Ground).with_terrain(DIRECTIONS[0], Terrain::Wall);
        let mut state = BoardState::new(board, Potential::new(5, 10));
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let target = DIRECTIONS[0] * 3;
        let next = try_trigger(&mut rules, &state, knight, &action::charge(), &mut Some(target)).unwrap();
        assert_eq!(next.entity(knight).unwrap().position, Hex::ORIGIN);
        assert_eq!(next.potential().current(), 3);
        assert!(next.has_moved);
        assert!(!rules
            .events()
            .iter()
            .any(|e| matches!(e, Event::ActionCompleted { .. })));
    }

    #[test]
    fn test_dash_passes_through_and_leaves_fire() {
        let mut state = arena(5);
        let rogue = place(&mut state, Archetype::Rogue, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[1], Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let target = DIRECTIONS[1] * 3;
        let next = trigger(&mut rules, state, rogue, &action::dash(), &mut Some(target));
        assert_eq!(next.entity(rogue).unwrap().position, DIRECTIONS[1] * 2);
        let victim = next.entity(grunt).unwrap();
        assert_eq!(victim.health, victim.max_health - 1);
        let (_, fire) = next.tile_effect_at(Hex::ORIGIN).unwrap();
        assert_eq!(fire, &TileEffect::fire());
    }

    #[test]
    fn test_dash_triggers_fire_on_the_way() {
        let mut state = arena(5);
        let rogue = place(&mut state, Archetype::Rogue, Hex::ORIGIN, Side::Hero);
        state.add_entity(Entity::tile_effect(DIRECTIONS[1], TileEffect::fire()));
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, rogue, &action::dash(), &mut Some(DIRECTIONS[1] * 3));
        assert!(next.tile_effect_at(DIRECTIONS[1]).is_none());
        let runner = next.entity(rogue).unwrap();
        assert_eq!(runner.position, DIRECTIONS[1] * 2);
        assert_eq!(runner.health, runner.max_health - TileEffect::fire().damage);
        assert!(rules
            .events()
            .iter()
            .any(|e| matches!(e, Event::TileEffectTriggered { victim, .. } if *victim == rogue)));
    }

    #[test]
    fn test_charge_on_empty_line_lands_on_target() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let target = DIRECTIONS[0] * 3;
        let next = trigger(&mut rules, state, knight, &action::charge(), &mut Some(target));
        assert_eq!(next.entity(knight).unwrap().position, target);
        assert_eq!(next.potential().current(), 3);
    }

    #[test]
    fn test_charge_hits_one_past_target() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[0] * 4, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let target = DIRECTIONS[0] * 3;
        let next = trigger(&mut rules, state, knight, &action::charge(), &mut Some(target));
        assert_eq!(next.entity(knight).unwrap().position, target);
        let victim = next.entity(grunt).unwrap();
        assert_eq!(victim.health, victim.max_health - 3);
        assert_eq!(victim.position, DIRECTIONS[0] * 5);
    }

    #[test]
    fn test_swap_spares_allies() {
        let mut state = arena(5);
        let rogue = place(&mut state, Archetype::Rogue, Hex::ORIGIN, Side::Hero);
        let far = DIRECTIONS[4] * 3;
        let knight = place(&mut state, Archetype::Knight, far, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, rogue, &action::swap(), &mut Some(far));
        assert_eq!(next.entity(rogue).unwrap().position, far);
        let ally = next.entity(knight).unwrap();
        assert_eq!(ally.position, Hex::ORIGIN);
        assert_eq!(ally.health, ally.max_health);
        assert!(!rules
            .events()
            .iter()
            .any(|e| matches!(e, Event::Damaged { .. })));
        assert!(!next.has_attacked);
    }

    #[test]
    fn test_swap_exchanges_positions() {
        let mut state = arena(5);
        let rogue = place(&mut state, Archetype::Rogue, Hex::ORIGIN, Side::Hero);
        let far = DIRECTIONS[4] * 3;
        let grunt = place(&mut state, Archetype::Grunt, far, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, rogue, &action::swap(), &mut Some(far));
        assert_eq!(next.entity(rogue).unwrap().position, far);
        assert_eq!(next.entity(grunt).unwrap().position, Hex::ORIGIN);
        assert!(rules.events().contains(&Event::Swapped { first: rogue, second: grunt }));
    }

    #[test]
    fn test_swap_needs_occupant() {
        let mut state = arena(5);
        let rogue = place(&mut state, Archetype::Rogue, Hex::ORIGIN, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let empty = DIRECTIONS[4] * 2;
        let result = try_trigger(&mut rules, &state, rogue, &action::swap(), &mut Some(empty));
        assert_eq!(result.unwrap_err(), ActionError::NoOccupant(empty));
    }

    #[test]
    fn test_volley_repeats() {
        let mut state = arena(0);
        let archer = place(&mut state, Archetype::Archer, Hex::ORIGIN, Side::Enemy);
        let knight = place(&mut state, Archetype::Knight, DIRECTIONS[3] * 3, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, archer, &action::arrow_volley(), &mut Some(DIRECTIONS[3] * 3));
        let victim = next.entity(knight).unwrap();
        assert_eq!(victim.health, victim.max_health - 2);
    }

    #[test]
    fn test_spawn_next_to_caster() {
        let mut state = arena(0);
        let shaman = place(&mut state, Archetype::Shaman, Hex::ORIGIN, Side::Enemy);
        place(&mut state, Archetype::Knight, DIRECTIONS[3] * 4, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, shaman, &action::summon_imp(), &mut Some(Hex::ORIGIN));
        let imp = next.entities().last().unwrap();
        assert_eq!(imp.name, "Imp");
        assert_eq!(imp.position, DIRECTIONS[0]);
        assert_eq!(imp.side(), Some(Side::Enemy));
        let caster_timer = next.character(shaman).unwrap().as_character().unwrap().timer;
        let imp_character = imp.as_character().unwrap();
        assert_eq!(imp_character.timer, caster_timer + imp_character.cooldown);
    }

    #[test]
    fn test_spawn_without_space() {
        let mut state = arena(0);
        let shaman = place(&mut state, Archetype::Shaman, Hex::ORIGIN, Side::Enemy);
        for d in DIRECTIONS {
            place(&mut state, Archetype::Grunt, d, Side::Enemy);
        }
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, shaman, &action::summon_imp(), &mut Some(Hex::ORIGIN));
        assert_eq!(result.unwrap_err(), ActionError::NoSpace);
    }

    #[test]
    fn test_command_needs_allies() {
        let mut state = arena(0);
        let shaman = place(&mut state, Archetype::Shaman, Hex::ORIGIN, Side::Enemy);
        place(&mut state, Archetype::Knight, DIRECTIONS[3] * 4, Side::Hero);
        let mut rules = Rules::new(RulesConfig::default());
        let result = try_trigger(&mut rules, &state, shaman, &action::war_cry(), &mut Some(Hex::ORIGIN));
        assert_eq!(result.unwrap_err(), ActionError::NoAllies);
    }

    #[test]
    fn test_ally_safe_skips_friends() {
        let mut state = arena(5);
        let pyro = place(&mut state, Archetype::Pyromancer, Hex::ORIGIN, Side::Hero);
        let friend = place(&mut state, Archetype::Knight, DIRECTIONS[0] * 2, Side::Hero);
        place(&mut state, Archetype::Grunt, DIRECTIONS[3] * 4, Side::Enemy);
        let mut rules = Rules::new(RulesConfig::default());
        let next = trigger(&mut rules, state, pyro, &action::fire_bolt(), &mut Some(DIRECTIONS[0] * 2));
        let ally = next.entity(friend).unwrap();
        assert_eq!(ally.health, ally.max_health);
    }

    #[test]
    fn test_preview_leaves_authority_untouched() {
        let mut state = arena(5);
        let knight = place(&mut state, Archetype::Knight, Hex::ORIGIN, Side::Hero);
        let grunt = place(&mut state, Archetype::Grunt, DIRECTIONS[0], Side::Enemy);
        let rules = Rules::new(RulesConfig::default());
        let (next, events) = preview(&rules, &state, knight, &action::strike(3), DIRECTIONS[0]).unwrap();
        assert!(next.entity(grunt).unwrap().health < state.entity(grunt).unwrap().health);
        assert!(!events.is_empty());
        assert!(rules.events().is_empty());
        assert_eq!(state.entity(grunt).unwrap().health, state.entity(grunt).unwrap().max_health);
    }

    #[test]
    fn test_effective_range_bonus() {
        let cryo = Archetype::Cryomancer.build(Hex::ORIGIN, Side::Hero);
        let character = cryo.as_character().unwrap();
        assert_eq!(effective_range(character, &action::frost_lance()), 5);
        assert_eq!(effective_range(character, &action::blink()), 3);
        let lance = Action::new("Jab", ActionKind::Attack, TargetCategory::Axis, 2);
        assert_eq!(effective_range(character, &lance), 3);
    }
}
