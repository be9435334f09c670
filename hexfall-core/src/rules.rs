//! Rules provider: the only mutation surface
//!
//! Every mutator takes the current [`BoardState`] by value, returns its
//! successor and appends one [`Event`] per observable effect. Keep a
//! clone of the input if the original is still needed.

use crate::config::RulesConfig;
use crate::entity::{Entity, EntityId, Side, TileEffect};
use crate::event::Event;
use crate::hex::Hex;
use crate::initiative;
use crate::state::{BoardState, Potential};
use crate::status::{self, StatusEffect};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Context threaded through every rules call: constants, the seeded RNG
/// and the ordered notification log.
#[derive(Clone, Debug)]
pub struct Rules {
    config: RulesConfig,
    rng: ChaCha8Rng,
    events: Vec<Event>,
}

impl Rules {
    pub fn new(config: RulesConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the notification log
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Scratch context for non-committing evaluation.
    ///
    /// Shares nothing mutable with `self`: the RNG is cloned and the log
    /// starts empty.
    pub fn preview(&self) -> Rules {
        Rules {
            config: self.config.clone(),
            rng: self.rng.clone(),
            events: Vec::new(),
        }
    }

    pub(crate) fn mark(&self) -> usize {
        self.events.len()
    }

    /// Drop events emitted since `mark`
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.events.truncate(mark);
    }

    fn emit(&mut self, event: Event) {
        tracing::trace!(event = event.label(), "emit");
        self.events.push(event);
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.emit(Event::Message(text.into()));
    }

    /// Search budget for an actor: heroes draw on potential
    pub fn budget(&self, state: &BoardState, actor: EntityId) -> u32 {
        match state.character(actor).and_then(|e| e.side()) {
            Some(Side::Hero) => state.potential().current(),
            _ => self.config.enemy_budget,
        }
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Follow a path; tile effects trigger on the final hex
    pub fn move_entity(&mut self, mut state: BoardState, id: EntityId, path: Vec<Hex>) -> BoardState {
        let Some(&destination) = path.last() else {
            return state;
        };
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        entity.position = destination;
        self.emit(Event::Moved { id, path });
        self.resolve_tile_effect(state, id, destination)
    }

    /// Run a straight line; every tile effect on the way fires in order
    pub fn rush(&mut self, mut state: BoardState, id: EntityId, path: Vec<Hex>) -> BoardState {
        let Some(&destination) = path.last() else {
            return state;
        };
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        entity.position = destination;
        self.emit(Event::Moved { id, path: path.clone() });
        for hex in path {
            if state.entity(id).is_none() {
                break;
            }
            state = self.resolve_tile_effect(state, id, hex);
        }
        state
    }

    pub fn teleport(&mut self, mut state: BoardState, id: EntityId, to: Hex) -> BoardState {
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        let from = entity.position;
        entity.position = to;
        self.emit(Event::Teleported { id, from, to });
        self.resolve_tile_effect(state, id, to)
    }

    /// Exchange two entities' positions in one step
    pub fn swap(&mut self, mut state: BoardState, first: EntityId, second: EntityId) -> BoardState {
        let (Some(a), Some(b)) = (
            state.entity(first).map(|e| e.position),
            state.entity(second).map(|e| e.position),
        ) else {
            return state;
        };
        if let Some(e) = state.entity_mut(first) {
            e.position = b;
        }
        if let Some(e) = state.entity_mut(second) {
            e.position = a;
        }
        self.emit(Event::Swapped { first, second });
        state
    }

    /// Knock an entity along `direction` for up to `force` hexes.
    ///
    /// Leaving the map or hitting impassable terrain deals impact damage;
    /// hitting a unit deals collision damage to both. Slippery terrain
    /// doesn't spend force.
    pub fn push(&mut self, mut state: BoardState, id: EntityId, direction: Hex, force: u32) -> BoardState {
        let Some(entity) = state.character(id) else {
            return state;
        };
        let start = entity.position;
        let mut position = start;
        let mut remaining = force;
        let mut impact = false;
        let mut blocker = None;
        let mut guard = state.board().coords().len();

        while remaining > 0 && guard > 0 {
            guard -= 1;
            let next = position + direction;
            let Some(tile) = state.board().get(next) else {
                impact = true;
                break;
            };
            if !tile.walkable {
                impact = true;
                break;
            }
            if let Some(other) = state.occupant_at(next) {
                blocker = Some(other.id);
                break;
            }
            position = next;
            if !tile.terrain.is_slippery() {
                remaining -= 1;
            }
        }

        if position != start {
            if let Some(e) = state.entity_mut(id) {
                e.position = position;
            }
            self.emit(Event::Pushed { id, from: start, to: position });
            state = self.resolve_tile_effect(state, id, position);
        }
        if impact {
            let amount = self.config.impact_damage;
            state = self.damage(state, id, amount);
        }
        if let Some(other) = blocker {
            let amount = self.config.collision_damage;
            state = self.damage(state, id, amount);
            state = self.damage(state, other, amount);
        }
        state
    }

    // ========================================================================
    // HEALTH AND STATUS
    // ========================================================================

    /// Reduce health; entities at zero are removed
    pub fn damage(&mut self, mut state: BoardState, id: EntityId, amount: i32) -> BoardState {
        if amount <= 0 {
            return state;
        }
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        entity.health -= amount;
        let remaining = entity.health;
        self.emit(Event::Damaged { id, amount, remaining });
        if remaining <= 0 {
            state = self.remove_entity(state, id);
        }
        state
    }

    pub fn heal(&mut self, mut state: BoardState, id: EntityId, amount: i32) -> BoardState {
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        let before = entity.health;
        entity.health = (entity.health + amount.max(0)).min(entity.max_health);
        let healed = entity.health - before;
        let remaining = entity.health;
        if healed > 0 {
            self.emit(Event::Healed { id, amount: healed, remaining });
        }
        state
    }

    /// Clone a status onto the target's list
    pub fn apply_status(&mut self, mut state: BoardState, id: EntityId, effect: &StatusEffect) -> BoardState {
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        entity.statuses.push(effect.clone());
        self.emit(Event::StatusApplied { id, status: effect.name.clone() });
        state
    }

    /// Detonate the target's statuses.
    ///
    /// Strips every effect sharing the first effect's element and returns
    /// how many stacks went. Heroes earn potential for it.
    pub fn combo(&mut self, mut state: BoardState, actor: EntityId, target: EntityId) -> (BoardState, u32) {
        let Some(entity) = state.entity_mut(target) else {
            return (state, 0);
        };
        let Some((element, stacks)) = status::strip_first_category(&mut entity.statuses) else {
            return (state, 0);
        };
        tracing::debug!(%target, ?element, stacks, "combo detonated");
        self.emit(Event::Combo { target, element, stacks });
        let hero = state
            .character(actor)
            .and_then(|e| e.side())
            .is_some_and(|s| s == Side::Hero);
        if hero {
            let gain = self.config.combo_potential_gain;
            state = self.gain_potential(state, gain);
        }
        (state, stacks)
    }

    // ========================================================================
    // POTENTIAL
    // ========================================================================

    pub fn gain_potential(&mut self, state: BoardState, amount: u32) -> BoardState {
        let after = state.potential().gain(amount);
        self.set_potential(state, after)
    }

    pub fn lose_potential(&mut self, state: BoardState, amount: u32) -> BoardState {
        let after = state.potential().lose(amount);
        self.set_potential(state, after)
    }

    fn shift_potential(&mut self, state: BoardState, delta: i32) -> BoardState {
        let after = state.potential().shift(delta);
        self.set_potential(state, after)
    }

    fn set_potential(&mut self, mut state: BoardState, after: Potential) -> BoardState {
        let before = state.potential();
        if after != before {
            state.set_potential(after);
            self.emit(Event::PotentialChanged { from: before.current(), to: after.current() });
        }
        state
    }

    // ========================================================================
    // ENTITIES
    // ========================================================================

    pub fn add_entity(&mut self, mut state: BoardState, entity: Entity) -> (BoardState, EntityId) {
        let name = entity.name.clone();
        let at = entity.position;
        let id = state.add_entity(entity);
        self.emit(Event::Spawned { id, name, at });
        (state, id)
    }

    pub fn remove_entity(&mut self, mut state: BoardState, id: EntityId) -> BoardState {
        let Some(removed) = state.remove_entity(id) else {
            return state;
        };
        self.emit(Event::Removed { id });
        if removed.as_character().is_some() {
            tracing::debug!(%id, name = %removed.name, "character removed");
            state = self.check_victory(state);
        }
        state
    }

    fn check_victory(&mut self, mut state: BoardState) -> BoardState {
        if state.is_over() {
            return state;
        }
        let heroes = state.side_members(Side::Hero).count();
        let enemies = state.side_members(Side::Enemy).count();
        let winner = match (heroes, enemies) {
            (0, _) => Side::Enemy,
            (_, 0) => Side::Hero,
            _ => return state,
        };
        state.set_winner(winner);
        self.emit(Event::GameOver { winner });
        state
    }

    /// Drop a tile effect on an empty, walkable, effect-free hex
    pub fn create_tile_effect(&mut self, state: BoardState, effect: &TileEffect, at: Hex) -> BoardState {
        if !state.is_landable(at) || state.tile_effect_at(at).is_some() {
            return state;
        }
        let (state, _) = self.add_entity(state, Entity::tile_effect(at, effect.clone()));
        state
    }

    /// Fire and consume the tile effect under `victim`, if any
    pub fn resolve_tile_effect(&mut self, state: BoardState, victim: EntityId, at: Hex) -> BoardState {
        let Some((effect_id, effect)) = state
            .tile_effect_at(at)
            .map(|(e, t)| (e.id, t.clone()))
        else {
            return state;
        };
        self.emit(Event::TileEffectTriggered { effect: effect_id, victim });
        let mut state = self.remove_entity(state, effect_id);
        if let Some(status) = &effect.status {
            state = self.apply_status(state, victim, status);
        }
        state = self.shift_potential(state, effect.potential);
        self.damage(state, victim, effect.damage)
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Record that the actor finished an action
    pub fn complete_action(
        &mut self,
        state: BoardState,
        actor: EntityId,
        action: &str,
        moved: bool,
        attacked: bool,
    ) -> BoardState {
        let state = self.mark_acted(state, moved, attacked);
        self.emit(Event::ActionCompleted { actor, action: action.to_string() });
        state
    }

    /// Set the per-turn flags without completing an action
    pub fn mark_acted(&mut self, mut state: BoardState, moved: bool, attacked: bool) -> BoardState {
        state.has_moved |= moved;
        state.has_attacked |= attacked;
        state
    }

    pub fn advance_turn(&mut self, state: BoardState) -> BoardState {
        initiative::advance(self, state)
    }

    /// Turn-start effects: damage over time. Returns whether the turn is
    /// skipped by freeze.
    pub(crate) fn start_of_turn(&mut self, state: BoardState, id: EntityId) -> (BoardState, bool) {
        let Some(entity) = state.character(id) else {
            return (state, false);
        };
        let dot = status::turn_start_damage(&entity.statuses);
        let frozen = status::is_frozen(&entity.statuses);
        self.emit(Event::TurnStarted { id });
        let state = self.damage(state, id, dot);
        if frozen && state.character(id).is_some() {
            self.emit(Event::TurnSkipped { id });
            return (state, true);
        }
        (state, false)
    }

    /// Turn-end effects: count down statuses and drop expired ones
    pub(crate) fn end_of_turn(&mut self, mut state: BoardState, id: EntityId) -> BoardState {
        let Some(entity) = state.entity_mut(id) else {
            return state;
        };
        let expired = status::tick_durations(&mut entity.statuses);
        for effect in expired {
            self.emit(Event::StatusRemoved { id, status: effect.name });
        }
        self.emit(Event::TurnEnded { id });
        state
    }
}
