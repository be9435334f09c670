//! Board state snapshot (clone to mutate)

use crate::board::Board;
use crate::entity::{Character, Entity, EntityId, Side, TileEffect};
use crate::hex::Hex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared resource pool, always within `[0, max]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potential {
    current: u32,
    max: u32,
}

impl Potential {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn gain(self, amount: u32) -> Self {
        Self::new(self.current.saturating_add(amount), self.max)
    }

    pub fn lose(self, amount: u32) -> Self {
        Self::new(self.current.saturating_sub(amount), self.max)
    }

    /// Apply a signed delta
    pub fn shift(self, delta: i32) -> Self {
        if delta >= 0 {
            self.gain(delta as u32)
        } else {
            self.lose(delta.unsigned_abs())
        }
    }
}

/// Immutable-by-convention battlefield snapshot.
///
/// Cloning shares the tile map and deep-copies the entity list, so a
/// copy can be simulated freely without touching the original.
#[derive(Clone, Debug)]
pub struct BoardState {
    board: Arc<Board>,
    entities: Vec<Entity>,
    potential: Potential,
    active: Option<EntityId>,
    pub has_moved: bool,
    pub has_attacked: bool,
    /// Completed turns
    pub turn: u32,
    winner: Option<Side>,
    next_id: u32,
}

impl BoardState {
    pub fn new(board: Board, potential: Potential) -> Self {
        Self {
            board: Arc::new(board),
            entities: Vec::new(),
            potential,
            active: None,
            has_moved: false,
            has_attacked: false,
            turn: 0,
            winner: None,
            next_id: 1,
        }
    }

    /// Independent copy for previews and lookahead
    pub fn snapshot(&self) -> BoardState {
        self.clone()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn shares_board_with(&self, other: &BoardState) -> bool {
        Arc::ptr_eq(&self.board, &other.board)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn potential(&self) -> Potential {
        self.potential
    }

    pub fn active(&self) -> Option<EntityId> {
        self.active
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Entity lookup restricted to characters
    pub fn character(&self, id: EntityId) -> Option<&Entity> {
        self.entity(id).filter(|e| e.as_character().is_some())
    }

    pub fn characters(&self) -> impl Iterator<Item = (&Entity, &Character)> + '_ {
        self.entities
            .iter()
            .filter_map(|e| e.as_character().map(|c| (e, c)))
    }

    pub fn side_members(&self, side: Side) -> impl Iterator<Item = &Entity> + '_ {
        self.characters().filter(move |(_, c)| c.side == side).map(|(e, _)| e)
    }

    /// Character standing on a hex
    pub fn occupant_at(&self, hex: Hex) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.position == hex && e.blocks_movement)
    }

    pub fn tile_effect_at(&self, hex: Hex) -> Option<(&Entity, &TileEffect)> {
        self.entities
            .iter()
            .filter(|e| e.position == hex)
            .find_map(|e| e.as_tile_effect().map(|t| (e, t)))
    }

    /// Extra movement cost a tile effect adds to a hex
    pub fn effect_move_cost(&self, hex: Hex) -> u32 {
        self.tile_effect_at(hex).map(|(_, t)| t.move_cost).unwrap_or(0)
    }

    /// On the map, walkable and not occupied
    pub fn is_landable(&self, hex: Hex) -> bool {
        self.board.get(hex).is_some_and(|t| t.walkable) && self.occupant_at(hex).is_none()
    }

    // ========================================================================
    // MUTATION (through the rules context, or during setup)
    // ========================================================================

    /// Insert an entity with a fresh identifier
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.entity_mut(id).and_then(|e| e.as_character_mut())
    }

    pub(crate) fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub(crate) fn set_potential(&mut self, potential: Potential) {
        self.potential = potential;
    }

    pub fn set_active(&mut self, id: Option<EntityId>) {
        self.active = id;
    }

    pub(crate) fn set_winner(&mut self, side: Side) {
        self.winner = Some(side);
    }
}
