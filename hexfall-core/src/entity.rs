//! Entities: characters and hex-resident tile effects

use crate::action::Action;
use crate::hex::Hex;
use crate::status::{Element, StatusEffect};
use serde::{Deserialize, Serialize};

/// Stable identifier, preserved across state copies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Affiliation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Hero,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Hero => Side::Enemy,
            Side::Enemy => Side::Hero,
        }
    }
}

/// How a character interacts with occupied and impassable hexes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    /// Cannot pass any unit
    Blocked,
    /// May pass through allies
    PassAllies,
    /// May pass through enemies
    PassEnemies,
    /// May pass through any unit but not land on one
    PassAll,
    /// Passes through units and terrain barriers
    Phase,
}

impl MovementType {
    /// Can a mover of `side` travel through a hex occupied by `occupant`
    pub fn can_pass(self, side: Side, occupant: Side) -> bool {
        match self {
            MovementType::Blocked => false,
            MovementType::PassAllies => side == occupant,
            MovementType::PassEnemies => side != occupant,
            MovementType::PassAll | MovementType::Phase => true,
        }
    }

    pub fn ignores_terrain(self) -> bool {
        self == MovementType::Phase
    }
}

/// Incremental movement cost by search depth
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementSpeed {
    Slow,
    Normal,
    Fast,
}

const SLOW_CURVE: [u32; 8] = [0, 1, 1, 2, 2, 3, 3, 4];
const NORMAL_CURVE: [u32; 8] = [0, 0, 1, 1, 2, 2, 3, 3];
const FAST_CURVE: [u32; 8] = [0, 0, 0, 1, 1, 2, 2, 3];

impl MovementSpeed {
    /// Index 0 is the start hex; movement stops at the curve length
    pub fn curve(self) -> &'static [u32] {
        match self {
            MovementSpeed::Slow => &SLOW_CURVE,
            MovementSpeed::Normal => &NORMAL_CURVE,
            MovementSpeed::Fast => &FAST_CURVE,
        }
    }
}

/// Scripted turn procedure for non-player characters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Driven by external input
    Manual,
    /// Close in and hit the nearest opponent
    Melee,
    /// Attack from range, otherwise reposition
    Skirmisher,
    /// Prefer summoning and commanding allies
    Summoner,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Scales all outgoing damage
    pub power: f32,
    pub actions: Vec<Action>,
    pub movement: MovementType,
    pub speed: MovementSpeed,
    /// Added to every action's base range
    pub range_bonus: u32,
    /// Lower acts sooner; may be negative
    pub timer: i32,
    pub cooldown: i32,
    pub side: Side,
    pub behavior: Behavior,
}

impl Character {
    pub fn scale(&self, power: i32) -> i32 {
        (power as f32 * self.power).round() as i32
    }

    pub fn is_hero(&self) -> bool {
        self.side == Side::Hero
    }
}

/// One-shot trigger pinned to a hex
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEffect {
    pub name: String,
    pub element: Element,
    pub damage: i32,
    pub status: Option<StatusEffect>,
    /// Added to (or, if negative, taken from) the shared potential
    pub potential: i32,
    /// Extra movement cost for crossing the hex
    pub move_cost: u32,
}

impl TileEffect {
    pub fn fire() -> Self {
        Self {
            name: "Fire".to_string(),
            element: Element::Fire,
            damage: 2,
            status: Some(StatusEffect::burn(1, 2)),
            potential: 0,
            move_cost: 2,
        }
    }

    pub fn gust() -> Self {
        Self {
            name: "Gust".to_string(),
            element: Element::Wind,
            damage: 0,
            status: None,
            potential: 1,
            move_cost: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Character(Character),
    TileEffect(TileEffect),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: Hex,
    pub health: i32,
    pub max_health: i32,
    pub blocks_movement: bool,
    pub statuses: Vec<StatusEffect>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn character(name: &str, position: Hex, max_health: i32, character: Character) -> Self {
        Self {
            id: EntityId(0),
            name: name.to_string(),
            position,
            health: max_health,
            max_health,
            blocks_movement: true,
            statuses: Vec::new(),
            kind: EntityKind::Character(character),
        }
    }

    pub fn tile_effect(position: Hex, effect: TileEffect) -> Self {
        Self {
            id: EntityId(0),
            name: effect.name.clone(),
            position,
            health: 1,
            max_health: 1,
            blocks_movement: false,
            statuses: Vec::new(),
            kind: EntityKind::TileEffect(effect),
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match &self.kind {
            EntityKind::Character(c) => Some(c),
            EntityKind::TileEffect(_) => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            EntityKind::Character(c) => Some(c),
            EntityKind::TileEffect(_) => None,
        }
    }

    pub fn as_tile_effect(&self) -> Option<&TileEffect> {
        match &self.kind {
            EntityKind::TileEffect(t) => Some(t),
            EntityKind::Character(_) => None,
        }
    }

    pub fn side(&self) -> Option<Side> {
        self.as_character().map(|c| c.side)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
