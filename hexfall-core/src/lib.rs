//! HEXFALL Core - Combat rules engine
//!
//! This crate provides the deterministic rules for HEXFALL's hex tactics
//! battles:
//! - Cube-coordinate hex algebra and the generated battlefield
//! - Copy-on-write board state with characters and tile effects
//! - Spatial queries (range, line of sight, reachability, pathfinding)
//! - Action resolution with patterns, pushes, statuses and combos
//! - Timer-based initiative and scripted enemy turns
//!
//! Every mutation goes through [`Rules`], which owns the seeded RNG and
//! records one [`Event`] per observable effect.

pub mod hex;
pub mod board;
pub mod config;
pub mod status;
pub mod entity;
pub mod state;
pub mod pattern;
pub mod action;
pub mod search;
pub mod roster;
pub mod event;
pub mod error;
pub mod rules;
pub mod initiative;
pub mod pipeline;
pub mod ai;
pub mod scenario;

// Re-exports for convenient access
pub use hex::{Hex, HexError, DIRECTIONS};
pub use board::{Board, Terrain, Tile};
pub use config::RulesConfig;
pub use status::{Element, StatusEffect, StatusKind};
pub use entity::{Behavior, Character, Entity, EntityId, MovementSpeed, MovementType, Side, TileEffect};
pub use state::{BoardState, Potential};
pub use pattern::TargetPattern;
pub use action::{Action, ActionKind, PatternAnchor, TargetCategory};
pub use roster::Archetype;
pub use event::Event;
pub use error::ActionError;
pub use rules::Rules;
pub use pipeline::{trigger, try_trigger, TargetSource};
