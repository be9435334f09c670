//! Notification records for the presentation layer

use crate::entity::{EntityId, Side};
use crate::hex::Hex;
use crate::status::Element;
use serde::{Deserialize, Serialize};

/// One observable effect of a rules mutation, in emission order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Moved { id: EntityId, path: Vec<Hex> },
    Teleported { id: EntityId, from: Hex, to: Hex },
    Swapped { first: EntityId, second: EntityId },
    Damaged { id: EntityId, amount: i32, remaining: i32 },
    Healed { id: EntityId, amount: i32, remaining: i32 },
    StatusApplied { id: EntityId, status: String },
    StatusRemoved { id: EntityId, status: String },
    Combo { target: EntityId, element: Element, stacks: u32 },
    Pushed { id: EntityId, from: Hex, to: Hex },
    PotentialChanged { from: u32, to: u32 },
    Spawned { id: EntityId, name: String, at: Hex },
    Removed { id: EntityId },
    TileEffectTriggered { effect: EntityId, victim: EntityId },
    TurnStarted { id: EntityId },
    TurnSkipped { id: EntityId },
    TurnEnded { id: EntityId },
    ActionCompleted { actor: EntityId, action: String },
    Message(String),
    GameOver { winner: Side },
}

impl Event {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Event::Moved { .. } => "moved",
            Event::Teleported { .. } => "teleported",
            Event::Swapped { .. } => "swapped",
            Event::Damaged { .. } => "damaged",
            Event::Healed { .. } => "healed",
            Event::StatusApplied { .. } => "status_applied",
            Event::StatusRemoved { .. } => "status_removed",
            Event::Combo { .. } => "combo",
            Event::Pushed { .. } => "pushed",
            Event::PotentialChanged { .. } => "potential",
            Event::Spawned { .. } => "spawned",
            Event::Removed { .. } => "removed",
            Event::TileEffectTriggered { .. } => "tile_effect",
            Event::TurnStarted { .. } => "turn_started",
            Event::TurnSkipped { .. } => "turn_skipped",
            Event::TurnEnded { .. } => "turn_ended",
            Event::ActionCompleted { .. } => "action_completed",
            Event::Message(_) => "message",
            Event::GameOver { .. } => "game_over",
        }
    }
}
