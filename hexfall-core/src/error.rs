//! Action rejection reasons

use crate::entity::EntityId;
use crate::hex::Hex;

/// Why the pipeline declined to commit an action.
///
/// These are precondition failures, not faults: the public entry points
/// turn them into an unchanged state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("actor {0} is not a live character")]
    MissingActor(EntityId),

    #[error("targeting was cancelled")]
    Cancelled,

    #[error("action cannot target the actor's own hex")]
    TargetIsSelf,

    #[error("target {0} is not legal for this action")]
    IllegalTarget(Hex),

    #[error("needs {needed} potential, {available} available")]
    InsufficientPotential { needed: u32, available: u32 },

    #[error("actor {0} cannot move right now")]
    Immobilized(EntityId),

    #[error("no path to {0}")]
    NoPath(Hex),

    #[error("no unit at {0}")]
    NoOccupant(Hex),

    #[error("no free hex next to the caster")]
    NoSpace,

    #[error("no eligible allies to command")]
    NoAllies,

    #[error("the battle is already over")]
    GameOver,
}
