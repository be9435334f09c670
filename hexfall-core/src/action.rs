//! Action definitions
//!
//! An [`Action`] is a reusable, stateless description. Resolution lives in
//! [`crate::pipeline`].

use crate::entity::TileEffect;
use crate::pattern::TargetPattern;
use crate::roster::Archetype;
use crate::status::StatusEffect;
use serde::{Deserialize, Serialize};

/// Which hexes an action may target, resolved by the spatial queries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetCategory {
    Free,
    FreeIgnoreUnits,
    FreeIgnoreLos,
    Axis,
    AxisIgnoreUnits,
    AxisIgnoreLos,
    Move,
    FixedMove,
    AxisFixedMove,
}

/// Where an action's pattern is anchored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternAnchor {
    /// Centred on the chosen target
    Target,
    /// Centred on the caster, rotated to face the target
    Caster,
}

/// Variant-specific behaviour and payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Strike every hex of the pattern
    Attack,
    /// Strike a straight line of up to `length` hexes towards the target
    Line { length: u32 },
    /// Walk a path to the target
    Move,
    /// Jump straight to the target
    FixedMove,
    /// Rush along a line, stopping at the first unit
    Charge,
    /// Rush along a line through units, striking each
    Dash,
    /// Exchange places with the target unit
    Swap,
    /// Create a new unit next to the caster
    Spawn { archetype: Archetype },
    /// Strike the same hexes several times
    Repeat { times: u32 },
    /// Force allies to act immediately
    Command { count: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub kind: ActionKind,
    pub range: u32,
    pub power: i32,
    /// Potential spent on use
    pub cost: u32,
    pub targeting: TargetCategory,
    pub pattern: TargetPattern,
    pub anchor: PatternAnchor,
    pub status: Option<StatusEffect>,
    pub push: u32,
    /// Detonation applied to each struck unit
    pub combo: Option<Box<Action>>,
    /// Dropped on the cast origin once the caster has left it
    pub tile_effect: Option<TileEffect>,
    pub follow_up: Option<Box<Action>>,
    /// Skip units on the caster's side
    pub ally_safe: bool,
}

impl Action {
    pub fn new(name: &str, kind: ActionKind, targeting: TargetCategory, range: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            range,
            power: 0,
            cost: 0,
            targeting,
            pattern: TargetPattern::single(),
            anchor: PatternAnchor::Target,
            status: None,
            push: 0,
            combo: None,
            tile_effect: None,
            follow_up: None,
            ally_safe: true,
        }
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_pattern(mut self, pattern: TargetPattern, anchor: PatternAnchor) -> Self {
        self.pattern = pattern;
        self.anchor = anchor;
        self
    }

    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_push(mut self, force: u32) -> Self {
        self.push = force;
        self
    }

    pub fn with_combo(mut self, combo: Action) -> Self {
        self.combo = Some(Box::new(combo));
        self
    }

    pub fn with_tile_effect(mut self, effect: TileEffect) -> Self {
        self.tile_effect = Some(effect);
        self
    }

    pub fn with_follow_up(mut self, follow_up: Action) -> Self {
        self.follow_up = Some(Box::new(follow_up));
        self
    }

    pub fn hits_allies(mut self) -> Self {
        self.ally_safe = false;
        self
    }

    /// Targeting its own hex makes no sense for this action
    pub fn requires_displacement(&self) -> bool {
        !matches!(self.kind, ActionKind::Spawn { .. } | ActionKind::Command { .. })
    }

    /// Blocked while immobilized
    pub fn is_movement(&self) -> bool {
        matches!(
            self.kind,
            ActionKind::Move
                | ActionKind::FixedMove
                | ActionKind::Charge
                | ActionKind::Dash
                | ActionKind::Swap
        )
    }

    pub fn deals_damage(&self) -> bool {
        self.power > 0 || self.combo.is_some()
    }
}

// ============================================================================
// STOCK ACTIONS
// ============================================================================

pub fn walk() -> Action {
    Action::new("Walk", ActionKind::Move, TargetCategory::Move, 0)
}

pub fn strike(power: i32) -> Action {
    Action::new("Strike", ActionKind::Attack, TargetCategory::Free, 1).with_power(power)
}

/// Single step into an adjacent free hex
pub fn step() -> Action {
    Action::new("Step", ActionKind::FixedMove, TargetCategory::FixedMove, 1)
}

/// Knock the target back, then step into the vacated hex
pub fn shield_bash() -> Action {
    Action::new("Shield Bash", ActionKind::Attack, TargetCategory::Free, 1)
        .with_power(1)
        .with_push(2)
        .with_cost(1)
        .with_follow_up(step())
}

pub fn charge() -> Action {
    Action::new("Charge", ActionKind::Charge, TargetCategory::AxisIgnoreLos, 4)
        .with_power(3)
        .with_push(1)
        .with_cost(2)
}

pub fn fire_bolt() -> Action {
    Action::new("Fire Bolt", ActionKind::Attack, TargetCategory::Free, 4)
        .with_power(2)
        .with_status(StatusEffect::burn(1, 2))
}

pub fn flame_cone() -> Action {
    Action::new("Flame Cone", ActionKind::Attack, TargetCategory::Free, 1)
        .with_power(2)
        .with_cost(2)
        .with_pattern(TargetPattern::cone(), PatternAnchor::Caster)
        .with_status(StatusEffect::burn(1, 2))
}

/// Combo finisher: strips the first element and hits per stack
pub fn detonation(power: i32) -> Action {
    Action::new("Detonation", ActionKind::Attack, TargetCategory::Free, 0).with_power(power)
}

pub fn detonate() -> Action {
    Action::new("Detonate", ActionKind::Attack, TargetCategory::FreeIgnoreLos, 5)
        .with_cost(1)
        .with_combo(detonation(2))
}

pub fn frost_lance() -> Action {
    Action::new("Frost Lance", ActionKind::Line { length: 4 }, TargetCategory::Axis, 4)
        .with_power(1)
        .with_cost(1)
        .with_status(StatusEffect::chill(1))
}

pub fn deep_freeze() -> Action {
    Action::new("Deep Freeze", ActionKind::Attack, TargetCategory::Free, 3)
        .with_cost(3)
        .with_status(StatusEffect::freeze(1))
}

pub fn blink() -> Action {
    Action::new("Blink", ActionKind::FixedMove, TargetCategory::AxisFixedMove, 3)
        .with_cost(1)
        .with_tile_effect(TileEffect::gust())
}

pub fn dash() -> Action {
    Action::new("Dash", ActionKind::Dash, TargetCategory::AxisIgnoreUnits, 3)
        .with_power(1)
        .with_cost(1)
        .with_tile_effect(TileEffect::fire())
}

pub fn swap() -> Action {
    Action::new("Swap", ActionKind::Swap, TargetCategory::FreeIgnoreLos, 4)
        .with_power(1)
        .with_cost(1)
}

pub fn arrow_volley() -> Action {
    Action::new("Arrow Volley", ActionKind::Repeat { times: 2 }, TargetCategory::Free, 4)
        .with_power(1)
}

pub fn arrow_shot() -> Action {
    Action::new("Arrow", ActionKind::Attack, TargetCategory::Free, 4).with_power(2)
}

pub fn summon_imp() -> Action {
    Action::new("Summon Imp", ActionKind::Spawn { archetype: Archetype::Imp }, TargetCategory::Free, 1)
}

pub fn war_cry() -> Action {
    Action::new("War Cry", ActionKind::Command { count: 2 }, TargetCategory::Free, 0)
}

pub fn gust() -> Action {
    Action::new("Gust", ActionKind::Attack, TargetCategory::Free, 2)
        .with_pattern(TargetPattern::ring(), PatternAnchor::Target)
        .with_push(1)
        .with_cost(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let a = Action::new("Test", ActionKind::Attack, TargetCategory::Free, 2);
        assert_eq!(a.power, 0);
        assert!(a.ally_safe);
        assert_eq!(a.pattern, TargetPattern::single());
        assert!(!a.hits_allies().ally_safe);
    }

    #[test]
    fn test_displacement_rules() {
        assert!(walk().requires_displacement());
        assert!(!war_cry().requires_displacement());
        assert!(dash().is_movement());
        assert!(!fire_bolt().is_movement());
        assert!(detonate().deals_damage());
    }
}
