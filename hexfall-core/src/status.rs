//! Timed status effects and combo stripping

use serde::{Deserialize, Serialize};

/// Elemental category. Combos strip every effect sharing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Frost,
    Poison,
    Shock,
    Earth,
    Wind,
}

/// What a status does while it is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Damage at the start of each of the bearer's turns
    DamageOverTime(i32),
    /// Bearer can't use movement actions
    Immobilize,
    /// Bearer skips its turns
    Freeze,
    /// No effect beyond priming a combo
    Mark,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub element: Element,
    pub kind: StatusKind,
    /// Remaining turns, counted down at the bearer's turn end
    pub duration: u32,
}

impl StatusEffect {
    pub fn new(name: &str, element: Element, kind: StatusKind, duration: u32) -> Self {
        Self {
            name: name.to_string(),
            element,
            kind,
            duration,
        }
    }

    pub fn burn(damage: i32, duration: u32) -> Self {
        Self::new("Burn", Element::Fire, StatusKind::DamageOverTime(damage), duration)
    }

    pub fn poison(damage: i32, duration: u32) -> Self {
        Self::new("Poison", Element::Poison, StatusKind::DamageOverTime(damage), duration)
    }

    pub fn chill(duration: u32) -> Self {
        Self::new("Chill", Element::Frost, StatusKind::Immobilize, duration)
    }

    pub fn freeze(duration: u32) -> Self {
        Self::new("Freeze", Element::Frost, StatusKind::Freeze, duration)
    }

    pub fn static_charge(duration: u32) -> Self {
        Self::new("Static", Element::Shock, StatusKind::Mark, duration)
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0
    }
}

pub fn is_immobilized(statuses: &[StatusEffect]) -> bool {
    statuses.iter().any(|s| matches!(s.kind, StatusKind::Immobilize | StatusKind::Freeze))
}

pub fn is_frozen(statuses: &[StatusEffect]) -> bool {
    statuses.iter().any(|s| s.kind == StatusKind::Freeze)
}

/// Total turn-start damage from damage-over-time effects
pub fn turn_start_damage(statuses: &[StatusEffect]) -> i32 {
    statuses
        .iter()
        .map(|s| match s.kind {
            StatusKind::DamageOverTime(d) => d,
            _ => 0,
        })
        .sum()
}

/// Remove every effect sharing the first effect's element.
///
/// Returns the element and the number of stacks removed, or `None` when
/// there was nothing to detonate.
pub fn strip_first_category(statuses: &mut Vec<StatusEffect>) -> Option<(Element, u32)> {
    let element = statuses.first()?.element;
    let before = statuses.len();
    statuses.retain(|s| s.element != element);
    Some((element, (before - statuses.len()) as u32))
}

/// Count down every effect and split off the ones that ran out
pub fn tick_durations(statuses: &mut Vec<StatusEffect>) -> Vec<StatusEffect> {
    for status in statuses.iter_mut() {
        status.duration = status.duration.saturating_sub(1);
    }
    let (expired, active): (Vec<_>, Vec<_>) = statuses.drain(..).partition(|s| s.is_expired());
    *statuses = active;
    expired
}
