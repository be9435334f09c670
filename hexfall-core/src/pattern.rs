//! Rotatable area-of-effect patterns

use crate::hex::{Hex, DIRECTIONS};
use serde::{Deserialize, Serialize};

/// Ordered set of offsets relative to an anchor hex
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPattern {
    offsets: Vec<Hex>,
}

impl TargetPattern {
    pub fn new(offsets: Vec<Hex>) -> Self {
        Self { offsets }
    }

    /// Just the anchor
    pub fn single() -> Self {
        Self::new(vec![Hex::ORIGIN])
    }

    /// Anchor plus its six neighbours
    pub fn burst() -> Self {
        let mut offsets = vec![Hex::ORIGIN];
        offsets.extend(DIRECTIONS);
        Self::new(offsets)
    }

    /// The six neighbours only
    pub fn ring() -> Self {
        Self::new(DIRECTIONS.to_vec())
    }

    /// Three-wide cone opening along the first direction
    pub fn cone() -> Self {
        let d = DIRECTIONS[0];
        let left = DIRECTIONS[5];
        let right = DIRECTIONS[1];
        Self::new(vec![d, d * 2, d + left, d + right])
    }

    /// Straight line along the first direction
    pub fn line(length: i32) -> Self {
        Self::new((1..=length).map(|k| DIRECTIONS[0] * k).collect())
    }

    pub fn offsets(&self) -> &[Hex] {
        &self.offsets
    }

    pub fn contains(&self, offset: Hex) -> bool {
        self.offsets.contains(&offset)
    }

    /// One 60 degree step
    pub fn rotate(&mut self) {
        for offset in &mut self.offsets {
            *offset = offset.rotate();
        }
    }

    pub fn rotated(&self) -> Self {
        let mut next = self.clone();
        next.rotate();
        next
    }

    /// Rotate until some offset equals `direction`; unchanged if none does
    pub fn oriented_towards(&self, direction: Hex) -> Self {
        let mut candidate = self.clone();
        for _ in 0..6 {
            if candidate.contains(direction) {
                return candidate;
            }
            candidate.rotate();
        }
        self.clone()
    }

    /// Concrete hexes around `origin`
    pub fn at(&self, origin: Hex) -> Vec<Hex> {
        self.offsets.iter().map(|&o| origin + o).collect()
    }
}

impl Default for TargetPattern {
    fn default() -> Self {
        Self::single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_rotations_cycle() {
        let cone = TargetPattern::cone();
        let mut p = cone.clone();
        for _ in 0..6 {
            p.rotate();
        }
        assert_eq!(p, cone);
        assert_ne!(cone.rotated(), cone);
    }

    #[test]
    fn test_orient_towards_each_direction() {
        let line = TargetPattern::line(3);
        for dir in DIRECTIONS {
            let oriented = line.oriented_towards(dir);
            assert!(oriented.contains(dir));
            assert!(oriented.contains(dir * 3));
        }
    }

    #[test]
    fn test_orient_without_match_is_noop() {
        let single = TargetPattern::single();
        assert_eq!(single.oriented_towards(DIRECTIONS[2]), single);
    }

    #[test]
    fn test_at_translates() {
        let origin = Hex::axial(2, -1);
        let hexes = TargetPattern::burst().at(origin);
        assert_eq!(hexes.len(), 7);
        assert_eq!(hexes[0], origin);
        assert!(hexes.iter().all(|h| h.distance_to(origin) <= 1));
    }
}
