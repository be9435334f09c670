//! Hex geometry with cube coordinates

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

/// Raised when a cube triple does not sum to zero
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid cube coordinate ({x}, {y}, {z}): components must sum to zero")]
pub struct HexError {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Cube hex coordinate, `x + y + z == 0`
///
/// Equality and hashing only look at `(x, y)`; `z` is derived.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Hex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The six unit directions, each one 60 degrees from the next
pub const DIRECTIONS: [Hex; 6] = [
    Hex { x: 1, y: -1, z: 0 },
    Hex { x: 1, y: 0, z: -1 },
    Hex { x: 0, y: 1, z: -1 },
    Hex { x: -1, y: 1, z: 0 },
    Hex { x: -1, y: 0, z: 1 },
    Hex { x: 0, y: -1, z: 1 },
];

impl Hex {
    pub const ORIGIN: Hex = Hex { x: 0, y: 0, z: 0 };

    /// Build a coordinate, panicking if the cube invariant is violated
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        match Self::try_new(x, y, z) {
            Ok(hex) => hex,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(x: i32, y: i32, z: i32) -> Result<Self, HexError> {
        if x + y + z != 0 {
            return Err(HexError { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Build from the two free axes; `z` is derived
    pub const fn axial(x: i32, y: i32) -> Self {
        Self { x, y, z: -x - y }
    }

    /// Cube distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        let dz = (self.z - other.z).abs();
        (dx + dy + dz) / 2
    }

    /// Distance from the origin
    pub fn length(&self) -> i32 {
        self.distance_to(Hex::ORIGIN)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        *self + DIRECTIONS[direction % 6]
    }

    pub fn neighbors(&self) -> [Hex; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Rotate one 60 degree step around the origin
    pub fn rotate(&self) -> Hex {
        Hex {
            x: -self.z,
            y: -self.x,
            z: -self.y,
        }
    }

    /// Index into [`DIRECTIONS`] if this is a unit direction
    pub fn direction_index(&self) -> Option<usize> {
        DIRECTIONS.iter().position(|d| d == self)
    }

    /// Unit direction from `self` towards `other` when they share an axis
    pub fn axis_direction_to(&self, other: Hex) -> Option<Hex> {
        let delta = other - *self;
        let len = delta.length();
        if len == 0 {
            return None;
        }
        if delta.x != 0 && delta.y != 0 && delta.z != 0 {
            return None;
        }
        Some(Hex::axial(delta.x / len, delta.y / len))
    }

    /// Pointy-top 2D projection, used only for tie-breaking
    pub fn to_pixel(&self) -> (f32, f32) {
        let px = 3f32.sqrt() * (self.x as f32 + self.z as f32 / 2.0);
        let py = 1.5 * self.z as f32;
        (px, py)
    }

    /// Squared euclidean distance in the 2D projection
    pub fn pixel_distance_sq(&self, other: Hex) -> f32 {
        let (ax, ay) = self.to_pixel();
        let (bx, by) = other.to_pixel();
        (ax - bx).powi(2) + (ay - by).powi(2)
    }
}

impl PartialEq for Hex {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Hex {}

/// Orders by `(x, y)` so hexes can sit in heaps and sorted sets
impl Ord for Hex {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.x, self.y).cmp(&(other.x, other.y))
    }
}

impl PartialOrd for Hex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Hex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, other: Hex) -> Hex {
        Hex::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<i32> for Hex {
    type Output = Hex;

    fn mul(self, k: i32) -> Hex {
        Hex::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Hex {
    type Output = Hex;

    fn neg(self) -> Hex {
        Hex::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
