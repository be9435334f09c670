//! Terrain, tiles and the generated battlefield

use crate::config::RulesConfig;
use crate::hex::Hex;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Terrain category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Ground,
    Grass,
    Sand,
    Forest,
    Wall,
    Water,
    Lava,
    Ice,
    ThinIce,
}

/// Non-ground terrains the generator picks from
pub const ALTERNATE_TERRAINS: [Terrain; 8] = [
    Terrain::Grass,
    Terrain::Sand,
    Terrain::Forest,
    Terrain::Wall,
    Terrain::Water,
    Terrain::Lava,
    Terrain::Ice,
    Terrain::ThinIce,
];

impl Terrain {
    pub fn tile(self) -> Tile {
        let (walkable, blocks_los, move_cost, color) = match self {
            Terrain::Ground => (true, false, 0, (139, 115, 85)),
            Terrain::Grass => (true, false, 0, (86, 160, 70)),
            Terrain::Sand => (true, false, 1, (222, 200, 140)),
            Terrain::Forest => (true, true, 1, (34, 100, 40)),
            Terrain::Wall => (false, true, 0, (90, 90, 95)),
            Terrain::Water => (true, false, 1, (50, 100, 200)),
            Terrain::Lava => (true, false, 2, (220, 70, 20)),
            Terrain::Ice => (true, false, 0, (190, 230, 245)),
            Terrain::ThinIce => (true, false, 0, (215, 240, 250)),
        };
        Tile {
            terrain: self,
            walkable,
            blocks_los,
            move_cost,
            color,
        }
    }

    /// Movement may end here but never continue through
    pub fn is_hard_stop(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Lava)
    }

    /// Pushed units slide over this without spending force
    pub fn is_slippery(self) -> bool {
        matches!(self, Terrain::Ice | Terrain::ThinIce)
    }

    pub fn glyph(self) -> char {
        match self {
            Terrain::Ground => '.',
            Terrain::Grass => ',',
            Terrain::Sand => ':',
            Terrain::Forest => '^',
            Terrain::Wall => '#',
            Terrain::Water => '~',
            Terrain::Lava => '%',
            Terrain::Ice => '=',
            Terrain::ThinIce => '-',
        }
    }
}

/// A single map cell. Immutable once the board is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub walkable: bool,
    pub blocks_los: bool,
    pub move_cost: u32,
    /// Presentation only
    pub color: (u8, u8, u8),
}

/// Rectangular hex map (odd-row offset layout stored in cube coordinates)
#[derive(Clone, Debug)]
pub struct Board {
    tiles: FxHashMap<Hex, Tile>,
    /// Row-major generation order, for deterministic iteration
    coords: Vec<Hex>,
    half_width: i32,
    half_height: i32,
}

impl Board {
    /// Map of a single terrain type
    pub fn uniform(half_width: i32, half_height: i32, terrain: Terrain) -> Self {
        let coords = rect_coords(half_width, half_height);
        let tiles = coords.iter().map(|&h| (h, terrain.tile())).collect();
        Self {
            tiles,
            coords,
            half_width,
            half_height,
        }
    }

    /// Override one tile while the board is still being built
    pub fn with_terrain(mut self, hex: Hex, terrain: Terrain) -> Self {
        if let Some(tile) = self.tiles.get_mut(&hex) {
            *tile = terrain.tile();
        }
        self
    }

    /// Procedural battlefield: random seeding then neighbour spreading
    pub fn generate<R: Rng>(config: &RulesConfig, rng: &mut R) -> Self {
        let mut board = Self::uniform(config.map_half_width, config.map_half_height, Terrain::Ground);

        for hex in board.coords.clone() {
            if rng.gen_bool(config.terrain_chance) {
                let terrain = ALTERNATE_TERRAINS[rng.gen_range(0..ALTERNATE_TERRAINS.len())];
                board.tiles.insert(hex, terrain.tile());
            }
        }

        for _ in 0..config.spread_passes {
            let before = board.tiles.clone();
            for &hex in &board.coords {
                if before[&hex].terrain != Terrain::Ground {
                    continue;
                }
                let sources: Vec<Terrain> = hex
                    .neighbors()
                    .iter()
                    .filter_map(|n| before.get(n))
                    .map(|t| t.terrain)
                    .filter(|&t| t != Terrain::Ground)
                    .collect();
                if sources.is_empty() {
                    continue;
                }
                if rng.gen_bool(config.spread_chance) {
                    let terrain = sources[rng.gen_range(0..sources.len())];
                    board.tiles.insert(hex, terrain.tile());
                }
            }
        }

        tracing::debug!(
            tiles = board.coords.len(),
            "generated {}x{} battlefield",
            board.half_width * 2 + 1,
            board.half_height * 2 + 1
        );
        board
    }

    /// Tile lookup. Panics if the hex was never generated.
    pub fn tile(&self, hex: Hex) -> &Tile {
        match self.tiles.get(&hex) {
            Some(tile) => tile,
            None => panic!("no tile at {hex}: coordinate outside the generated map"),
        }
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> &[Hex] {
        &self.coords
    }

    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    pub fn half_height(&self) -> i32 {
        self.half_height
    }
}

/// Offset row/column to cube
pub fn offset_to_hex(col: i32, row: i32) -> Hex {
    let x = col - (row - (row & 1)) / 2;
    Hex::new(x, -x - row, row)
}

fn rect_coords(half_width: i32, half_height: i32) -> Vec<Hex> {
    let mut coords = Vec::new();
    for row in -half_height..=half_height {
        for col in -half_width..=half_width {
            coords.push(offset_to_hex(col, row));
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_uniform_board_size() {
        let board = Board::uniform(3, 2, Terrain::Ground);
        assert_eq!(board.coords().len(), 7 * 5);
        assert!(board.contains(Hex::ORIGIN));
        for &hex in board.coords() {
            assert_eq!(hex.x + hex.y + hex.z, 0);
        }
    }

    #[test]
    fn test_with_terrain() {
        let wall = Hex::axial(1, -1);
        let board = Board::uniform(3, 3, Terrain::Ground).with_terrain(wall, Terrain::Wall);
        assert!(!board.tile(wall).walkable);
        assert!(board.tile(wall).blocks_los);
        assert!(board.tile(Hex::ORIGIN).walkable);
    }

    #[test]
    #[should_panic(expected = "outside the generated map")]
    fn test_missing_tile_panics() {
        let board = Board::uniform(1, 1, Terrain::Ground);
        board.tile(Hex::axial(10, -10));
    }

    #[test]
    fn test_generation_is_seeded() {
        let config = RulesConfig::default();
        let a = Board::generate(&config, &mut ChaCha8Rng::seed_from_u64(7));
        let b = Board::generate(&config, &mut ChaCha8Rng::seed_from_u64(7));
        for &hex in a.coords() {
            assert_eq!(a.tile(hex), b.tile(hex));
        }
        assert!(a.coords().iter().any(|&h| a.tile(h).terrain != Terrain::Ground));
    }
}
