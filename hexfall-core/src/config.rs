//! Rule constants and generation parameters

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable rule constants. Defaults are the shipped game values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Map columns either side of the centre column
    pub map_half_width: i32,
    /// Map rows either side of the centre row
    pub map_half_height: i32,
    /// Chance for a tile to start as non-ground terrain
    pub terrain_chance: f64,
    /// Chance for a ground tile next to other terrain to adopt it
    pub spread_chance: f64,
    pub spread_passes: u32,
    /// Damage when pushed into a wall or off the map edge
    pub impact_damage: i32,
    /// Damage to both units when a pushed unit hits another
    pub collision_damage: i32,
    pub potential_max: u32,
    pub starting_potential: u32,
    /// Potential gained when a hero detonates a combo
    pub combo_potential_gain: u32,
    /// Search budget for characters that don't draw on potential
    pub enemy_budget: u32,
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            map_half_width: 7,
            map_half_height: 5,
            terrain_chance: 0.15,
            spread_chance: 0.10,
            spread_passes: 2,
            impact_damage: 3,
            collision_damage: 2,
            potential_max: 10,
            starting_potential: 4,
            combo_potential_gain: 1,
            enemy_budget: 3,
            seed: 42,
        }
    }
}

impl RulesConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set map half extents
    pub fn with_map_size(mut self, half_width: i32, half_height: i32) -> Self {
        self.map_half_width = half_width;
        self.map_half_height = half_height;
        self
    }

    pub fn with_potential(mut self, starting: u32, max: u32) -> Self {
        self.starting_potential = starting.min(max);
        self.potential_max = max;
        self
    }

    /// Load from JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RulesConfig = serde_json::from_str(&content)?;
        if !(0.0..=1.0).contains(&config.terrain_chance) || !(0.0..=1.0).contains(&config.spread_chance) {
            anyhow::bail!("terrain probabilities must lie in [0, 1]");
        }
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
