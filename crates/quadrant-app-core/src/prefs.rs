// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved simulation preferences shared by Quadrant tools.

use crate::config::{ConfigError, Validate};
use quadrant_geom::GridLayout;
use serde::{Deserialize, Serialize};

pub use quadrant_geom::layout::DEFAULT_CELL_SIZE;

/// Config key under which [`SimPrefs`] are stored.
pub const SIM_PREFS_KEY: &str = "sim";

/// Scene and grid parameters for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimPrefs {
    /// Grid geometry (cell size and offset).
    pub grid: GridLayout,
    /// Number of ticks to run.
    pub ticks: u64,
    /// Number of objects in the generated scene.
    pub objects: usize,
    /// Seed for the generated scene.
    pub seed: u64,
    /// Half-width of the square the scene is scattered over.
    pub extent: f64,
    /// Largest absolute velocity component.
    pub max_speed: f64,
}

impl Default for SimPrefs {
    fn default() -> Self {
        Self {
            grid: GridLayout::default(),
            ticks: 60,
            objects: 64,
            seed: 0x5eed,
            extent: 100.0,
            max_speed: 3.0,
        }
    }
}

impl SimPrefs {
    /// Replaces the grid cell size, keeping the current offset.
    pub fn set_cell_size(&mut self, cell_size: f64) -> Result<(), ConfigError> {
        let (ox, oy) = self.grid.offset();
        self.grid = GridLayout::with_offset(cell_size, ox, oy)?;
        Ok(())
    }
}

impl Validate for SimPrefs {
    fn validate(&self) -> Result<(), String> {
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(format!("extent must be positive and finite, got {}", self.extent));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(format!(
                "max_speed must be non-negative and finite, got {}",
                self.max_speed
            ));
        }
        Ok(())
    }
}
