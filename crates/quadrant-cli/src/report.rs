// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table and JSON rendering for `quadrant run`.

use comfy_table::{presets::UTF8_FULL, Table};
use quadrant_app_core::prefs::SimPrefs;
use quadrant_core::{CellKey, TickReport};
use serde::Serialize;

/// Per-tick row of the JSON output.
#[derive(Debug, Serialize)]
pub struct TickRow {
    /// Tick number.
    pub tick: u64,
    /// Objects that changed cell.
    pub migrations: usize,
    /// Bundles rebuilt in place after a neighbor left.
    pub refreshes: usize,
    /// Candidate checks executed.
    pub checks: usize,
}

/// Whole-run summary.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Objects in the scene.
    pub objects: usize,
    /// Cell size used.
    pub cell_size: f64,
    /// Scene seed.
    pub seed: u64,
    /// Per-tick activity.
    pub ticks: Vec<TickRow>,
    /// Sum of migrations across all ticks.
    pub total_migrations: usize,
    /// Sum of candidate checks across all ticks.
    pub total_checks: usize,
    /// Candidate pairs that were within contact radius.
    pub contacts: u64,
    /// Occupied cells after the last tick.
    pub occupied_cells: usize,
    /// Largest number of objects sharing one cell after the last tick.
    pub max_occupancy: usize,
}

impl Summary {
    /// Folds tick reports and final occupancy into a summary.
    pub fn new(
        prefs: &SimPrefs,
        ticks: &[TickReport],
        occupancy: &[(CellKey, usize)],
        contacts: u64,
    ) -> Self {
        Self {
            objects: prefs.objects,
            cell_size: prefs.grid.cell_size(),
            seed: prefs.seed,
            ticks: ticks
                .iter()
                .map(|t| TickRow {
                    tick: t.tick,
                    migrations: t.migrations,
                    refreshes: t.refreshes,
                    checks: t.checks,
                })
                .collect(),
            total_migrations: ticks.iter().map(|t| t.migrations).sum(),
            total_checks: ticks.iter().map(|t| t.checks).sum(),
            contacts,
            occupied_cells: occupancy.len(),
            max_occupancy: occupancy.iter().map(|(_, n)| *n).max().unwrap_or(0),
        }
    }
}

/// One row per tick.
pub fn tick_table(ticks: &[TickReport]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["tick", "moved", "migrations", "refreshes", "checks"]);
    for t in ticks {
        table.add_row(vec![
            t.tick.to_string(),
            t.moved.to_string(),
            t.migrations.to_string(),
            t.refreshes.to_string(),
            t.checks.to_string(),
        ]);
    }
    table
}

/// Key/value table of the run summary.
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["metric", "value"]);
    let rows = [
        ("objects", summary.objects.to_string()),
        ("cell size", summary.cell_size.to_string()),
        ("seed", summary.seed.to_string()),
        ("migrations", summary.total_migrations.to_string()),
        ("checks", summary.total_checks.to_string()),
        ("contacts", summary.contacts.to_string()),
        ("occupied cells", summary.occupied_cells.to_string()),
        ("max occupancy", summary.max_occupancy.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_owned(), value]);
    }
    table
}
