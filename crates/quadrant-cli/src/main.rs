// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `quadrant` developer CLI: run seeded broad-phase scenes and inspect cell keys.
#![allow(clippy::print_stdout)]

mod report;
mod scene;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quadrant_app_core::config::ConfigService;
use quadrant_app_core::prefs::{SimPrefs, SIM_PREFS_KEY};
use quadrant_config_fs::FsConfigStore;
use quadrant_core::{GridLayout, Position, Simulation};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Quadrant broad-phase developer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a seeded scene and report per-tick broad-phase activity.
    Run(RunArgs),
    /// Print the grid cell containing a point.
    CellOf(CellOfArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of ticks (overrides saved prefs)
    #[arg(long)]
    ticks: Option<u64>,
    /// Number of objects (overrides saved prefs)
    #[arg(long)]
    objects: Option<usize>,
    /// Grid cell size (overrides saved prefs)
    #[arg(long)]
    cell_size: Option<f64>,
    /// Scene seed (overrides saved prefs)
    #[arg(long)]
    seed: Option<u64>,
    /// Distance under which a candidate pair counts as a contact
    #[arg(long, default_value_t = 1.0)]
    contact_radius: f64,
    /// Directory holding `sim.json`; defaults to the platform config dir
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Persist the effective prefs back to the config store
    #[arg(long)]
    save: bool,
    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CellOfArgs {
    /// X coordinate
    #[arg(allow_negative_numbers = true)]
    x: f64,
    /// Y coordinate
    #[arg(allow_negative_numbers = true)]
    y: f64,
    /// Grid cell size
    #[arg(long, default_value_t = quadrant_core::DEFAULT_CELL_SIZE)]
    cell_size: f64,
    /// Horizontal offset added before division
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f64,
    /// Vertical offset added before division
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => run(args),
        Command::CellOf(args) => cell_of(&args),
    }
}

fn open_store(dir: Option<PathBuf>) -> Result<FsConfigStore> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(&dir)
            .with_context(|| format!("open config dir {}", dir.display()))?,
        None => FsConfigStore::new().context("open platform config dir")?,
    };
    Ok(store)
}

fn resolve_prefs(args: &RunArgs, service: Option<&ConfigService<FsConfigStore>>) -> Result<SimPrefs> {
    let mut prefs = match service {
        Some(service) => service
            .load_valid::<SimPrefs>(SIM_PREFS_KEY)
            .context("load sim prefs")?,
        None => SimPrefs::default(),
    };
    if let Some(ticks) = args.ticks {
        prefs.ticks = ticks;
    }
    if let Some(objects) = args.objects {
        prefs.objects = objects;
    }
    if let Some(seed) = args.seed {
        prefs.seed = seed;
    }
    if let Some(size) = args.cell_size {
        prefs.set_cell_size(size).context("invalid --cell-size")?;
    }
    Ok(prefs)
}

fn run(args: RunArgs) -> Result<()> {
    let service = match open_store(args.config_dir.clone()) {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) if args.config_dir.is_none() => {
            warn!("config store unavailable, using defaults: {err:#}");
            None
        }
        Err(err) => return Err(err),
    };
    let prefs = resolve_prefs(&args, service.as_ref())?;
    if args.save {
        if let Some(service) = &service {
            service.save_valid(SIM_PREFS_KEY, &prefs).context("save sim prefs")?;
            info!("saved prefs under {}", service.store().base().display());
        }
    }

    let counter = Rc::new(scene::ProximityCounter::new(args.contact_radius));
    let mut sim = Simulation::new(prefs.grid, counter.clone());
    for object in scene::build(&prefs) {
        sim.spawn(object);
    }
    info!(objects = sim.len(), ticks = prefs.ticks, "running scene");
    let ticks = sim.run(prefs.ticks).context("simulation tick failed")?;

    let occupancy = sim.grid().borrow().occupancy();
    let summary = report::Summary::new(&prefs, &ticks, &occupancy, counter.contacts());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report::tick_table(&ticks));
        println!("{}", report::summary_table(&summary));
    }
    Ok(())
}

fn cell_of(args: &CellOfArgs) -> Result<()> {
    let layout = GridLayout::with_offset(args.cell_size, args.offset_x, args.offset_y)
        .context("invalid grid layout")?;
    let cell = layout.cell_of(Position::new(args.x, args.y));
    println!("{} {}", cell.x, cell.y);
    Ok(())
}
