//! BA Replay CLI
//!
//! Drives the trap deduction engine from recorded session scripts and
//! inspects the embedded catalogs.

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ba_core::callout::{ChatChannel, PortalLayout};
use ba_core::{catalog, shared_catalog, Session, TrapperConfig, WorldPos};

#[derive(Parser)]
#[command(name = "ba_replay")]
#[command(about = "Replay Baldesion Arsenal sessions through the trap engine", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines session script
    Replay {
        /// Script path
        #[arg(long)]
        script: PathBuf,

        /// Trapper config (.json / .yaml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List areas with their trap counts
    Areas,

    /// Find the area containing a position
    Locate {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
    },

    /// Plan the portal callout for a party
    Callout {
        /// Party number (1-6)
        #[arg(long)]
        party: u8,

        #[arg(long, value_enum, default_value = "global")]
        layout: LayoutArg,

        /// Echo instead of party chat
        #[arg(long, default_value = "false")]
        echo: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Global,
    MoogleDc,
}

impl From<LayoutArg> for PortalLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Global => PortalLayout::Global,
            LayoutArg::MoogleDc => PortalLayout::MoogleDc,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("ba_core=debug,ba_replay=debug")
    } else {
        EnvFilter::new("ba_core=info,ba_replay=info")
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
    debug!("Logging initialized (verbose={})", cli.verbose);

    match cli.command {
        Commands::Replay { script, config, json } => run_replay(&script, config, json),
        Commands::Areas => {
            print_areas();
            Ok(())
        }
        Commands::Locate { x, y, z } => {
            let pos = WorldPos::new(x, y, z);
            match catalog().areas.locate(&pos) {
                Some(area) => println!("{:?} ({})", area.tag, area.name),
                None => println!("Outside every area"),
            }
            Ok(())
        }
        Commands::Callout { party, layout, echo } => {
            let channel = ChatChannel::from_party_flag(!echo);
            let steps = ba_core::callout::plan(layout.into(), party, channel)
                .context("Failed to plan callout")?;
            println!("{}", serde_json::to_string_pretty(&steps)?);
            Ok(())
        }
    }
}

fn run_replay(script_path: &Path, config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => TrapperConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrapperConfig::default(),
    };
    let events = script::load_script(script_path)?;
    debug!("Loaded {} events from {}", events.len(), script_path.display());

    let mut session = Session::new(shared_catalog(), config);
    let summary = script::replay(&mut session, &events);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let counts = session.engine().counts();
    println!("Ticks:        {}", summary.ticks);
    println!("Scans:        {:?}", summary.scans_applied);
    println!("Revealed:     {:?}", summary.revealed);
    println!("Unregistered: {}", summary.unregistered);
    println!(
        "Traps:        {} unscanned, {} revealed, {} disabled",
        counts.not_scanned, counts.revealed, counts.disabled
    );
    println!("Portal areas: {:?}", summary.possible_portal_areas);
    for notification in &summary.notifications {
        println!("  {:?}", notification);
    }
    for tank in &summary.dashboard.tanks {
        let stance = if tank.stance_active { "stance" } else { "" };
        println!("Tank:         {} {:?} [{}] {}", tank.name, tank.job, tank.logos.label(), stance);
    }
    Ok(())
}

fn print_areas() {
    let catalog = catalog();
    for area in catalog.areas.all() {
        println!(
            "{:<26} {:>3} traps  {:>2} scan spots  {}",
            format!("{:?}", area.tag),
            catalog.traps.traps_in_area(area.tag).len(),
            area.scan_spots.len(),
            area.name
        );
    }
}
