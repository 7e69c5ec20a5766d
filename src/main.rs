//! Locker Layout CLI
//!
//! Usage:
//!   locker-layout [OPTIONS] <FILE> <COMMAND>
//!
//! Commands:
//!   check       Report overlapping, misplaced, and orphaned lockers
//!   stats       Print locker counts by status
//!   add-tiers   Stack tiers on a parent locker
//!   rotate      Rotate a selection about its center
//!   move        Move a locker, snapping to neighbors or the grid
//!   delete      Delete a locker without tiers
//!
//! Options:
//!   -c, --config <FILE>  Layout configuration (TOML format)
//!   -h, --help           Print help

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locker_layout::layout::{adjacent_groups, lint, snap_rotation};
use locker_layout::{
    JsonFileRepository, LayoutConfig, LockerId, LockerStore, Outcome, Scope, ViewMode,
};

#[derive(Parser)]
#[command(name = "locker-layout")]
#[command(about = "Edit and check locker floor plans")]
struct Cli {
    /// JSON layout file (created on first save if missing)
    file: PathBuf,

    /// Layout configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report overlapping, misplaced, and orphaned lockers
    Check,
    /// Print locker counts by status
    Stats,
    /// Stack tiers on a parent locker
    AddTiers {
        #[arg(long)]
        parent: String,
        #[arg(long)]
        count: u32,
        #[arg(long)]
        base_level: Option<u32>,
    },
    /// Rotate a selection about its center
    Rotate {
        /// Comma-separated locker ids
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        #[arg(long, allow_hyphen_values = true)]
        degrees: f64,
        #[arg(long, default_value = "floor", value_parser = parse_view)]
        view: ViewMode,
        /// Round the angle to the configured rotation step
        #[arg(long)]
        snap: bool,
    },
    /// Move a locker, snapping to neighbors or the grid
    Move {
        #[arg(long)]
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, default_value = "floor", value_parser = parse_view)]
        view: ViewMode,
        /// Place exactly at the given position
        #[arg(long)]
        no_snap: bool,
    },
    /// Delete a locker without tiers
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn parse_view(s: &str) -> Result<ViewMode, String> {
    match s {
        "floor" => Ok(ViewMode::Floor),
        "front" => Ok(ViewMode::Front),
        other => Err(format!("unknown view '{}', expected floor or front", other)),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locker_layout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let repository = match JsonFileRepository::open(&cli.file, Scope::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading layout '{}': {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };
    let zones = repository.zones().to_vec();
    let types = repository.types().to_vec();

    let mut store = LockerStore::with_repository(config, Box::new(repository));
    store.set_zones(zones);
    store.set_types(types);
    if let Err(e) = store.load() {
        eprintln!("Error loading lockers: {}", e);
        std::process::exit(1);
    }

    let outcome = match cli.command {
        Command::Check => {
            std::process::exit(run_check(&store));
        }
        Command::Stats => {
            println!("{}", store.status_counts());
            return;
        }
        Command::AddTiers {
            parent,
            count,
            base_level,
        } => {
            let result = store.add_tiers(&LockerId::new(parent), count, base_level);
            if let Ok(tiers) = &result {
                for tier in tiers {
                    println!("{}\t{}", tier.id, tier.label);
                }
            }
            Outcome::from(&result)
        }
        Command::Rotate {
            ids,
            degrees,
            view,
            snap,
        } => {
            let ids: Vec<LockerId> = ids.into_iter().map(LockerId::new).collect();
            let degrees = if snap {
                snap_rotation(degrees, store.config().rotation_snap)
            } else {
                degrees
            };
            Outcome::from(&store.rotate_selection(&ids, degrees, view))
        }
        Command::Move {
            id,
            x,
            y,
            view,
            no_snap,
        } => {
            let id = LockerId::new(id);
            let target = if no_snap {
                Ok((x, y))
            } else {
                store
                    .snap_position(&id, view, x, y)
                    .map(|snapped| (snapped.x, snapped.y))
            };
            let result = target.and_then(|(x, y)| store.move_to(&id, view, x, y));
            if let Ok(locker) = &result {
                if let Some((x, y)) = locker.position(view) {
                    println!("{}\t{} {}", locker.id, x, y);
                }
            }
            Outcome::from(&result)
        }
        Command::Delete { id } => Outcome::from(&store.delete(&LockerId::new(id))),
    };

    if outcome.success {
        println!("{}", outcome);
    } else {
        eprintln!("{}", outcome);
        std::process::exit(1);
    }
}

/// Print lint warnings for both views. Returns the process exit code.
fn run_check(store: &LockerStore) -> i32 {
    let tolerance = store.config().minimum_gap;
    let mut warnings = lint::check(store.lockers(), store.zones(), ViewMode::Floor, tolerance);
    warnings.extend(
        lint::check(store.lockers(), store.zones(), ViewMode::Front, tolerance)
            .into_iter()
            .filter(|w| w.category == lint::LintCategory::Overlap),
    );

    for warning in &warnings {
        println!("{}", warning);
    }

    let groups = adjacent_groups(store.lockers(), ViewMode::Floor, store.config().snap_threshold);
    let clusters = groups.iter().filter(|g| g.len() > 1).count();
    println!(
        "{} lockers, {} adjacent clusters, {} warnings",
        store.lockers().len(),
        clusters,
        warnings.len()
    );

    if warnings.is_empty() {
        0
    } else {
        1
    }
}
