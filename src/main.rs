mod catalog;
mod clock;
mod propagate;
mod scene;
mod selection;
mod store;
mod web;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::catalog::{build_catalog, load_catalog, CatalogSource};
use crate::propagate::{PathSpec, Sgp4Builder};
use crate::scene::GlobeScene;
use crate::store::{Action, Store};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "sat-globe")]
#[command(about = "Live satellite positions for a 3D globe view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the globe scene over HTTP
    Serve {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Load the catalog once and print the composed scene as JSON
    Snapshot {
        #[arg(short, long)]
        config: Option<String>,
        /// Read the catalog from a local file instead of the configured source
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Catalog number to select before composing
        #[arg(long)]
        select: Option<u64>,
    },
    /// Parse a local catalog file and report every entry
    Validate { catalog: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Snapshot {
            config,
            catalog,
            select,
        } => snapshot(config.as_deref(), catalog, select).await,
        Commands::Validate { catalog } => validate(&catalog),
    }
}

async fn serve(config_path: Option<&str>) -> ExitCode {
    let config = match Config::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn snapshot(
    config_path: Option<&str>,
    catalog_file: Option<PathBuf>,
    select: Option<u64>,
) -> ExitCode {
    let mut config = match Config::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if catalog_file.is_some() {
        config.catalog.file = catalog_file;
    }

    let task = match config.load_task() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = match load_catalog(&task, Sgp4Builder).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = Store::new();
    let mut actions = vec![Action::CatalogLoaded(catalog), Action::Tick(Utc::now())];
    actions.extend(select.map(Action::Select));
    for action in actions {
        if let Err(e) = store.dispatch(action) {
            eprintln!("Selection error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let scene = GlobeScene::compose(&store.current(), &config.scene_style());
    match serde_json::to_string_pretty(&scene) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = CatalogSource::File(PathBuf::from(path)).to_string();
    let catalog = build_catalog(&text, &Sgp4Builder, Utc::now(), &PathSpec::default(), source);
    let report = &catalog.report;

    println!(
        "Catalog parsed ({} tracked, {} skipped, {} trailing lines)",
        report.tracked_count(),
        report.skipped_count(),
        report.trailing_lines
    );
    for (entry, reason) in report.skipped() {
        println!(
            "  line {}: {} [{}] {}",
            entry.line,
            entry.name,
            reason,
            reason.detail()
        );
    }
    for name in &report.duplicate_names {
        println!("  duplicate name: {}", name);
    }

    if catalog.is_empty() && !report.entries.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
