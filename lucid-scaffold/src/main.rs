//! lucid-scaffold CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lucid_scaffold::commands::{MakeCrudCommand, TemplatesCommand};
use lucid_scaffold::{observability, ScaffoldConfig};

#[derive(Parser)]
#[command(name = "lucid-scaffold")]
#[command(version)]
#[command(about = "CRUD scaffolding for AdonisJS projects from existing Lucid migrations", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model, service, controller, validator and routes from a migration
    #[command(name = "make:crud")]
    MakeCrud {
        /// Table name, matched against migration file names
        table_name: String,
        /// Model name (`PascalCase`, e.g., `Post`)
        model_name: String,
        /// Show what would be written without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Do not touch the routes file
        #[arg(long)]
        skip_routes: bool,
    },
    /// Manage artifact template overrides
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.verbose)?;

    let config = ScaffoldConfig::load(&cli.project)
        .with_context(|| format!("Failed to load configuration for {}", cli.project.display()))?;

    match cli.command {
        Commands::MakeCrud {
            table_name,
            model_name,
            dry_run,
            skip_routes,
        } => {
            MakeCrudCommand::new(&cli.project, config, table_name, model_name)
                .dry_run(dry_run)
                .skip_routes(skip_routes)
                .execute()?;
        }
        Commands::Templates { command } => {
            let dir = config.templates_dir(&cli.project);
            command.execute(dir.as_deref())?;
        }
    }

    Ok(())
}
