//! Template override management
//!
//! - `list` - Show each artifact template and whether it is overridden
//! - `eject` - Copy embedded templates into the override directory
//! - `diff` - Show how overrides differ from the embedded defaults

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;

use super::{print_diff, CHECK, CUSTOM, DEFAULT, FOLDER};
use crate::scaffold::templates::{default_source, override_file_name, TEMPLATE_NAMES};

/// Template management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TemplatesCommand {
    /// List artifact templates and their override status
    List,
    /// Copy embedded templates into the override directory for editing
    Eject {
        /// Template to eject (model, service, controller, validator); all when omitted
        name: Option<String>,
        /// Overwrite existing overrides
        #[arg(long)]
        force: bool,
    },
    /// Show the diff between overrides and the embedded templates
    Diff {
        /// Template to compare; every override when omitted
        name: Option<String>,
    },
}

impl TemplatesCommand {
    /// Execute against the override directory `dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is unknown or a template file
    /// cannot be read or written.
    pub fn execute(&self, dir: Option<&Path>) -> Result<()> {
        let dir = dir.context(
            "No template directory: set [templates] dir in lucid-scaffold.toml, or XDG_CONFIG_HOME or HOME",
        )?;

        match self {
            Self::List => {
                list_templates(dir);
                Ok(())
            }
            Self::Eject { name, force } => {
                let ejected = eject_templates(dir, &selected(name.as_deref())?, *force)?;
                println!();
                println!(
                    "{CHECK}Ejected {} template(s) to {}",
                    ejected.len(),
                    style(dir.display()).cyan()
                );
                Ok(())
            }
            Self::Diff { name } => diff_templates(dir, name.as_deref()),
        }
    }
}

/// Resolve an optional name to the templates it selects
fn selected(name: Option<&str>) -> Result<Vec<&'static str>> {
    match name {
        None => Ok(TEMPLATE_NAMES.to_vec()),
        Some(name) => TEMPLATE_NAMES
            .iter()
            .find(|known| **known == name)
            .map(|known| vec![*known])
            .with_context(|| {
                format!(
                    "Unknown template '{name}', expected one of: {}",
                    TEMPLATE_NAMES.join(", ")
                )
            }),
    }
}

fn list_templates(dir: &Path) {
    println!("{FOLDER}Artifact templates");
    println!();
    println!("  Overrides: {}", style(dir.display()).cyan());
    println!();

    let mut customized = 0;
    for name in TEMPLATE_NAMES {
        if dir.join(override_file_name(name)).is_file() {
            println!("    {CUSTOM}{}", style(name).yellow());
            customized += 1;
        } else {
            println!("    {DEFAULT}{}", style(name).dim());
        }
    }

    println!();
    println!(
        "  {} customized, {} default",
        style(customized).yellow(),
        style(TEMPLATE_NAMES.len() - customized).dim()
    );
}

/// Write the embedded sources of `names` into `dir`
///
/// Existing overrides are kept unless `force` is set. Returns the paths
/// written.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn eject_templates(dir: &Path, names: &[&str], force: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut written = Vec::new();
    for name in names {
        let source = default_source(name).with_context(|| format!("Unknown template '{name}'"))?;
        let path = dir.join(override_file_name(name));

        if path.exists() && !force {
            println!(
                "  {DEFAULT}{} already customized, use --force to overwrite",
                style(name).yellow()
            );
            continue;
        }

        fs::write(&path, source).with_context(|| format!("Failed to write template: {}", path.display()))?;
        println!("  {CHECK}{}", style(path.display()).green());
        written.push(path);
    }

    Ok(written)
}

fn diff_templates(dir: &Path, requested: Option<&str>) -> Result<()> {
    let mut found_any = false;

    for name in selected(requested)? {
        let path = dir.join(override_file_name(name));
        if !path.is_file() {
            continue;
        }

        let custom = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        let default = default_source(name).unwrap_or_default();

        found_any = true;
        print_diff(name, default, &custom);
    }

    if !found_any {
        match requested {
            Some(name) => println!("Template '{name}' is not customized (using default)"),
            None => println!("No customized templates found."),
        }
    }
    Ok(())
}
