//! Project configuration
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults (AdonisJS conventional layout)
//! 2. `lucid-scaffold.toml` in the project root
//! 3. Environment variables (`LUCID_SCAFFOLD_` prefix, `__` for nesting)
//!
//! Example: `LUCID_SCAFFOLD_GENERATOR__PAGE_SIZE=25`
//!
//! ```toml
//! # lucid-scaffold.toml
//! [paths]
//! migrations_dir = "database/migrations"
//! routes_file = "start/routes.ts"
//!
//! [generator]
//! page_size = 20
//! search_columns = ["name", "email"]
//!
//! [templates]
//! dir = ".lucid-scaffold/templates"
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};
use crate::scaffold::GeneratorOptions;

/// Project config file name
pub const CONFIG_FILE_NAME: &str = "lucid-scaffold.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LUCID_SCAFFOLD_";

/// Complete scaffold configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Input and output locations
    pub paths: PathsConfig,
    /// Code generation settings
    pub generator: GeneratorConfig,
    /// Template overrides
    pub templates: TemplatesConfig,
}

/// Input and output locations, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory searched for migrations
    pub migrations_dir: PathBuf,
    /// Shared routes file
    pub routes_file: PathBuf,
    /// Generated models
    pub models_dir: PathBuf,
    /// Generated services
    pub services_dir: PathBuf,
    /// Generated controllers
    pub controllers_dir: PathBuf,
    /// Generated validators
    pub validators_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("database/migrations"),
            routes_file: PathBuf::from("start/routes.ts"),
            models_dir: PathBuf::from("app/models"),
            services_dir: PathBuf::from("app/services"),
            controllers_dir: PathBuf::from("app/controllers"),
            validators_dir: PathBuf::from("app/validators"),
        }
    }
}

/// Code generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Identifier the migration's table callback binds (`table` in `(table) => {}`)
    pub table_receiver: String,
    /// Default page size of the generated index handler
    pub page_size: u32,
    /// Default sort column
    pub sort_by: String,
    /// Default sort direction (`asc` or `desc`)
    pub sort_dir: String,
    /// Searched columns; every text column when unset
    pub search_columns: Option<Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            table_receiver: "table".to_string(),
            page_size: 10,
            sort_by: "created_at".to_string(),
            sort_dir: "desc".to_string(),
            search_columns: None,
        }
    }
}

/// Template override settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Override directory; relative paths resolve against the project root
    pub dir: Option<PathBuf>,
}

impl ScaffoldConfig {
    /// Layered configuration sources for the project at `project_root`
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(project_root.join(CONFIG_FILE_NAME)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration for the project at `project_root`
    ///
    /// A missing config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if the file is malformed, a value has
    /// the wrong type, or a value is out of range.
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::from_figment(&Self::figment(project_root))
    }

    /// Extract and validate configuration from `figment`
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] on extraction or validation failure.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: String| ScaffoldError::Config(Box::new(figment::Error::from(message)));

        if self.generator.page_size == 0 {
            return Err(invalid("generator.page_size must be at least 1".to_string()));
        }
        if !matches!(self.generator.sort_dir.as_str(), "asc" | "desc") {
            return Err(invalid(format!(
                "generator.sort_dir must be 'asc' or 'desc', got '{}'",
                self.generator.sort_dir
            )));
        }
        if self.generator.table_receiver.trim().is_empty() {
            return Err(invalid("generator.table_receiver must not be empty".to_string()));
        }
        Ok(())
    }

    /// Generator settings for this configuration
    #[must_use]
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            models_dir: self.paths.models_dir.clone(),
            services_dir: self.paths.services_dir.clone(),
            controllers_dir: self.paths.controllers_dir.clone(),
            validators_dir: self.paths.validators_dir.clone(),
            page_size: self.generator.page_size,
            sort_by: self.generator.sort_by.clone(),
            sort_dir: self.generator.sort_dir.clone(),
            search_columns: self.generator.search_columns.clone(),
        }
    }

    /// Template override directory
    ///
    /// The configured directory (resolved against `project_root`), or the
    /// user-wide XDG location when none is configured.
    #[must_use]
    pub fn templates_dir(&self, project_root: &Path) -> Option<PathBuf> {
        self.templates.dir.as_ref().map_or_else(default_templates_dir, |dir| {
            Some(project_root.join(dir))
        })
    }
}

/// User-wide template override directory from the environment
#[must_use]
pub fn default_templates_dir() -> Option<PathBuf> {
    templates_dir_from(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// `$XDG_CONFIG_HOME/lucid-scaffold/templates`, falling back to
/// `$HOME/.config/lucid-scaffold/templates`
#[must_use]
pub fn templates_dir_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|dir| !dir.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.filter(|dir| !dir.is_empty())?).join(".config"),
    };
    Some(base.join("lucid-scaffold").join("templates"))
}
