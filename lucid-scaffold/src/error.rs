//! Error types for the scaffold pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::scaffold::ArtifactKind;

/// Scaffold error type
///
/// Every variant except [`ScaffoldError::Template`] and [`ScaffoldError::Config`]
/// maps onto one class of the command's failure taxonomy. `RouteConflict`
/// is a usage error detected while planning the routes patch.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Missing or invalid command arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// No migration file matches the requested table
    #[error("No migration found for table \"{table}\" in {}", dir.display())]
    MigrationNotFound {
        /// Requested table name
        table: String,
        /// Directory that was searched
        dir: PathBuf,
    },

    /// An input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing an artifact failed during commit
    #[error("Failed to write {artifact} to {}: {source}", path.display())]
    Write {
        /// Artifact being written
        artifact: ArtifactKind,
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A planned write target was rejected before anything was written
    #[error("Cannot write {artifact} to {}: {reason}", path.display())]
    Unwritable {
        /// Artifact whose target was rejected
        artifact: ArtifactKind,
        /// Target path
        path: PathBuf,
        /// Why the target is not writable
        reason: String,
    },

    /// The route prefix is already mounted by a group for another controller
    #[error(
        "Route prefix '{prefix}' is already mounted by {}; refusing to register {controller}",
        owner.as_deref().unwrap_or("a group with no controller routes")
    )]
    RouteConflict {
        /// Requested prefix
        prefix: String,
        /// Controller that would have been registered
        controller: String,
        /// Controller the existing group routes to, if any
        owner: Option<String>,
    },

    /// A template failed to compile or render
    #[error("Failed to render template '{name}': {source}")]
    Template {
        /// Template name
        name: String,
        /// Underlying template error
        #[source]
        source: minijinja::Error,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ScaffoldError {
    /// Whether the error was raised before any file could have been written
    #[must_use]
    pub const fn is_pre_write(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}

/// Result alias for scaffold operations
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
