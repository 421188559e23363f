//! lucid-scaffold library
//!
//! Generates CRUD artifacts (model, service, controller, validator and route
//! registration) for an AdonisJS project from the columns declared in an
//! existing Lucid migration.
//!
//! ```rust,no_run
//! use lucid_scaffold::{commands::MakeCrudCommand, config::ScaffoldConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = std::path::Path::new(".");
//! let report = MakeCrudCommand::new(root, ScaffoldConfig::load(root)?, "posts", "Post").run()?;
//! println!("wrote {} files", report.written.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod scaffold;

pub use config::ScaffoldConfig;
pub use error::{Result, ScaffoldError};
pub use scaffold::{ColumnDescriptor, EntitySpec, ScaffoldGenerator, TemplateHelpers};
