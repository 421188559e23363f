//! CRUD scaffold pipeline
//!
//! Locates the migration for a table, extracts its columns, renders the model,
//! service, controller and validator for the entity, and registers its routes.
//! Everything up to the [`WritePlan`] is pure; only [`WritePlan::commit`]
//! touches the filesystem.

pub mod columns;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod lexer;
pub mod locator;
pub mod plan;
pub mod routes;
pub mod templates;

pub use columns::{extract_columns, read_columns, ColumnDescriptor, SYSTEM_COLUMNS};
pub use field_type::{map_column, map_storage_type, MappedField, StorageClass, ValidationContext};
pub use generator::{ArtifactKind, EntitySpec, GeneratedFile, GeneratorOptions, ScaffoldGenerator};
pub use helpers::TemplateHelpers;
pub use locator::{find_in_listing, locate_migration};
pub use plan::WritePlan;
pub use routes::{MountedGroup, RoutePatch, RouteResource, RoutesFile};
pub use templates::TemplateRegistry;
