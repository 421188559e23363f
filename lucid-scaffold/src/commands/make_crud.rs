//! `make:crud` command
//!
//! Scaffolds a model, service, controller and validator for an existing table
//! and registers its routes.
//!
//! # Example
//!
//! ```bash
//! lucid-scaffold make:crud posts Post
//! lucid-scaffold make:crud posts Post --dry-run
//! ```
//!
//! The run is staged: the migration is located and parsed, every artifact and
//! the patched routes file are rendered into a [`WritePlan`], the plan is
//! validated, and only then are files written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use super::{print_diff, CHECK, DOT, SPARKLES};
use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;
use crate::scaffold::{
    locate_migration, read_columns, ArtifactKind, ColumnDescriptor, EntitySpec, GeneratedFile, RoutePatch,
    RoutesFile, ScaffoldGenerator, TemplateRegistry, WritePlan,
};

/// What happened to the routes file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutesOutcome {
    /// `--skip-routes` was given
    Skipped,
    /// The controller binding and route group were already present
    Unchanged,
    /// The routes file was patched (or would be, in a dry run)
    Patched {
        /// What was added
        patch: RoutePatch,
        /// Routes file before the patch
        before: String,
        /// Routes file after the patch
        after: String,
    },
}

/// Result of a scaffold run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// `PascalCase` entity name
    pub entity: String,
    /// Migration the columns were read from
    pub migration: PathBuf,
    /// Extracted business columns
    pub columns: Vec<ColumnDescriptor>,
    /// Planned files in write order, routes last
    pub files: Vec<GeneratedFile>,
    /// Routes file outcome
    pub routes: RoutesOutcome,
    /// Absolute paths written; empty for a dry run
    pub written: Vec<PathBuf>,
    /// Whether anything was written
    pub dry_run: bool,
}

/// CRUD scaffold command
pub struct MakeCrudCommand {
    project_root: PathBuf,
    config: ScaffoldConfig,
    table_name: String,
    model_name: String,
    dry_run: bool,
    skip_routes: bool,
}

impl MakeCrudCommand {
    /// Create a command for `table_name` / `model_name` in the project at
    /// `project_root`
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: ScaffoldConfig,
        table_name: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            table_name: table_name.into(),
            model_name: model_name.into(),
            dry_run: false,
            skip_routes: false,
        }
    }

    /// Plan and validate without writing
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Leave the routes file alone
    #[must_use]
    pub const fn skip_routes(mut self, skip_routes: bool) -> Self {
        self.skip_routes = skip_routes;
        self
    }

    /// Run the scaffold pipeline
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::Usage`] for an empty or invalid table or model name
    /// - [`ScaffoldError::MigrationNotFound`] when no migration matches
    /// - [`ScaffoldError::Read`] when the migration or routes file is unreadable
    /// - [`ScaffoldError::RouteConflict`] when the route prefix belongs to
    ///   another controller
    /// - [`ScaffoldError::Template`] when a template fails to render
    /// - [`ScaffoldError::Unwritable`] when a target is rejected before writing
    /// - [`ScaffoldError::Write`] when a write fails part way through
    ///
    /// Every error except `Write` is raised before any file is touched.
    pub fn run(&self) -> Result<ScaffoldReport, ScaffoldError> {
        let table_name = self.table_name.trim();
        if table_name.is_empty() || self.model_name.trim().is_empty() {
            return Err(ScaffoldError::Usage(
                "make:crud <TABLE_NAME> <MODEL_NAME>".to_string(),
            ));
        }
        EntitySpec::validate_names(table_name, &self.model_name)?;

        let migrations_dir = self.project_root.join(&self.config.paths.migrations_dir);
        let migration = locate_migration(&migrations_dir, table_name).ok_or_else(|| {
            ScaffoldError::MigrationNotFound {
                table: table_name.to_string(),
                dir: migrations_dir.clone(),
            }
        })?;

        let columns = read_columns(&migration, &self.config.generator.table_receiver)?;
        let spec = EntitySpec::new(table_name, &self.model_name, columns.clone())?;
        tracing::info!(
            entity = spec.entity_name(),
            migration = %migration.display(),
            columns = columns.len(),
            "scaffolding entity"
        );

        let templates = self.template_registry()?;
        let generator = ScaffoldGenerator::new(spec, self.config.generator_options(), templates);

        let mut plan = WritePlan::new(&self.project_root);
        for file in generator.generate()? {
            plan.push(file);
        }

        let routes = if self.skip_routes {
            RoutesOutcome::Skipped
        } else {
            self.plan_routes(generator.spec(), &mut plan)?
        };

        plan.validate()?;
        let written = if self.dry_run {
            tracing::info!(files = plan.files().len(), "dry run, nothing written");
            Vec::new()
        } else {
            plan.commit()?
        };

        Ok(ScaffoldReport {
            entity: generator.spec().entity_name().to_string(),
            migration,
            columns,
            files: plan.files().to_vec(),
            routes,
            written,
            dry_run: self.dry_run,
        })
    }

    fn template_registry(&self) -> Result<TemplateRegistry, ScaffoldError> {
        match self.config.templates_dir(&self.project_root) {
            Some(dir) => TemplateRegistry::with_overrides(&dir),
            None => TemplateRegistry::new(),
        }
    }

    fn plan_routes(&self, spec: &EntitySpec, plan: &mut WritePlan) -> Result<RoutesOutcome, ScaffoldError> {
        let routes_path = &self.config.paths.routes_file;
        let absolute = self.project_root.join(routes_path);
        let before = fs::read_to_string(&absolute).map_err(|source| ScaffoldError::Read {
            path: absolute.clone(),
            source,
        })?;

        let mut routes = RoutesFile::parse(&before);
        let patch = routes.add_resource(&spec.route_resource())?;
        if patch.is_unchanged() {
            tracing::info!(path = %absolute.display(), "routes already registered");
            return Ok(RoutesOutcome::Unchanged);
        }

        let after = routes.render();
        plan.push(GeneratedFile {
            artifact: ArtifactKind::Routes,
            path: routes_path.clone(),
            content: after.clone(),
            description: format!("Routes for {}", spec.entity_name()),
        });

        Ok(RoutesOutcome::Patched { patch, before, after })
    }

    /// Run the command and print progress
    ///
    /// # Errors
    ///
    /// Returns an error if any stage of [`MakeCrudCommand::run`] fails.
    pub fn execute(&self) -> Result<()> {
        println!(
            "\n{} {} {}",
            style("Scaffolding CRUD for").cyan().bold(),
            style(&self.model_name).green().bold(),
            style("...").cyan().bold()
        );

        let report = self
            .run()
            .with_context(|| format!("Failed to scaffold {} from table '{}'", self.model_name, self.table_name))?;

        print_report(&report, &self.project_root);
        Ok(())
    }
}

fn print_report(report: &ScaffoldReport, project_root: &Path) {
    let migration = report
        .migration
        .strip_prefix(project_root)
        .unwrap_or(&report.migration);
    println!("  {} {}", style("Migration:").dim(), migration.display());

    let names: Vec<_> = report.columns.iter().map(ColumnDescriptor::name).collect();
    if names.is_empty() {
        println!("  {} {}", style("Found columns:").dim(), style("(none)").yellow());
    } else {
        println!("  {} {}", style("Found columns:").dim(), names.join(", "));
    }
    println!();

    let verb = if report.dry_run { "would write" } else { "created" };
    for file in report.files.iter().filter(|f| f.artifact != ArtifactKind::Routes) {
        let marker = if report.dry_run { DOT } else { CHECK };
        println!(
            "  {marker}{} {} ({})",
            style(verb).green(),
            style(file.path.display()).dim(),
            style(&file.description).dim()
        );
    }

    match &report.routes {
        RoutesOutcome::Skipped => {
            println!("  {DOT}{}", style("routes skipped (--skip-routes)").yellow());
        }
        RoutesOutcome::Unchanged => {
            println!("  {DOT}{}", style("routes already registered, left unchanged").yellow());
        }
        RoutesOutcome::Patched { patch, before, after } => {
            let mut added = Vec::new();
            if patch.import_added {
                added.push("controller import");
            }
            if patch.group_added {
                added.push("route group");
            }
            let marker = if report.dry_run { DOT } else { CHECK };
            let verb = if report.dry_run { "would add" } else { "added" };
            println!(
                "  {marker}{} {} to routes",
                style(verb).green(),
                added.join(" and ")
            );
            if report.dry_run {
                println!();
                print_diff("routes", before, after);
            }
        }
    }

    println!();
    if report.dry_run {
        println!(
            "{} Dry run complete, {} files planned, nothing written.",
            style("✓").green().bold(),
            report.files.len()
        );
    } else {
        println!(
            "{SPARKLES}CRUD {} generated successfully!",
            style(&report.entity).green().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const POSTS_MIGRATION: &str = "import { BaseSchema } from '@adonisjs/lucid/schema'

export default class extends BaseSchema {
  protected tableName = 'posts'

  async up() {
    this.schema.createTable(this.tableName, (table) => {
      table.uuid('id').primary()
      table.string('title').notNullable()
      table.text('body').nullable()
      table.timestamp('created_at')
      table.timestamp('updated_at')
      table.timestamp('deleted_at').nullable()
    })
  }
}
";

    const ROUTES: &str = "import router from '@adonisjs/core/services/router'\n\nrouter.get('/', async () => {\n  return { hello: 'world' }\n})\n";

    fn project() -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("database/migrations")).unwrap();
        fs::write(
            dir.path().join("database/migrations/1763020149395_create_posts_table.ts"),
            POSTS_MIGRATION,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("start")).unwrap();
        fs::write(dir.path().join("start/routes.ts"), ROUTES).unwrap();
        dir
    }

    fn config(root: &Path) -> ScaffoldConfig {
        let mut config = ScaffoldConfig::default();
        // Keep user-wide overrides out of the tests.
        config.templates.dir = Some(root.join("no-templates"));
        config
    }

    fn command(root: &Path, table: &str, model: &str) -> MakeCrudCommand {
        MakeCrudCommand::new(root, config(root), table, model)
    }

    #[test]
    fn test_scaffolds_post() {
        let dir = project();
        let report = command(dir.path(), "posts", "Post").run().unwrap();

        assert_eq!(report.entity, "Post");
        assert_eq!(report.columns.len(), 2);
        assert_eq!(report.written.len(), 5);
        for path in [
            "app/models/post.ts",
            "app/services/post_service.ts",
            "app/controllers/post_controller.ts",
            "app/validators/post_validator.ts",
        ] {
            assert!(dir.path().join(path).is_file(), "{path} missing");
        }

        let routes = fs::read_to_string(dir.path().join("start/routes.ts")).unwrap();
        assert!(routes.contains("const PostController = () => import('#controllers/post_controller')"));
        assert!(routes.ends_with("  .prefix('posts')\n"));
    }

    #[test]
    fn test_rerun_leaves_routes_unchanged() {
        let dir = project();
        command(dir.path(), "posts", "Post").run().unwrap();
        let first = fs::read_to_string(dir.path().join("start/routes.ts")).unwrap();

        let report = command(dir.path(), "posts", "Post").run().unwrap();
        assert_eq!(report.routes, RoutesOutcome::Unchanged);
        assert_eq!(report.written.len(), 4);
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), first);
    }

    #[test]
    fn test_missing_migration_writes_nothing() {
        let dir = project();
        let err = command(dir.path(), "comments", "Comment").run().unwrap_err();

        assert!(matches!(err, ScaffoldError::MigrationNotFound { ref table, .. } if table == "comments"));
        assert!(!dir.path().join("app").exists());
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), ROUTES);
    }

    #[test]
    fn test_empty_arguments_are_usage_errors() {
        let dir = project();
        assert!(matches!(
            command(dir.path(), "", "Post").run(),
            Err(ScaffoldError::Usage(_))
        ));
        assert!(matches!(
            command(dir.path(), "posts", "  ").run(),
            Err(ScaffoldError::Usage(_))
        ));
    }

    #[test]
    fn test_invalid_model_name_is_usage_error_before_lookup() {
        let dir = project();
        let err = command(dir.path(), "invoices", "1Post").run().unwrap_err();
        assert!(matches!(err, ScaffoldError::Usage(ref message) if message.contains("1Post")));
    }

    #[test]
    fn test_prefix_taken_by_other_entity_writes_nothing() {
        let dir = project();
        command(dir.path(), "posts", "Post").run().unwrap();
        let routes = fs::read_to_string(dir.path().join("start/routes.ts")).unwrap();

        let err = command(dir.path(), "posts", "Article").run().unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::RouteConflict { ref controller, .. } if controller == "ArticleController"
        ));
        assert!(err.is_pre_write());
        assert!(!dir.path().join("app/models/article.ts").exists());
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), routes);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = project();
        let report = command(dir.path(), "posts", "Post").dry_run(true).run().unwrap();

        assert!(report.dry_run);
        assert!(report.written.is_empty());
        assert_eq!(report.files.len(), 5);
        assert!(matches!(report.routes, RoutesOutcome::Patched { .. }));
        assert!(!dir.path().join("app").exists());
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), ROUTES);
    }

    #[test]
    fn test_skip_routes() {
        let dir = project();
        let report = command(dir.path(), "posts", "Post").skip_routes(true).run().unwrap();

        assert_eq!(report.routes, RoutesOutcome::Skipped);
        assert_eq!(report.written.len(), 4);
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), ROUTES);
    }

    #[test]
    fn test_missing_routes_file_is_read_error_before_writes() {
        let dir = project();
        fs::remove_file(dir.path().join("start/routes.ts")).unwrap();

        let err = command(dir.path(), "posts", "Post").run().unwrap_err();
        assert!(matches!(err, ScaffoldError::Read { .. }));
        assert!(!dir.path().join("app").exists());
    }

    #[test]
    fn test_unwritable_target_rejects_before_writes() {
        let dir = project();
        fs::create_dir_all(dir.path().join("app/validators/post_validator.ts")).unwrap();

        let err = command(dir.path(), "posts", "Post").run().unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Unwritable { artifact: ArtifactKind::Validator, .. }
        ));
        assert!(!dir.path().join("app/models/post.ts").exists());
        assert_eq!(fs::read_to_string(dir.path().join("start/routes.ts")).unwrap(), ROUTES);
    }

    #[test]
    fn test_template_override_is_used() {
        let dir = project();
        let overrides = dir.path().join("stubs");
        fs::create_dir_all(&overrides).unwrap();
        fs::write(overrides.join("service.ts.jinja"), "// {{ entity }} service\n").unwrap();

        let mut config = ScaffoldConfig::default();
        config.templates.dir = Some(PathBuf::from("stubs"));
        MakeCrudCommand::new(dir.path(), config, "posts", "Post").run().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("app/services/post_service.ts")).unwrap(),
            "// Post service\n"
        );
    }
}
