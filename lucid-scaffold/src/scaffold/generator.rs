//! CRUD scaffold generator
//!
//! Turns an [`EntitySpec`] into the four artifact files (model, service,
//! controller, validator). Generation is pure: the same spec and options always
//! produce byte-identical output, and nothing touches the filesystem here.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use super::columns::ColumnDescriptor;
use super::field_type::{map_column, StorageClass, ValidationContext};
use super::helpers::TemplateHelpers;
use super::routes::RouteResource;
use super::templates::TemplateRegistry;
use crate::error::{Result, ScaffoldError};

/// Kind of file produced by a scaffold run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Lucid model
    Model,
    /// Service wrapping model access
    Service,
    /// HTTP controller
    Controller,
    /// VineJS validators
    Validator,
    /// Shared routes file
    Routes,
}

impl ArtifactKind {
    /// Artifacts rendered from templates, in write order
    pub const GENERATED: [Self; 4] = [Self::Model, Self::Service, Self::Controller, Self::Validator];

    /// Lowercase name, also used as the template name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Validator => "validator",
            Self::Routes => "routes",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity being scaffolded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    entity_name: String,
    plural_segment: String,
    columns: Vec<ColumnDescriptor>,
}

impl EntitySpec {
    /// Derive an entity from the command arguments and extracted columns
    ///
    /// The entity name is the `PascalCase` form of `model_name`; the plural
    /// route segment comes from `table_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Usage`] if either name is empty or not a plain
    /// identifier.
    pub fn new(table_name: &str, model_name: &str, columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let table_name = table_name.trim();
        let model_name = model_name.trim();
        Self::validate_names(table_name, model_name)?;

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                tracing::warn!(column = column.name(), "column declared more than once, emitting both");
            }
        }

        Ok(Self {
            entity_name: TemplateHelpers::to_pascal_case(model_name),
            plural_segment: TemplateHelpers::to_plural_segment(table_name),
            columns,
        })
    }

    /// Check the command arguments without touching the filesystem
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Usage`] if either name is empty or not a plain
    /// identifier.
    pub fn validate_names(table_name: &str, model_name: &str) -> Result<()> {
        let table_name = table_name.trim();
        let model_name = model_name.trim();

        if table_name.is_empty() {
            return Err(ScaffoldError::Usage("table name must not be empty".to_string()));
        }
        if !TemplateHelpers::is_valid_entity_name(table_name) {
            return Err(ScaffoldError::Usage(format!(
                "invalid table name '{table_name}': use letters, digits, '_' or '-'"
            )));
        }
        if model_name.is_empty() {
            return Err(ScaffoldError::Usage("model name must not be empty".to_string()));
        }
        if !TemplateHelpers::is_valid_entity_name(model_name) {
            return Err(ScaffoldError::Usage(format!(
                "invalid model name '{model_name}': use a PascalCase identifier such as 'Post'"
            )));
        }
        Ok(())
    }

    /// `PascalCase` class name (`Post`)
    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Route prefix and message noun (`posts`)
    #[must_use]
    pub fn plural_segment(&self) -> &str {
        &self.plural_segment
    }

    /// Business columns in declaration order
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// File stem shared by every artifact (`post`)
    #[must_use]
    pub fn file_stem(&self) -> String {
        TemplateHelpers::to_file_stem(&self.entity_name)
    }

    /// Variable name for an instance in generated hooks (`post`)
    #[must_use]
    pub fn instance_name(&self) -> String {
        TemplateHelpers::to_instance_name(&self.entity_name)
    }

    /// Route registration for this entity
    #[must_use]
    pub fn route_resource(&self) -> RouteResource {
        RouteResource::new(&self.entity_name, &self.plural_segment)
    }
}

/// Settings that shape generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Directory for models, relative to the project root
    pub models_dir: PathBuf,
    /// Directory for services
    pub services_dir: PathBuf,
    /// Directory for controllers
    pub controllers_dir: PathBuf,
    /// Directory for validators
    pub validators_dir: PathBuf,
    /// Default `limit` of the index handler
    pub page_size: u32,
    /// Default sort column of the index handler
    pub sort_by: String,
    /// Default sort direction of the index handler
    pub sort_dir: String,
    /// Columns searched by the index handler; `None` means every text column
    pub search_columns: Option<Vec<String>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("app/models"),
            services_dir: PathBuf::from("app/services"),
            controllers_dir: PathBuf::from("app/controllers"),
            validators_dir: PathBuf::from("app/validators"),
            page_size: 10,
            sort_by: "created_at".to_string(),
            sort_dir: "desc".to_string(),
            search_columns: None,
        }
    }
}

/// A rendered artifact waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// What this file is
    pub artifact: ArtifactKind,
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

/// CRUD scaffold generator
pub struct ScaffoldGenerator {
    spec: EntitySpec,
    options: GeneratorOptions,
    templates: TemplateRegistry,
}

impl ScaffoldGenerator {
    /// Create a generator for `spec`
    #[must_use]
    pub const fn new(spec: EntitySpec, options: GeneratorOptions, templates: TemplateRegistry) -> Self {
        Self {
            spec,
            options,
            templates,
        }
    }

    /// The entity being generated
    #[must_use]
    pub const fn spec(&self) -> &EntitySpec {
        &self.spec
    }

    /// Generate all four artifacts in write order
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if any template fails to render.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        ArtifactKind::GENERATED
            .into_iter()
            .map(|artifact| self.generate_artifact(artifact))
            .collect()
    }

    /// Generate the model file
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if rendering fails.
    pub fn generate_model(&self) -> Result<GeneratedFile> {
        self.generate_artifact(ArtifactKind::Model)
    }

    /// Generate the service file
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if rendering fails.
    pub fn generate_service(&self) -> Result<GeneratedFile> {
        self.generate_artifact(ArtifactKind::Service)
    }

    /// Generate the controller file
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if rendering fails.
    pub fn generate_controller(&self) -> Result<GeneratedFile> {
        self.generate_artifact(ArtifactKind::Controller)
    }

    /// Generate the validator file
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if rendering fails.
    pub fn generate_validator(&self) -> Result<GeneratedFile> {
        self.generate_artifact(ArtifactKind::Validator)
    }

    fn generate_artifact(&self, artifact: ArtifactKind) -> Result<GeneratedFile> {
        let content = self.templates.render(artifact.as_str(), &self.model_metadata())?;
        let entity = self.spec.entity_name();
        let stem = self.spec.file_stem();

        let (path, description) = match artifact {
            ArtifactKind::Model => (
                self.options.models_dir.join(format!("{stem}.ts")),
                format!("Lucid model for {entity}"),
            ),
            ArtifactKind::Service => (
                self.options.services_dir.join(format!("{stem}_service.ts")),
                format!("Service for {entity}"),
            ),
            ArtifactKind::Controller => (
                self.options.controllers_dir.join(format!("{stem}_controller.ts")),
                format!("CRUD controller for {entity}"),
            ),
            ArtifactKind::Validator => (
                self.options.validators_dir.join(format!("{stem}_validator.ts")),
                format!("Create and update validators for {entity}"),
            ),
            ArtifactKind::Routes => {
                return Err(ScaffoldError::Usage(
                    "routes are patched, not generated from a template".to_string(),
                ))
            }
        };

        tracing::debug!(%artifact, path = %path.display(), bytes = content.len(), "rendered artifact");
        Ok(GeneratedFile {
            artifact,
            path,
            content,
            description,
        })
    }

    /// Template variables for every artifact
    #[must_use]
    pub fn model_metadata(&self) -> serde_json::Value {
        let stem = self.spec.file_stem();

        let columns: Vec<_> = self
            .spec
            .columns()
            .iter()
            .map(|column| {
                let create = map_column(column, ValidationContext::Create);
                let update = map_column(column, ValidationContext::Update);
                serde_json::json!({
                    "name": column.name(),
                    "storage_type": column.storage_type(),
                    "nullable": column.nullable(),
                    "field_type": create.field_type,
                    "create_rule": create.rule,
                    "update_rule": update.rule,
                })
            })
            .collect();

        serde_json::json!({
            "entity": self.spec.entity_name(),
            "instance": self.spec.instance_name(),
            "stem": stem,
            "plural": self.spec.plural_segment(),
            "imports": {
                "model": format!("#models/{stem}"),
                "service": format!("#services/{stem}_service"),
                "validator": format!("#validators/{stem}_validator"),
                "controller": TemplateHelpers::to_controller_import(self.spec.entity_name()),
            },
            "query": {
                "page_size": self.options.page_size,
                "sort_by": self.options.sort_by,
                "sort_dir": self.options.sort_dir,
                "search_columns": self.search_columns(),
            },
            "columns": columns,
        })
    }

    /// Configured search columns, or every text column in declaration order
    fn search_columns(&self) -> Vec<String> {
        self.options.search_columns.clone().unwrap_or_else(|| {
            self.spec
                .columns()
                .iter()
                .filter(|column| StorageClass::from_token(column.storage_type()) == StorageClass::Text)
                .map(|column| column.name().to_string())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn post_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("title", "string", false),
            ColumnDescriptor::new("body", "text", true),
        ]
    }

    fn post_generator() -> ScaffoldGenerator {
        let spec = EntitySpec::new("posts", "Post", post_columns()).unwrap();
        ScaffoldGenerator::new(spec, GeneratorOptions::default(), TemplateRegistry::new().unwrap())
    }

    #[test]
    fn test_entity_spec_names() {
        let spec = EntitySpec::new("user_profiles", "user_profile", vec![]).unwrap();
        assert_eq!(spec.entity_name(), "UserProfile");
        assert_eq!(spec.plural_segment(), "user_profiles");
        assert_eq!(spec.file_stem(), "userprofile");
        assert_eq!(spec.instance_name(), "userProfile");
    }

    #[test]
    fn test_plural_segment_comes_from_table() {
        let spec = EntitySpec::new("post", "Post", vec![]).unwrap();
        assert_eq!(spec.plural_segment(), "posts");
    }

    #[test]
    fn test_invalid_names_are_usage_errors() {
        for (table, model) in [("", "Post"), ("posts", ""), ("posts", "1Post"), ("po sts", "Post")] {
            let result = EntitySpec::new(table, model, vec![]);
            assert!(
                matches!(result, Err(ScaffoldError::Usage(_))),
                "({table:?}, {model:?}) should be rejected"
            );
        }
    }

    #[test]
    fn test_artifact_kind_display() {
        assert_eq!(ArtifactKind::Controller.to_string(), "controller");
        assert_eq!(ArtifactKind::Routes.to_string(), "routes");
    }

    #[test]
    fn test_generate_paths_and_order() {
        let files = post_generator().generate().unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("app/models/post.ts"),
                PathBuf::from("app/services/post_service.ts"),
                PathBuf::from("app/controllers/post_controller.ts"),
                PathBuf::from("app/validators/post_validator.ts"),
            ]
        );
        let kinds: Vec<_> = files.iter().map(|f| f.artifact).collect();
        assert_eq!(kinds, ArtifactKind::GENERATED.to_vec());
    }

    #[test]
    fn test_generate_model() {
        let model = post_generator().generate_model().unwrap();
        let content = &model.content;

        assert!(content.contains("export default class Post extends compose(BaseModel, SoftDeletes) {"));
        assert!(content.contains("  @column()\n  title?: string\n"));
        assert!(content.contains("  @column()\n  body?: string\n"));
        assert!(content.contains("declare id: string"));
        assert!(content.contains("serializeAs: null"));
        assert!(content.contains("public static async assignUuid(post: Post) {"));
        assert!(content.contains("    post.id = uuidv4()\n    post.updatedAt = null\n"));
        assert!(content.contains("post.updatedAt = DateTime.now()"));
        assert!(content.find("title?:") < content.find("body?:"));
    }

    #[test]
    fn test_model_hooks_avoid_reserved_parameter_names() {
        let spec = EntitySpec::new("cases", "Case", vec![]).unwrap();
        let generator = ScaffoldGenerator::new(spec, GeneratorOptions::default(), TemplateRegistry::new().unwrap());
        let content = generator.generate_model().unwrap().content;

        assert!(content.contains("public static async assignUuid(caseRecord: Case) {"));
        assert!(content.contains("public static setUpdatedTimestamp(caseRecord: Case) {"));
        assert!(!content.contains("(case: Case)"));
    }

    #[test]
    fn test_generate_service() {
        let service = post_generator().generate_service().unwrap();
        let content = &service.content;

        assert!(content.starts_with("import Post from '#models/post'\n"));
        assert!(content.contains("return query.paginate(page, limit)"));
        assert!(content.contains("public static async find(id: string) {\n    return Post.findOrFail(id)"));
        assert!(content.contains("data.merge(payload)\n    await data.save()"));
        assert!(content.contains("await data.delete()\n    return true"));
    }

    #[test]
    fn test_generate_controller() {
        let controller = post_generator().generate_controller().unwrap();
        let content = &controller.content;

        assert!(content.contains("import PostService from '#services/post_service'"));
        assert!(content.contains(
            "import { createPostValidator, updatePostValidator } from '#validators/post_validator'"
        ));
        assert!(content.contains("const limit = request.input('limit', 10)"));
        assert!(content.contains("searchColumns: ['title', 'body'],"));
        assert!(content.contains("sortBy: request.input('sortBy', 'created_at'),"));
        assert!(content.contains("sortDir: request.input('sortDir', 'desc'),"));
        assert!(content.contains("return ApiResponse.paginate('posts fetched successfully', data)"));
        for handler in ["index", "show", "store", "update", "destroy"] {
            assert!(content.contains(&format!("  async {handler}(")), "missing {handler}");
        }
    }

    #[test]
    fn test_generate_validator_rules() {
        let validator = post_generator().generate_validator().unwrap();
        let content = &validator.content;

        let (create, update) = content.split_once("export const updatePostValidator").unwrap();
        assert!(create.contains("      title: vine.string(),\n      body: vine.string().optional(),\n"));
        assert!(update.contains(
            "      title: vine.string().optional(),\n      body: vine.string().optional(),\n"
        ));
    }

    #[test]
    fn test_columnless_entity_generates_everything() {
        let spec = EntitySpec::new("tags", "Tag", vec![]).unwrap();
        let generator = ScaffoldGenerator::new(spec, GeneratorOptions::default(), TemplateRegistry::new().unwrap());
        let files = generator.generate().unwrap();

        assert_eq!(files.len(), 4);
        let validator = &files[3].content;
        assert!(validator.contains("    data: vine.object({\n    }),"));
        assert!(files[2].content.contains("searchColumns: [],"));
        assert!(files[0].content.contains("declare id: string\n\n  @column.dateTime"));
    }

    #[test]
    fn test_configured_options() {
        let options = GeneratorOptions {
            models_dir: PathBuf::from("src/models"),
            page_size: 25,
            sort_by: "title".to_string(),
            sort_dir: "asc".to_string(),
            search_columns: Some(vec!["body".to_string()]),
            ..GeneratorOptions::default()
        };
        let spec = EntitySpec::new("posts", "Post", post_columns()).unwrap();
        let generator = ScaffoldGenerator::new(spec, options, TemplateRegistry::new().unwrap());

        assert_eq!(generator.generate_model().unwrap().path, PathBuf::from("src/models/post.ts"));
        let controller = generator.generate_controller().unwrap().content;
        assert!(controller.contains("request.input('limit', 25)"));
        assert!(controller.contains("searchColumns: ['body'],"));
        assert!(controller.contains("request.input('sortBy', 'title')"));
        assert!(controller.contains("request.input('sortDir', 'asc')"));
    }

    #[test]
    fn test_json_column_maps_to_record() {
        let spec = EntitySpec::new(
            "settings",
            "Setting",
            vec![ColumnDescriptor::new("payload", "json", false)],
        )
        .unwrap();
        let generator = ScaffoldGenerator::new(spec, GeneratorOptions::default(), TemplateRegistry::new().unwrap());

        assert!(generator.generate_model().unwrap().content.contains("payload?: Record<string, any>"));
        assert!(generator.generate_validator().unwrap().content.contains("payload: vine.any(),"));
    }

    fn any_columns() -> impl Strategy<Value = Vec<ColumnDescriptor>> {
        prop::collection::vec(
            (
                "[a-z][a-z0-9_]{0,10}",
                prop::sample::select(vec!["string", "integer", "boolean", "timestamp", "json", "point"]),
                any::<bool>(),
            )
                .prop_map(|(name, kind, nullable)| ColumnDescriptor::new(name, kind, nullable)),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(columns in any_columns()) {
            let build = || {
                let spec = EntitySpec::new("items", "Item", columns.clone()).unwrap();
                ScaffoldGenerator::new(spec, GeneratorOptions::default(), TemplateRegistry::new().unwrap())
                    .generate()
                    .unwrap()
            };
            prop_assert_eq!(build(), build());
        }
    }
}
