//! Artifact templates
//!
//! The four artifact templates are embedded in the binary and rendered with
//! MiniJinja. A project may replace any of them by placing `<name>.ts.jinja`
//! in its templates directory; see `lucid-scaffold templates eject`.

use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::{Result, ScaffoldError};

/// Names of the artifact templates, in generation order
pub const TEMPLATE_NAMES: [&str; 4] = ["model", "service", "controller", "validator"];

/// Extension used for template override files
pub const OVERRIDE_EXTENSION: &str = "ts.jinja";

/// Lucid model with UUID identity, timestamps and soft deletes
pub const MODEL_TEMPLATE: &str = r"import { DateTime } from 'luxon'
import { BaseModel, beforeCreate, beforeUpdate, column } from '@adonisjs/lucid/orm'
import { compose } from '@adonisjs/core/helpers'
import { SoftDeletes } from 'adonis-lucid-soft-deletes'
import { v4 as uuidv4 } from 'uuid'

export default class {{ entity }} extends compose(BaseModel, SoftDeletes) {
  @column({ isPrimary: true })
  declare id: string

{% for column in columns %}
  @column()
  {{ column.name }}?: {{ column.field_type }}

{% endfor %}
  @column.dateTime({ autoCreate: true, columnName: 'created_at' })
  declare createdAt: DateTime

  @column.dateTime({ columnName: 'updated_at' })
  declare updatedAt: DateTime | null

  @column.dateTime({ columnName: 'deleted_at', serializeAs: null })
  declare deletedAt: DateTime | null

  @beforeCreate()
  public static async assignUuid({{ instance }}: {{ entity }}) {
    {{ instance }}.id = uuidv4()
    {{ instance }}.updatedAt = null
  }

  @beforeUpdate()
  public static setUpdatedTimestamp({{ instance }}: {{ entity }}) {
    {{ instance }}.updatedAt = DateTime.now()
  }
}
";

/// Service with list, create, find, update and delete
pub const SERVICE_TEMPLATE: &str = r"import {{ entity }} from '{{ imports.model }}'
import type { ModelQueryBuilderContract } from '@adonisjs/lucid/types/model'

export default class {{ entity }}Service {
  public static async list(
    query: ModelQueryBuilderContract<typeof {{ entity }}>,
    page: number,
    limit: number
  ) {
    return query.paginate(page, limit)
  }

  public static async create(payload: Partial<{{ entity }}>) {
    return {{ entity }}.create(payload)
  }

  public static async find(id: string) {
    return {{ entity }}.findOrFail(id)
  }

  public static async update(id: string, payload: Partial<{{ entity }}>) {
    const data = await {{ entity }}.findOrFail(id)
    data.merge(payload)
    await data.save()
    return data
  }

  public static async delete(id: string) {
    const data = await {{ entity }}.findOrFail(id)
    await data.delete()
    return true
  }
}
";

/// HTTP controller delegating to the service
pub const CONTROLLER_TEMPLATE: &str = r"import type { HttpContext } from '@adonisjs/core/http'
import {{ entity }}Service from '{{ imports.service }}'
import { create{{ entity }}Validator, update{{ entity }}Validator } from '{{ imports.validator }}'
import {{ entity }} from '{{ imports.model }}'
import { applyQueryOptions } from '#config/query_builder'
import ApiResponse from '#config/api_response'

export default class {{ entity }}Controller {
  async index({ request }: HttpContext) {
    const page = request.input('page', 1)
    const limit = request.input('limit', {{ query.page_size }})

    const query = {{ entity }}.query()

    applyQueryOptions(query, {
      search: request.input('search'),
      searchColumns: [{% for name in query.search_columns %}'{{ name }}'{% if not loop.last %}, {% endif %}{% endfor %}],
      filters: request.input('filters', {}),
      sortBy: request.input('sortBy', '{{ query.sort_by }}'),
      sortDir: request.input('sortDir', '{{ query.sort_dir }}'),
    })

    const data = await {{ entity }}Service.list(query, page, limit)
    return ApiResponse.paginate('{{ plural }} fetched successfully', data)
  }

  async show({ params }: HttpContext) {
    const data = await {{ entity }}Service.find(params.id)
    return ApiResponse.success('{{ plural }} fetched successfully', data)
  }

  async store({ request }: HttpContext) {
    const payload = await request.validateUsing(create{{ entity }}Validator)
    const data = await {{ entity }}Service.create(payload.data as Partial<{{ entity }}>)
    return ApiResponse.success('{{ plural }} created successfully', data)
  }

  async update({ params, request }: HttpContext) {
    const payload = await request.validateUsing(update{{ entity }}Validator)
    const data = await {{ entity }}Service.update(params.id, payload.data as Partial<{{ entity }}>)
    return ApiResponse.success('{{ plural }} updated successfully', data)
  }

  async destroy({ params }: HttpContext) {
    await {{ entity }}Service.delete(params.id)
    return ApiResponse.success('{{ plural }} deleted successfully')
  }
}
";

/// VineJS create and update validators
pub const VALIDATOR_TEMPLATE: &str = r"import vine from '@vinejs/vine'

export const create{{ entity }}Validator = vine.compile(
  vine.object({
    data: vine.object({
{% for column in columns %}
      {{ column.name }}: {{ column.create_rule }},
{% endfor %}
    }),
  })
)

export const update{{ entity }}Validator = vine.compile(
  vine.object({
    data: vine.object({
{% for column in columns %}
      {{ column.name }}: {{ column.update_rule }},
{% endfor %}
    }),
  })
)
";

/// Embedded source of a template
#[must_use]
pub fn default_source(name: &str) -> Option<&'static str> {
    match name {
        "model" => Some(MODEL_TEMPLATE),
        "service" => Some(SERVICE_TEMPLATE),
        "controller" => Some(CONTROLLER_TEMPLATE),
        "validator" => Some(VALIDATOR_TEMPLATE),
        _ => None,
    }
}

/// File name of a template override (`controller` -> `controller.ts.jinja`)
#[must_use]
pub fn override_file_name(name: &str) -> String {
    format!("{name}.{OVERRIDE_EXTENSION}")
}

/// Compiled artifact templates
pub struct TemplateRegistry {
    env: Environment<'static>,
    overridden: Vec<&'static str>,
}

impl TemplateRegistry {
    /// Create a registry holding only the embedded templates
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if an embedded template fails to
    /// compile.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        // Generating TypeScript, not HTML.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for name in TEMPLATE_NAMES {
            let source = default_source(name).unwrap_or_default();
            env.add_template(name, source)
                .map_err(|source| ScaffoldError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            env,
            overridden: Vec::new(),
        })
    }

    /// Create a registry, replacing embedded templates with any overrides
    /// found in `dir`
    ///
    /// A missing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Read`] if an override exists but cannot be
    /// read, or [`ScaffoldError::Template`] if it fails to compile.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut registry = Self::new()?;

        for name in TEMPLATE_NAMES {
            let path = dir.join(override_file_name(name));
            if !path.is_file() {
                continue;
            }

            let source = std::fs::read_to_string(&path).map_err(|source| ScaffoldError::Read {
                path: path.clone(),
                source,
            })?;
            registry
                .env
                .add_template_owned(name, source)
                .map_err(|source| ScaffoldError::Template {
                    name: name.to_string(),
                    source,
                })?;
            registry.overridden.push(name);
            tracing::info!(template = name, path = %path.display(), "using template override");
        }

        Ok(registry)
    }

    /// Whether `name` was replaced by an override
    #[must_use]
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overridden.contains(&name)
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if the template is unknown or
    /// rendering fails (including references to undefined variables).
    pub fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String> {
        let to_error = |source: minijinja::Error| ScaffoldError::Template {
            name: name.to_string(),
            source,
        };

        self.env
            .get_template(name)
            .map_err(to_error)?
            .render(context)
            .map_err(to_error)
    }
}
