//! Storage type mapping for generated models and validators
//!
//! Migration column kinds are resolved to a [`StorageClass`] through a static
//! token table; each class owns its model field type and its VineJS rule.
//!
//! | Class        | Model field type      | Rule                                          |
//! |--------------|-----------------------|-----------------------------------------------|
//! | `Text`       | `string`              | `vine.string()`                               |
//! | `Numeric`    | `number`              | `vine.number()`                               |
//! | `Boolean`    | `boolean`             | `vine.boolean()`                              |
//! | `Date`       | `string`              | `vine.date()`                                 |
//! | `Time`       | `string`              | `vine.date({ formats: ['HH:mm:ss', 'HH:mm'] })` |
//! | `Temporal`   | `DateTime`            | `vine.date()`                                 |
//! | `Structured` | `Record<string, any>` | `vine.any()`                                  |
//! | `Uuid`       | `string`              | `vine.string()`                               |
//! | `Untyped`    | `any`                 | `vine.string()`                               |
//!
//! Unknown tokens resolve to `Untyped` instead of failing, so a migration using
//! an exotic column kind still scaffolds.

use std::fmt;

use phf::phf_map;

use super::columns::ColumnDescriptor;

/// Migration column kind tokens and the class each resolves to
static STORAGE_TOKENS: phf::Map<&'static str, StorageClass> = phf_map! {
    "string" => StorageClass::Text,
    "text" => StorageClass::Text,
    "mediumtext" => StorageClass::Text,
    "longtext" => StorageClass::Text,
    "char" => StorageClass::Text,
    "varchar" => StorageClass::Text,
    "integer" => StorageClass::Numeric,
    "int" => StorageClass::Numeric,
    "bigInteger" => StorageClass::Numeric,
    "bigint" => StorageClass::Numeric,
    "increments" => StorageClass::Numeric,
    "bigIncrements" => StorageClass::Numeric,
    "tinyint" => StorageClass::Numeric,
    "smallint" => StorageClass::Numeric,
    "mediumint" => StorageClass::Numeric,
    "decimal" => StorageClass::Numeric,
    "float" => StorageClass::Numeric,
    "double" => StorageClass::Numeric,
    "boolean" => StorageClass::Boolean,
    "bool" => StorageClass::Boolean,
    "date" => StorageClass::Date,
    "time" => StorageClass::Time,
    "datetime" => StorageClass::Temporal,
    "timestamp" => StorageClass::Temporal,
    "timestamptz" => StorageClass::Temporal,
    "json" => StorageClass::Structured,
    "jsonb" => StorageClass::Structured,
    "uuid" => StorageClass::Uuid,
};

/// Coarse storage class of a migration column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    /// Character data
    Text,
    /// Integer and decimal numbers
    Numeric,
    /// Boolean flag
    Boolean,
    /// Calendar date without time
    Date,
    /// Time of day
    Time,
    /// Date and time
    Temporal,
    /// JSON document
    Structured,
    /// UUID stored as text
    Uuid,
    /// Unrecognized kind
    Untyped,
}

/// Field type and base validation rule for one storage class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// TypeScript type of the model property
    pub field_type: &'static str,
    /// VineJS schema expression, without optionality
    pub rule: &'static str,
}

/// Which validator a rule is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationContext {
    /// Create payloads: required unless the column is nullable
    Create,
    /// Update payloads: always optional (partial updates)
    Update,
}

/// A column's resolved model type and validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedField {
    /// TypeScript type of the model property
    pub field_type: &'static str,
    /// Complete VineJS rule, including `.optional()` when applicable
    pub rule: String,
    /// Whether the rule was wrapped as optional
    pub optional: bool,
}

impl StorageClass {
    /// Every class, in table order
    pub const ALL: [Self; 9] = [
        Self::Text,
        Self::Numeric,
        Self::Boolean,
        Self::Date,
        Self::Time,
        Self::Temporal,
        Self::Structured,
        Self::Uuid,
        Self::Untyped,
    ];

    /// Resolve a migration column kind
    ///
    /// Unknown tokens resolve to [`StorageClass::Untyped`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        STORAGE_TOKENS.get(token).copied().unwrap_or_else(|| {
            tracing::debug!(token, "unknown storage type, using untyped fallback");
            Self::Untyped
        })
    }

    /// Whether `token` is a known storage kind
    #[must_use]
    pub fn is_known_token(token: &str) -> bool {
        STORAGE_TOKENS.contains_key(token)
    }

    /// Field type and rule for this class
    #[must_use]
    pub const fn mapping(self) -> TypeMapping {
        match self {
            Self::Text | Self::Uuid => TypeMapping {
                field_type: "string",
                rule: "vine.string()",
            },
            Self::Numeric => TypeMapping {
                field_type: "number",
                rule: "vine.number()",
            },
            Self::Boolean => TypeMapping {
                field_type: "boolean",
                rule: "vine.boolean()",
            },
            Self::Date => TypeMapping {
                field_type: "string",
                rule: "vine.date()",
            },
            Self::Time => TypeMapping {
                field_type: "string",
                rule: "vine.date({ formats: ['HH:mm:ss', 'HH:mm'] })",
            },
            Self::Temporal => TypeMapping {
                field_type: "DateTime",
                rule: "vine.date()",
            },
            Self::Structured => TypeMapping {
                field_type: "Record<string, any>",
                rule: "vine.any()",
            },
            Self::Untyped => TypeMapping {
                field_type: "any",
                rule: "vine.string()",
            },
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::Temporal => "temporal",
            Self::Structured => "structured",
            Self::Uuid => "uuid",
            Self::Untyped => "untyped",
        };
        f.write_str(name)
    }
}

/// Map a storage type token in the given context
///
/// `Update` always yields an optional rule; `Create` yields an optional rule
/// only for nullable columns.
#[must_use]
pub fn map_storage_type(storage_type: &str, nullable: bool, context: ValidationContext) -> MappedField {
    let TypeMapping { field_type, rule } = StorageClass::from_token(storage_type).mapping();
    let optional = match context {
        ValidationContext::Update => true,
        ValidationContext::Create => nullable,
    };
    let rule = if optional {
        format!("{rule}.optional()")
    } else {
        rule.to_string()
    };

    MappedField {
        field_type,
        rule,
        optional,
    }
}

/// Map a column descriptor in the given context
#[must_use]
pub fn map_column(column: &ColumnDescriptor, context: ValidationContext) -> MappedField {
    map_storage_type(column.storage_type(), column.nullable(), context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_tokens() {
        let cases = vec![
            ("string", "string", "vine.string()"),
            ("text", "string", "vine.string()"),
            ("integer", "number", "vine.number()"),
            ("bigInteger", "number", "vine.number()"),
            ("increments", "number", "vine.number()"),
            ("boolean", "boolean", "vine.boolean()"),
            ("date", "string", "vine.date()"),
            ("datetime", "DateTime", "vine.date()"),
            ("timestamp", "DateTime", "vine.date()"),
            ("json", "Record<string, any>", "vine.any()"),
            ("uuid", "string", "vine.string()"),
        ];

        for (token, field_type, rule) in cases {
            let mapped = map_storage_type(token, false, ValidationContext::Create);
            assert_eq!(mapped.field_type, field_type, "field type for {token}");
            assert_eq!(mapped.rule, rule, "rule for {token}");
            assert!(!mapped.optional);
        }
    }

    #[test]
    fn test_time_gets_date_like_rule() {
        let mapped = map_storage_type("time", false, ValidationContext::Create);
        assert_eq!(mapped.field_type, "string");
        assert!(mapped.rule.starts_with("vine.date("));
    }

    #[test]
    fn test_unknown_token_falls_back() {
        assert_eq!(StorageClass::from_token("geometry"), StorageClass::Untyped);
        assert!(!StorageClass::is_known_token("geometry"));

        let mapped = map_storage_type("geometry", false, ValidationContext::Create);
        assert_eq!(mapped.field_type, "any");
        assert_eq!(mapped.rule, "vine.string()");
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!(StorageClass::from_token("biginteger"), StorageClass::Untyped);
        assert_eq!(StorageClass::from_token("bigInteger"), StorageClass::Numeric);
    }

    #[test]
    fn test_every_class_is_reachable_or_fallback() {
        for class in StorageClass::ALL {
            let reachable = STORAGE_TOKENS.values().any(|c| *c == class);
            assert!(
                reachable || class == StorageClass::Untyped,
                "{class} has no storage token"
            );
            assert!(!class.mapping().rule.ends_with(".optional()"));
        }
    }

    #[test]
    fn test_create_respects_nullability() {
        let required = map_storage_type("string", false, ValidationContext::Create);
        let optional = map_storage_type("string", true, ValidationContext::Create);
        assert_eq!(required.rule, "vine.string()");
        assert_eq!(optional.rule, "vine.string().optional()");
    }

    #[test]
    fn test_update_is_always_optional() {
        let a = map_storage_type("integer", false, ValidationContext::Update);
        let b = map_storage_type("integer", true, ValidationContext::Update);
        assert_eq!(a.rule, "vine.number().optional()");
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_column() {
        let column = ColumnDescriptor::new("body", "text", true);
        let mapped = map_column(&column, ValidationContext::Create);
        assert_eq!(mapped.rule, "vine.string().optional()");
        assert!(mapped.optional);
    }

    fn any_token() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(STORAGE_TOKENS.keys().copied().collect::<Vec<_>>())
                .prop_map(str::to_string),
            "[a-zA-Z]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_mapping_is_pure(token in any_token(), nullable in any::<bool>(), update in any::<bool>()) {
            let context = if update { ValidationContext::Update } else { ValidationContext::Create };
            prop_assert_eq!(
                map_storage_type(&token, nullable, context),
                map_storage_type(&token, nullable, context)
            );
        }

        #[test]
        fn prop_update_always_optional(token in any_token(), nullable in any::<bool>()) {
            let mapped = map_storage_type(&token, nullable, ValidationContext::Update);
            prop_assert!(mapped.optional);
            prop_assert!(mapped.rule.ends_with(".optional()"));
        }

        #[test]
        fn prop_create_non_nullable_is_required(token in any_token()) {
            let mapped = map_storage_type(&token, false, ValidationContext::Create);
            prop_assert!(!mapped.optional);
            prop_assert!(!mapped.rule.ends_with(".optional()"));
        }
    }
}
