//! Naming helpers for code generation
//!
//! Entity names, file stems, import specifiers and route segments are all
//! derived here so every artifact agrees on them.

use inflector::Inflector;
use phf::phf_set;

/// JavaScript and TypeScript reserved words that cannot name a variable
static RESERVED_WORDS: phf::Set<&'static str> = phf_set! {
    "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "new", "null", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield",
};

/// Naming helpers shared by the templates and the route patcher
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `PascalCase`
    ///
    /// Names that already start with an uppercase letter and contain only
    /// letters and digits are kept as written, so acronyms survive.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_pascal_case("post"), "Post");
    /// assert_eq!(TemplateHelpers::to_pascal_case("user_profile"), "UserProfile");
    /// assert_eq!(TemplateHelpers::to_pascal_case("UserProfile"), "UserProfile");
    /// assert_eq!(TemplateHelpers::to_pascal_case("HTTPLog"), "HTTPLog");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        let mut chars = input.chars();
        let already_pascal = chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_alphanumeric());
        if already_pascal {
            input.to_string()
        } else {
            input.to_pascal_case()
        }
    }

    /// Convert string to camelCase
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_camel_case("UserProfile"), "userProfile");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Variable name for an entity instance
    ///
    /// The camelCase entity name, suffixed with `Record` when that would be a
    /// reserved word.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_instance_name("BlogPost"), "blogPost");
    /// assert_eq!(TemplateHelpers::to_instance_name("Case"), "caseRecord");
    /// ```
    #[must_use]
    pub fn to_instance_name(entity: &str) -> String {
        let name = Self::to_camel_case(entity);
        if RESERVED_WORDS.contains(name.as_str()) {
            format!("{name}Record")
        } else {
            name
        }
    }

    /// File stem shared by all four artifacts: the lowercased entity name
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_file_stem("Post"), "post");
    /// assert_eq!(TemplateHelpers::to_file_stem("UserProfile"), "userprofile");
    /// ```
    #[must_use]
    pub fn to_file_stem(entity: &str) -> String {
        entity.to_lowercase()
    }

    /// Plural route segment for a table
    ///
    /// The lowercased table name, with an `s` appended unless it already ends
    /// in one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_plural_segment("posts"), "posts");
    /// assert_eq!(TemplateHelpers::to_plural_segment("Post"), "posts");
    /// assert_eq!(TemplateHelpers::to_plural_segment("category"), "categorys");
    /// ```
    #[must_use]
    pub fn to_plural_segment(table: &str) -> String {
        let lower = table.to_lowercase();
        if lower.ends_with('s') {
            lower
        } else {
            format!("{lower}s")
        }
    }

    /// Controller class name for an entity
    #[must_use]
    pub fn to_controller_name(entity: &str) -> String {
        format!("{entity}Controller")
    }

    /// Import specifier of an entity's controller module
    ///
    /// # Examples
    ///
    /// ```
    /// # use lucid_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_controller_import("Post"), "#controllers/post_controller");
    /// ```
    #[must_use]
    pub fn to_controller_import(entity: &str) -> String {
        format!("#controllers/{}_controller", Self::to_file_stem(entity))
    }

    /// Whether `input` is usable as a class name once converted to `PascalCase`
    ///
    /// Accepts ASCII letters, digits, underscores and hyphens, starting with a
    /// letter.
    #[must_use]
    pub fn is_valid_entity_name(input: &str) -> bool {
        let mut chars = input.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}
