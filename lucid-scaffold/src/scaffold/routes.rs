//! Route registration in `start/routes.ts`
//!
//! The routes file is parsed into a small line model that remembers where the
//! import block ends, which lazy controller bindings exist and which route
//! group prefixes are registered. Inserts are applied against that model and
//! the file is rendered back to text, so everything outside the two insertion
//! points is preserved byte for byte (apart from line-ending normalization of
//! the final newline).

use super::helpers::TemplateHelpers;
use super::lexer::{tokenize, Token};
use crate::error::{Result, ScaffoldError};

/// Route registration for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResource {
    entity: String,
    controller: String,
    import_path: String,
    prefix: String,
}

impl RouteResource {
    /// Routes for `entity` mounted under `prefix`
    #[must_use]
    pub fn new(entity: &str, prefix: &str) -> Self {
        Self {
            entity: entity.to_string(),
            controller: TemplateHelpers::to_controller_name(entity),
            import_path: TemplateHelpers::to_controller_import(entity),
            prefix: prefix.to_string(),
        }
    }

    /// Controller binding name (`PostController`)
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Route group prefix (`posts`)
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Lazy import binding for the controller
    #[must_use]
    pub fn binding_line(&self) -> String {
        format!("const {} = () => import('{}')", self.controller, self.import_path)
    }

    /// The five CRUD routes grouped under the prefix
    #[must_use]
    pub fn group_lines(&self) -> Vec<String> {
        let c = &self.controller;
        vec![
            format!("// CRUD {}", self.entity),
            "router".to_string(),
            "  .group(() => {".to_string(),
            format!("    router.get('/', [{c}, 'index'])"),
            format!("    router.get('/:id', [{c}, 'show'])"),
            format!("    router.post('/', [{c}, 'store'])"),
            format!("    router.put('/:id', [{c}, 'update'])"),
            format!("    router.delete('/:id', [{c}, 'destroy'])"),
            "  })".to_string(),
            format!("  .prefix('{}')", self.prefix),
        ]
    }
}

/// What [`RoutesFile::add_resource`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutePatch {
    /// A controller binding was inserted after the imports
    pub import_added: bool,
    /// A route group was appended
    pub group_added: bool,
}

impl RoutePatch {
    /// Whether the file is unchanged
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        !self.import_added && !self.group_added
    }
}

/// A route group mounted with `.prefix(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedGroup {
    prefix: String,
    controller: Option<String>,
}

impl MountedGroup {
    /// Prefix as written in the file
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// First controller referenced by the group's routes (`[X, 'index']`)
    #[must_use]
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    fn mounts(&self, prefix: &str) -> bool {
        self.prefix.trim_matches('/') == prefix.trim_matches('/')
    }
}

/// Parsed routes file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesFile {
    lines: Vec<String>,
    newline: &'static str,
    import_anchor: Option<usize>,
    bindings: Vec<String>,
    groups: Vec<MountedGroup>,
}

impl RoutesFile {
    /// Parse routes file text
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        let mut import_anchor = None;
        let mut bindings = Vec::new();
        let mut groups = Vec::new();
        let mut pending_controller: Option<String> = None;
        let mut open_import = false;
        let mut in_comment = false;

        for (idx, line) in lines.iter().enumerate() {
            if in_comment {
                in_comment = !line.contains("*/");
                continue;
            }
            if line.trim_start().starts_with("/*") && !line.contains("*/") {
                in_comment = true;
                continue;
            }
            if open_import {
                if line.contains('}') {
                    import_anchor = Some(idx);
                    open_import = false;
                }
                continue;
            }

            if is_import_statement(line) {
                import_anchor = Some(idx);
                open_import = line.contains('{') && !line.contains('}');
            } else if let Some(name) = lazy_binding_name(line) {
                import_anchor = Some(idx);
                bindings.push(name.to_string());
            } else {
                if pending_controller.is_none() {
                    pending_controller = route_controller(line).map(str::to_string);
                }
                if let Some(prefix) = group_prefix(line) {
                    groups.push(MountedGroup {
                        prefix: prefix.to_string(),
                        controller: pending_controller.take(),
                    });
                }
            }
        }

        Self {
            lines,
            newline,
            import_anchor,
            bindings,
            groups,
        }
    }

    /// Index of the last import line, if any
    #[must_use]
    pub const fn import_anchor(&self) -> Option<usize> {
        self.import_anchor
    }

    /// Controller names bound with `const X = () => import(...)`
    #[must_use]
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Prefixes of registered route groups
    #[must_use]
    pub fn prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(MountedGroup::prefix).collect()
    }

    /// Group mounted at `prefix`, ignoring leading and trailing slashes
    #[must_use]
    pub fn group(&self, prefix: &str) -> Option<&MountedGroup> {
        self.groups.iter().find(|group| group.mounts(prefix))
    }

    /// Whether a lazy binding named `controller` exists
    #[must_use]
    pub fn has_binding(&self, controller: &str) -> bool {
        self.bindings.iter().any(|name| name == controller)
    }

    /// Whether a route group is mounted at `prefix`
    ///
    /// Leading and trailing slashes are ignored.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.group(prefix).is_some()
    }

    /// Insert the binding and append the route group unconditionally
    ///
    /// Applying this twice registers the resource twice. When the file has no
    /// import line the binding is skipped and only the group is appended.
    pub fn append_resource(&mut self, resource: &RouteResource) {
        self.insert_binding(resource);
        self.append_group(resource);
    }

    /// Register `resource`, skipping whatever is already present
    ///
    /// The binding is skipped when a binding with the same controller name
    /// exists; the group is skipped when its prefix is already mounted for the
    /// same controller.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::RouteConflict`] when the prefix is mounted by a
    /// group that does not route to this controller. Nothing is changed then.
    pub fn add_resource(&mut self, resource: &RouteResource) -> Result<RoutePatch> {
        if let Some(group) = self.group(resource.prefix()) {
            if group.controller() != Some(resource.controller()) {
                return Err(ScaffoldError::RouteConflict {
                    prefix: resource.prefix().to_string(),
                    controller: resource.controller().to_string(),
                    owner: group.controller.clone(),
                });
            }
        }

        let import_added = if self.has_binding(resource.controller()) {
            tracing::debug!(controller = resource.controller(), "controller binding already present");
            false
        } else {
            self.insert_binding(resource)
        };

        let group_added = if self.has_prefix(resource.prefix()) {
            tracing::debug!(prefix = resource.prefix(), "route group already registered");
            false
        } else {
            self.append_group(resource);
            true
        };

        Ok(RoutePatch {
            import_added,
            group_added,
        })
    }

    /// Serialize back to text, ending with a single newline
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.lines.join(self.newline);
        text.push_str(self.newline);
        text
    }

    fn insert_binding(&mut self, resource: &RouteResource) -> bool {
        let Some(anchor) = self.import_anchor else {
            tracing::debug!(controller = resource.controller(), "no import line, skipping binding");
            return false;
        };

        self.lines.insert(anchor + 1, String::new());
        self.lines.insert(anchor + 2, resource.binding_line());
        self.import_anchor = Some(anchor + 2);
        self.bindings.push(resource.controller().to_string());
        true
    }

    fn append_group(&mut self, resource: &RouteResource) {
        self.lines.extend(resource.group_lines());
        self.groups.push(MountedGroup {
            prefix: resource.prefix().to_string(),
            controller: Some(resource.controller().to_string()),
        });
    }
}

/// A top-level `import ... from '...'` statement (static imports only)
fn is_import_statement(line: &str) -> bool {
    matches!(
        tokenize(line).as_slice(),
        [Token::Ident("import"), next, ..] if *next != Token::Punct('(')
    ) && !line.starts_with(char::is_whitespace)
}

/// Name bound by `const Name = () => import('...')`
fn lazy_binding_name(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    match tokenize(line).as_slice() {
        [Token::Ident("const"), Token::Ident(name), Token::Punct('='), Token::Punct('('), Token::Punct(')'), Token::Punct('='), Token::Punct('>'), Token::Ident("import"), Token::Punct('('), ..] => {
            Some(*name)
        }
        _ => None,
    }
}

/// Controller of the first `[Controller, 'action']` handler on this line
fn route_controller(line: &str) -> Option<&str> {
    tokenize(line).windows(4).find_map(|window| match window {
        [Token::Punct('['), Token::Ident(name), Token::Punct(','), Token::Str(_)] => Some(*name),
        _ => None,
    })
}

/// Argument of a `.prefix('...')` call on this line
fn group_prefix(line: &str) -> Option<&str> {
    tokenize(line).windows(4).find_map(|window| match window {
        [Token::Punct('.'), Token::Ident("prefix"), Token::Punct('('), Token::Str(prefix)] => Some(*prefix),
        _ => None,
    })
}
