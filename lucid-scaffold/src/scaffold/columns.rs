//! Column extraction from Lucid/Knex schema migrations
//!
//! Recognizes the declarative table-definition idiom used inside
//! `this.schema.createTable(...)` callbacks:
//!
//! ```text
//! table.string('title').notNullable()
//! table.text('body')
//!   .nullable()
//! table.integer('views', 10)
//! ```
//!
//! Each `receiver.kind('name' ...)` call opens a statement; every `.method(...)`
//! chained onto it belongs to the same statement. A chained `nullable()` marks
//! that column (and only that column) as nullable.

use std::path::Path;

use serde::Serialize;

use super::lexer::{tokenize, Token};
use crate::error::{Result, ScaffoldError};

/// Columns managed by the ORM that never appear in generated field lists
pub const SYSTEM_COLUMNS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Receiver calls that declare constraints, table options or alterations
/// rather than columns
const NON_COLUMN_CALLS: &[&str] = &[
    "foreign",
    "index",
    "unique",
    "primary",
    "check",
    "comment",
    "engine",
    "charset",
    "collate",
    "inherits",
    "setNullable",
    "dropNullable",
    "dropColumn",
    "dropColumns",
    "renameColumn",
    "dropForeign",
    "dropIndex",
    "dropUnique",
    "dropPrimary",
];

/// A column declared in a migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    name: String,
    storage_type: String,
    nullable: bool,
}

impl ColumnDescriptor {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, storage_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            storage_type: storage_type.into(),
            nullable,
        }
    }

    /// Column name as declared
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage type token (`string`, `integer`, ...)
    #[must_use]
    pub fn storage_type(&self) -> &str {
        &self.storage_type
    }

    /// Whether a `nullable()` marker is chained onto the declaration
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Whether this is one of the ORM-managed [`SYSTEM_COLUMNS`]
    #[must_use]
    pub fn is_system(&self) -> bool {
        SYSTEM_COLUMNS.contains(&self.name.as_str())
    }
}

/// Read a migration file and extract its business columns
///
/// # Errors
///
/// Returns [`ScaffoldError::Read`] if the file cannot be read.
pub fn read_columns(path: &Path, receiver: &str) -> Result<Vec<ColumnDescriptor>> {
    let source = std::fs::read_to_string(path).map_err(|source| ScaffoldError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let columns = extract_columns(&source, receiver);
    tracing::debug!(
        path = %path.display(),
        count = columns.len(),
        "extracted columns from migration"
    );
    Ok(columns)
}

/// Extract business columns from migration source text, in declaration order
///
/// System columns are dropped. Duplicate names are kept as declared.
#[must_use]
pub fn extract_columns(source: &str, receiver: &str) -> Vec<ColumnDescriptor> {
    let tokens = tokenize(source);
    let mut columns = Vec::new();
    let mut idx = 0;

    while idx < tokens.len() {
        let Some((kind, name)) = column_call_at(&tokens, idx, receiver) else {
            idx += 1;
            continue;
        };

        // Skip the call's own argument list, then walk the modifier chain.
        let mut cursor = skip_group(&tokens, idx + 3);
        let mut nullable = false;
        while let Some(method) = chained_call_at(&tokens, cursor) {
            match method {
                "nullable" => nullable = true,
                "notNullable" => nullable = false,
                _ => {}
            }
            cursor = skip_group(&tokens, cursor + 2);
        }

        if NON_COLUMN_CALLS.contains(&kind) {
            tracing::trace!(call = kind, "skipping non-column call");
        } else {
            let column = ColumnDescriptor::new(name, kind, nullable);
            if column.is_system() {
                tracing::trace!(column = name, "skipping system column");
            } else {
                columns.push(column);
            }
        }

        idx = cursor.max(idx + 1);
    }

    columns
}

/// Match `receiver . kind ( 'name'` starting at `idx`
fn column_call_at<'a>(tokens: &[Token<'a>], idx: usize, receiver: &str) -> Option<(&'a str, &'a str)> {
    match tokens.get(idx..idx + 5)? {
        [Token::Ident(recv), Token::Punct('.'), Token::Ident(kind), Token::Punct('('), Token::Str(name)]
            if *recv == receiver && !name.is_empty() =>
        {
            Some((*kind, *name))
        }
        _ => None,
    }
}

/// Match `. method (` starting at `idx`
fn chained_call_at<'a>(tokens: &[Token<'a>], idx: usize) -> Option<&'a str> {
    match tokens.get(idx..idx + 3)? {
        [Token::Punct('.'), Token::Ident(method), Token::Punct('(')] => Some(*method),
        _ => None,
    }
}

/// Given the index of an opening parenthesis, return the index just past its
/// matching close (or the end of input when unbalanced)
fn skip_group(tokens: &[Token<'_>], open: usize) -> usize {
    let mut depth = 0usize;
    for (offset, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return offset + 1;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}
