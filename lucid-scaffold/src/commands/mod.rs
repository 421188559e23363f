//! CLI commands

pub mod make_crud;
pub mod templates;

pub use make_crud::{MakeCrudCommand, RoutesOutcome, ScaffoldReport};
pub use templates::TemplatesCommand;

use console::{style, Emoji};
use similar::{ChangeTag, TextDiff};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static DOT: Emoji<'_, '_> = Emoji("• ", "- ");
static SPARKLES: Emoji<'_, '_> = Emoji("✨ ", "");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static FILE: Emoji<'_, '_> = Emoji("📄 ", "");
static CUSTOM: Emoji<'_, '_> = Emoji("✨ ", "* ");
static DEFAULT: Emoji<'_, '_> = Emoji("  ", "  ");

/// Print a line diff from `old` to `new`, showing three lines of context
/// around each change
fn print_diff(title: &str, old: &str, new: &str) {
    println!("{FILE}{}", style(title).bold());

    let diff = TextDiff::from_lines(old, new);
    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("{}", style("  ...").dim());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = change.value().trim_end_matches(['\r', '\n']);
                match change.tag() {
                    ChangeTag::Delete => println!("{}", style(format!("-{line}")).red()),
                    ChangeTag::Insert => println!("{}", style(format!("+{line}")).green()),
                    ChangeTag::Equal => println!(" {line}"),
                }
            }
        }
    }
    println!();
}
