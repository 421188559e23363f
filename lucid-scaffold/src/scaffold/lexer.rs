//! Tokenizer for migration source text
//!
//! Produces just enough structure for the column extractor to match
//! `receiver.kind('name', ...)` calls and their chained modifiers: identifiers,
//! string literals (single, double and backtick quoted), numbers and single
//! punctuation characters. Whitespace and comments are dropped.

/// A lexical token borrowed from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Identifier (`table`, `string`, `notNullable`, `$x`)
    Ident(&'a str),
    /// String literal contents without the surrounding quotes
    Str(&'a str),
    /// Numeric literal
    Number(&'a str),
    /// Any other single character (`.`, `(`, `)`, `,`, `;`, `{`, ...)
    Punct(char),
}

/// Split `source` into tokens
///
/// The tokenizer never fails: an unterminated string or block comment simply
/// runs to the end of the input.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, next) in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut previous = '\0';
                for (_, next) in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            '\'' | '"' | '`' => {
                let quote = c;
                let content_start = start + c.len_utf8();
                let mut content_end = source.len();
                let mut escaped = false;
                for (idx, next) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == quote {
                        content_end = idx;
                        break;
                    }
                }
                tokens.push(Token::Str(&source[content_start..content_end]));
            }
            c if is_ident_start(c) => {
                let end = consume_while(&mut chars, source.len(), is_ident_continue);
                tokens.push(Token::Ident(&source[start..end]));
            }
            c if c.is_ascii_digit() => {
                let end = consume_while(&mut chars, source.len(), |ch| {
                    ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'
                });
                tokens.push(Token::Number(&source[start..end]));
            }
            other => tokens.push(Token::Punct(other)),
        }
    }

    tokens
}

/// Advance while `accept` holds; returns the byte offset just past the run
fn consume_while(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    len: usize,
    accept: impl Fn(char) -> bool,
) -> usize {
    while let Some(&(idx, ch)) = chars.peek() {
        if !accept(ch) {
            return idx;
        }
        chars.next();
    }
    len
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
