//! Statement guard for model-written queries
//!
//! The connection is already read-only; the guard rejects obviously wrong
//! statements early with a message the model can act on.

use sales_agent_domain::ProviderError;

/// Message returned when a query has no LIMIT clause
pub const MISSING_LIMIT_MESSAGE: &str =
    "Query must include 'LIMIT 20' to prevent returning too many rows. Please modify your query.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementGuard {
    require_limit: bool,
}

impl StatementGuard {
    pub fn new(require_limit: bool) -> Self {
        Self { require_limit }
    }

    pub fn require_limit(&self) -> bool {
        self.require_limit
    }

    /// Check `query`, returning the statement to run.
    ///
    /// Trailing `;` and trailing comments are removed. String literals,
    /// quoted identifiers and comments are not scanned for keywords or `;`.
    pub fn check<'q>(&self, query: &'q str) -> Result<&'q str, ProviderError> {
        let masked = mask_literals(query);
        let end = masked
            .trim_end_matches(|c: char| c.is_whitespace() || c == ';')
            .len();
        let code = &masked[..end];
        if code.trim().is_empty() {
            return Err(ProviderError::Rejected("Query is empty".to_string()));
        }

        if code.contains(';') {
            return Err(ProviderError::Rejected(
                "Only a single statement is allowed per query".to_string(),
            ));
        }

        match keywords(code).next() {
            Some(first) if first.eq_ignore_ascii_case("SELECT") || first.eq_ignore_ascii_case("WITH") => {}
            _ => {
                return Err(ProviderError::Rejected(
                    "Only read-only SELECT queries are allowed".to_string(),
                ));
            }
        }

        if self.require_limit && !keywords(code).any(|w| w.eq_ignore_ascii_case("LIMIT")) {
            return Err(ProviderError::Rejected(MISSING_LIMIT_MESSAGE.to_string()));
        }

        Ok(query[..end].trim_start())
    }
}

impl Default for StatementGuard {
    fn default() -> Self {
        Self::new(true)
    }
}

fn keywords(statement: &str) -> impl Iterator<Item = &str> {
    statement
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

#[derive(Clone, Copy, PartialEq)]
enum Lexeme {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Blank out quoted text and comments, keeping byte offsets.
///
/// Quote characters stay so adjacent words do not merge. A doubled quote
/// inside a literal closes and reopens it, which masks the same bytes.
fn mask_literals(query: &str) -> String {
    let mut masked = String::with_capacity(query.len());
    let mut state = Lexeme::Code;
    let mut chars = query.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Lexeme::Code => match c {
                '\'' | '"' | '`' => {
                    state = Lexeme::Quoted(c);
                    masked.push(c);
                }
                '[' => {
                    state = Lexeme::Quoted(']');
                    masked.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = Lexeme::LineComment;
                    masked.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lexeme::BlockComment;
                    masked.push_str("  ");
                }
                _ => masked.push(c),
            },
            Lexeme::Quoted(close) => {
                if c == close {
                    state = Lexeme::Code;
                    masked.push(c);
                } else {
                    blank(&mut masked, c);
                }
            }
            Lexeme::LineComment => {
                if c == '\n' {
                    state = Lexeme::Code;
                    masked.push(c);
                } else {
                    blank(&mut masked, c);
                }
            }
            Lexeme::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lexeme::Code;
                    masked.push_str("  ");
                } else {
                    blank(&mut masked, c);
                }
            }
        }
    }
    masked
}

fn blank(masked: &mut String, c: char) {
    for _ in 0..c.len_utf8() {
        masked.push(' ');
    }
}
