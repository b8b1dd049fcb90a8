//! Identifier validation and quoting shared by every dialect.
//!
//! Identifiers and raw default expressions are spliced into generated DDL as
//! text, so they are checked once here before any dialect renders them:
//!
//! 1. Identifiers must be non-empty, free of null bytes, and within length
//! 2. Quoting escapes the engine's quote character by doubling it
//! 3. Raw expressions must be a single expression (no `;`, no comments)

use crate::error::{ExportError, Result};

/// Upper bound on identifier length for any dialect.
///
/// Dialects with a lower limit report it through
/// [`Dialect::max_identifier_length`](crate::core::Dialect::max_identifier_length).
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before it is rendered.
///
/// # Errors
///
/// Returns `ExportError::InvalidSchema` for empty names, names containing a
/// null byte, and names longer than [`MAX_IDENTIFIER_LENGTH`] bytes.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ExportError::InvalidSchema(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(ExportError::InvalidSchema(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ExportError::InvalidSchema(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Wrap `name` in `open`/`close`, doubling every embedded `close`.
///
/// A name that already contains the quote character is escaped, never
/// treated as pre-quoted.
pub fn quote_with(name: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(open);
    for ch in name.chars() {
        if ch == close {
            out.push(close);
        }
        out.push(ch);
    }
    out.push(close);
    out
}

/// Quote a PostgreSQL identifier: `"name"`.
pub fn quote_pg(name: &str) -> String {
    quote_with(name, '"', '"')
}

/// Quote a MySQL identifier: `` `name` ``.
pub fn quote_mysql(name: &str) -> String {
    quote_with(name, '`', '`')
}

/// Quote a SQL Server identifier: `[name]`.
pub fn quote_mssql(name: &str) -> String {
    quote_with(name, '[', ']')
}

/// Render a single-quoted SQL string literal.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Whether `text` is a plain decimal literal: optional sign, digits with an
/// optional fraction, optional exponent. Surrounding whitespace is allowed.
///
/// `NaN`, `inf` and hex forms are not literals in any supported engine.
pub fn is_numeric_literal(text: &str) -> bool {
    let s = text.trim();
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (int, frac) = match mantissa.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (mantissa, None),
    };
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !frac.map_or(true, digits) {
        return false;
    }
    if int.is_empty() && frac.map_or(true, str::is_empty) {
        return false;
    }

    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && digits(exp)
        }
        None => true,
    }
}

/// Validate a raw default expression.
///
/// Expressions come from reader metadata and are emitted verbatim, so they
/// must stay a single expression.
///
/// # Rejected Patterns
///
/// - Semicolons (statement chaining)
/// - SQL comments (`--`, `/*`, `*/`)
pub fn validate_expression(expression: &str) -> Result<()> {
    if expression.trim().is_empty() {
        return Err(ExportError::InvalidSchema(
            "Default expression cannot be empty".to_string(),
        ));
    }

    if expression.contains(';') {
        return Err(ExportError::InvalidSchema(format!(
            "Default expression contains a semicolon: {:?}",
            expression
        )));
    }

    if expression.contains("--") || expression.contains("/*") || expression.contains("*/") {
        return Err(ExportError::InvalidSchema(format!(
            "Default expression contains SQL comment markers: {:?}",
            expression
        )));
    }

    Ok(())
}
