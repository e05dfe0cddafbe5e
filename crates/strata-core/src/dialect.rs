//! SQLite identifier quoting.
//!
//! SQLite accepts double quotes, square brackets and backticks around
//! identifiers. Every fragment this crate produces uses backticks, and an
//! identifier is never interpolated without going through this module.

/// The identifier quote character used in every emitted fragment.
pub const IDENTIFIER_QUOTE: char = '`';

/// Appends a quoted identifier to `out`, doubling embedded quote characters.
pub fn append_identifier(out: &mut String, name: &str) {
    out.push(IDENTIFIER_QUOTE);
    for c in name.chars() {
        if c == IDENTIFIER_QUOTE {
            out.push(IDENTIFIER_QUOTE);
        }
        out.push(c);
    }
    out.push(IDENTIFIER_QUOTE);
}

/// Quotes an identifier.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    append_identifier(&mut out, name);
    out
}

/// Quotes a `table.column` pair.
#[must_use]
pub fn qualified_identifier(table: &str, column: &str) -> String {
    let mut out = String::with_capacity(table.len() + column.len() + 5);
    append_identifier(&mut out, table);
    out.push('.');
    append_identifier(&mut out, column);
    out
}
