//! Flat text export and import of node values.
//!
//! Format: one value per line, newline terminated, pre-order, no header.

use crate::domain::{DomainError, DomainResult, Scalar};

/// Render values one per line.
pub fn format_lines(values: &[Scalar]) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

/// Parse a flat text file into values for a flat-list build.
///
/// Every non-blank line must be a number; the first offending line aborts
/// the import.
pub fn parse_lines(content: &str) -> DomainResult<Vec<Scalar>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Scalar::parse_float(line).map_err(|_| DomainError::InvalidValue {
                input: format!("line {}: {}", i + 1, line.trim()),
                expected: "number",
            })
        })
        .collect()
}
