//! Text-field parsing for the presentation layer.
//!
//! Spin-style fields never fail: unparsable text falls back to a default, the
//! same way out-of-range dates are clamped. Required counts reject blank input
//! but still default unparsable text.

/// Error type for user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A required field was left blank.
    #[error("{field} field is empty")]
    Empty { field: String },
}

/// Default for an unparsable required count
pub const DEFAULT_COUNT: i64 = 1;

/// Parses a spin-style integer field, returning `default` when the text is
/// blank or not an integer.
pub fn spin_value(text: &str, default: i64) -> i64 {
    text.trim().parse().unwrap_or(default)
}

/// Parses a required integer count.
///
/// The sign is kept so the arithmetic can reject negative counts itself.
///
/// # Errors
/// Returns `InputError::Empty` if `text` is blank.
pub fn required_count(text: &str, field: &str) -> Result<i64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty {
            field: field.to_owned(),
        });
    }
    Ok(spin_value(trimmed, DEFAULT_COUNT))
}
