//! Normalisation of free-text fields.

/// Trims `value` and returns it when something remains.
pub(super) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
