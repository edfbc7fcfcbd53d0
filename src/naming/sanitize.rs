//! Normalization of identifiers into name segments.

/// Turn an arbitrary identifier into a lowercase name segment.
///
/// Every character that is not alphanumeric becomes one `_`. Nothing is
/// collapsed or truncated, so distinct inputs of the same shape stay distinct.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// Join a `baseColumnNames` list with single underscores.
///
/// Commas and whitespace both separate columns; empty pieces are dropped,
/// so `"a, b"`, `"a,b"` and `"a b"` all become `"a_b"`.
pub fn normalize_columns(columns: &str) -> String {
    columns
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
