//! Column-key resolution against a header sequence
//!
//! Resolution order: exact match, case-insensitive match, literal integer,
//! single-letter column name, then the caller's default. Unresolvable keys
//! never raise; they fall back to the default, which callers commonly set to
//! column 0 (the implicit index column).

/// Resolve a column key to an index into `headers`.
///
/// * exact, case-sensitive match (first occurrence)
/// * case-insensitive match (first occurrence)
/// * a key of ASCII digits is used directly as the index, without any
///   1-based adjustment
/// * a single letter maps `A`→1, `B`→2, … when the computed index lies
///   strictly between 0 and 26
/// * anything else, including an empty key, yields `default`
///
/// Numeric and letter results are not bounds-checked against `headers`.
pub fn resolve_column<S: AsRef<str>>(
    headers: &[S],
    key: &str,
    default: Option<usize>,
) -> Option<usize> {
    if key.is_empty() {
        return default;
    }

    if let Some(index) = headers.iter().position(|h| h.as_ref() == key) {
        return Some(index);
    }

    let lower_key = key.to_lowercase();
    if let Some(index) = headers
        .iter()
        .position(|h| h.as_ref().to_lowercase() == lower_key)
    {
        return Some(index);
    }

    if key.bytes().all(|b| b.is_ascii_digit()) {
        return key.parse::<usize>().ok().or(default);
    }

    let mut chars = key.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        let index = letter.to_ascii_uppercase() as i64 - 'A' as i64 + 1;
        if 0 < index && index < 26 {
            return Some(index as usize);
        }
    }

    default
}

/// Column letter for a 1-based column index (`1` → `A`, `27` → `AA`)
pub fn column_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
