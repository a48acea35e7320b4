//! Text normalization.

/// Collapse runs of whitespace to a single space and trim.
///
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_whitespace(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() { None } else { Some(out) }
}
