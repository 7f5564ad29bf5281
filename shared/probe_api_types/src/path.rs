//! Path helpers shared by the verifier and the fixture builder.

/// Remove a leading volume designator (`F:\`, `f:/`, `FS0:\`) from `path`.
///
/// The prefix is only stripped when something follows it; a bare `F:\` is
/// returned unchanged.
pub fn strip_volume_prefix(path: &str) -> &str {
    let Some(colon) = path.find(':') else { return path };
    let (name, rest) = path.split_at(colon);
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return path;
    }
    let rest = &rest[1..];
    match rest.as_bytes().first() {
        Some(b'\\') | Some(b'/') if rest.len() > 1 => &rest[1..],
        _ => path,
    }
}

/// Split a relative path on either separator, skipping empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty())
}
