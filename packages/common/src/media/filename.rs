use super::error::MediaError;

/// Reduce a client-supplied filename to a safe, flat base name.
///
/// Path components (`/` and `\`) are stripped, whitespace becomes `_`, and
/// anything outside ASCII `[A-Za-z0-9._-]` is dropped. Leading dots are
/// removed so the result can never be a hidden file or a traversal pattern.
/// Fails when nothing recognisable remains.
pub fn sanitize_filename(raw: &str) -> Result<String, MediaError> {
    // Keep only the final path segment of whatever the client sent.
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    // No hidden files, no leading ".." remnants.
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(MediaError::InvalidFilename);
    }

    Ok(cleaned.to_string())
}

/// Split a flat filename into stem and extension.
///
/// Returns `None` when there is no extension or the stem is empty.
pub fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext))
}
