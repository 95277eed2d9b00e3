//! MIME essence extraction from `content-type` header values.

/// Reduces a `content-type` header value to its MIME "essence": lower-cased
/// type/subtype with parameters and surrounding whitespace stripped.
///
/// Returns `None` for values with an empty type or subtype, so callers can
/// treat a garbage header the same as a missing one.
///
/// # Examples
///
/// ```rust
/// use unfurl_streams::media_type::essence;
/// assert_eq!(essence("text/HTML; charset=UTF-8"), Some("text/html".to_string()));
/// assert_eq!(essence("  image/png "), Some("image/png".to_string()));
/// assert_eq!(essence(";charset=utf-8"), None);
/// ```
pub fn essence(content_type: &str) -> Option<String> {
    let bare = content_type.split(';').next().unwrap_or_default().trim();
    let (kind, subtype) = bare.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() {
        return None;
    }
    Some(bare.to_ascii_lowercase())
}

/// Returns `true` if the essence denotes an HTML document.
pub fn is_html(essence: &str) -> bool {
    matches!(essence, "text/html" | "application/xhtml+xml")
}
