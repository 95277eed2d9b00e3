//! Best-effort date parsing for EXIF-style and page-declared timestamps.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Parses an EXIF-style or ISO-style datetime.
///
/// A value without a `Z`/`±HH:MM` suffix is treated as UTC (a `Z` is
/// appended before standard parsing); one that already carries an offset is
/// parsed unmodified. Unparsable input yields `None`, never a default date.
pub(crate) fn parse_exif_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    // Both accepted shapes are pure ASCII; anything else would also make the
    // fixed-index slicing below land inside a multi-byte character.
    if !raw.is_ascii() {
        return None;
    }
    let bytes = raw.as_bytes();
    if bytes.len() < 19 {
        return None;
    }
    // Normalize the EXIF date shape (`2020:01:02 03:04:05`) to ISO; an
    // ISO-shaped input passes through with its separator unified to `T`.
    let mut normalized = String::with_capacity(raw.len() + 1);
    let exif_shape = bytes[4] == b':' && bytes[7] == b':';
    let iso_shape = bytes[4] == b'-' && bytes[7] == b'-';
    if !exif_shape && !iso_shape {
        return None;
    }
    normalized.push_str(&raw[0..4]);
    normalized.push('-');
    normalized.push_str(&raw[5..7]);
    normalized.push('-');
    normalized.push_str(&raw[8..10]);
    normalized.push('T');
    normalized.push_str(&raw[11..]);
    if !has_offset_suffix(&normalized) {
        normalized.push('Z');
    }
    OffsetDateTime::parse(&normalized, &Rfc3339).ok()
}

/// Parses page-declared dates: RFC 3339 first, then the EXIF shape, then a
/// bare `YYYY-MM-DD` treated as UTC midnight.
pub(crate) fn parse_flexible(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    if raw.len() == 10 {
        let bytes = raw.as_bytes();
        if (bytes[4] == b'-' && bytes[7] == b'-') || (bytes[4] == b':' && bytes[7] == b':') {
            return parse_exif_date(&format!("{raw} 00:00:00"));
        }
    }
    parse_exif_date(raw)
}

fn has_offset_suffix(value: &str) -> bool {
    if value.ends_with('Z') || value.ends_with('z') {
        return true;
    }
    let bytes = value.as_bytes();
    // `…+HH:MM` / `…-HH:MM`
    bytes.len() >= 6
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
        && bytes[bytes.len() - 3] == b':'
}
