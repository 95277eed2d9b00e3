//! Projection of the binary-metadata extractor's flat key/value output onto
//! the media snippet shape.

use std::collections::BTreeMap;

use url::Url;

use crate::dates::parse_exif_date;
use crate::models::{MediaSnippet, Snippet};

/// Which media snippet variant a projection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    Image,
    Video,
    Audio,
    Document,
}

/// Maps a flat EXIF-style tag map onto the snippet shape for `kind`.
///
/// Pure and total: absent or unparsable tags leave their fields absent, so
/// an empty map yields the type-only `{type, url}` snippet the pipeline
/// degrades to when extraction fails.
pub fn project(tags: &BTreeMap<String, String>, kind: BinaryKind, url: &Url) -> Snippet {
    let first = |names: &[&str]| -> Option<String> {
        names.iter().find_map(|name| tags.get(*name)).map(|value| value.trim()).filter(|value| !value.is_empty()).map(
            str::to_string,
        )
    };
    let media = MediaSnippet {
        url: url.to_string(),
        title: first(&["Title", "ObjectName", "XPTitle"]),
        description: first(&["Description", "ImageDescription", "Caption-Abstract"]),
        author: first(&["Artist", "Creator", "Author", "By-line"]),
        width: first(&["ImageWidth", "ExifImageWidth", "PixelXDimension"]).and_then(|raw| raw.parse().ok()),
        height: first(&["ImageHeight", "ExifImageHeight", "PixelYDimension"]).and_then(|raw| raw.parse().ok()),
        duration_seconds: first(&["Duration", "MediaDuration", "TrackDuration"]).and_then(parse_duration),
        page_count: first(&["PageCount", "Pages"]).and_then(|raw| raw.parse().ok()),
        created: first(&["DateTimeOriginal", "CreateDate", "CreationDate"]).as_deref().and_then(parse_exif_date),
        modified: first(&["ModifyDate", "DateTime"]).as_deref().and_then(parse_exif_date),
        camera_make: first(&["Make"]),
        camera_model: first(&["Model"]),
    };
    match kind {
        BinaryKind::Image => Snippet::Image(media),
        BinaryKind::Video => Snippet::Video(media),
        BinaryKind::Audio => Snippet::Audio(media),
        BinaryKind::Document => Snippet::Document(media),
    }
}

/// Durations come back either as bare seconds (`12.34`) or `H:MM:SS`-style.
fn parse_duration(raw: String) -> Option<f64> {
    let raw = raw.trim().trim_end_matches(" s").trim_end_matches(" (approx)");
    if let Ok(seconds) = raw.parse::<f64>() {
        return Some(seconds);
    }
    let mut total = 0f64;
    for part in raw.split(':') {
        total = total * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
    }

    fn url() -> Url {
        Url::parse("https://example.com/photo.png").unwrap()
    }

    #[test]
    fn image_projection_with_dimensions_and_dates() {
        let snippet = project(
            &tags(&[
                ("ImageWidth", "800"),
                ("ImageHeight", "600"),
                ("DateTimeOriginal", "2020:01:02 03:04:05"),
                ("Make", "Canon"),
                ("Model", "EOS R5"),
            ]),
            BinaryKind::Image,
            &url(),
        );
        let Snippet::Image(media) = snippet else {
            panic!("expected an image snippet");
        };
        assert_eq!(media.width, Some(800));
        assert_eq!(media.height, Some(600));
        assert_eq!(media.created, Some(datetime!(2020-01-02 03:04:05 UTC)));
        assert_eq!(media.camera_make.as_deref(), Some("Canon"));
        assert_eq!(media.camera_model.as_deref(), Some("EOS R5"));
    }

    #[test]
    fn empty_tags_degrade_to_type_only() {
        let snippet = project(&BTreeMap::new(), BinaryKind::Document, &url());
        let Snippet::Document(media) = snippet else {
            panic!("expected a document snippet");
        };
        assert_eq!(media.url, "https://example.com/photo.png");
        assert_eq!(media.width, None);
        assert_eq!(media.created, None);
        assert_eq!(media.page_count, None);
    }

    #[test]
    fn video_duration_formats() {
        let colons = project(&tags(&[("Duration", "1:02:03")]), BinaryKind::Video, &url());
        let Snippet::Video(media) = colons else {
            panic!("expected a video snippet");
        };
        assert_eq!(media.duration_seconds, Some(3723.0));

        let seconds = project(&tags(&[("Duration", "12.5 s")]), BinaryKind::Video, &url());
        let Snippet::Video(media) = seconds else {
            panic!("expected a video snippet");
        };
        assert_eq!(media.duration_seconds, Some(12.5));
    }

    #[test]
    fn unparsable_date_yields_absent_field() {
        let snippet = project(&tags(&[("CreateDate", "0000:00:00 00:00:00")]), BinaryKind::Image, &url());
        let Snippet::Image(media) = snippet else {
            panic!("expected an image snippet");
        };
        assert_eq!(media.created, None);
    }
}
