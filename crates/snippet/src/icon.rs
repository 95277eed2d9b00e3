//! Nearest-preferred-size icon selection.

use unfurl_tokenize::IconLink;

use crate::models::Icon;

/// Selects the icon closest to `preferred` from candidates in discovery
/// order.
///
/// The first candidate with no declared size becomes a tentative default;
/// each sized candidate replaces the current selection only on strict
/// improvement of `|size - preferred|`, so equal distances keep the earlier
/// candidate and the whole procedure is stable under input order. When no
/// candidate declares a size at all, the first discovered icon wins.
pub(crate) fn select(icons: &[IconLink], preferred: u32) -> Option<Icon> {
    let mut selected: Option<(&IconLink, Option<u32>)> = None;
    for icon in icons {
        match declared_size(icon.sizes.as_deref()) {
            None => {
                if selected.is_none() {
                    selected = Some((icon, None));
                }
            },
            Some(size) => {
                let distance = size.abs_diff(preferred);
                let improves = match selected {
                    None => true,
                    // Any declared size beats the unsized tentative default.
                    Some((_, None)) => true,
                    Some((_, Some(best))) => distance < best,
                };
                if improves {
                    selected = Some((icon, Some(distance)));
                }
            },
        }
    }
    selected.map(|(icon, _)| Icon {
        href: icon.href.clone(),
        media_type: icon.media_type.clone(),
        sizes: icon.sizes.clone(),
    })
}

/// Parses the leading `WxH` token of a `sizes` attribute; the width is the
/// comparison scalar.
fn declared_size(sizes: Option<&str>) -> Option<u32> {
    let token = sizes?.split_whitespace().next()?;
    let (width, _height) = token.split_once(['x', 'X'])?;
    width.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(href: &str, sizes: Option<&str>) -> IconLink {
        IconLink { href: href.to_string(), sizes: sizes.map(str::to_string), media_type: None }
    }

    #[test]
    fn closer_size_wins() {
        let icons = vec![icon("a", Some("16x16")), icon("b", Some("64x64"))];
        assert_eq!(select(&icons, 32).unwrap().href, "a");
    }

    #[test]
    fn strict_improvement_replaces_the_default() {
        let icons = vec![icon("default", None), icon("sized", Some("48x48"))];
        assert_eq!(select(&icons, 32).unwrap().href, "sized");
    }

    #[test]
    fn equal_distance_keeps_the_earlier_candidate() {
        let icons = vec![icon("first", Some("16x16")), icon("second", Some("48x48"))];
        assert_eq!(select(&icons, 32).unwrap().href, "first");
    }

    #[test]
    fn no_declared_sizes_first_discovered_wins() {
        let icons = vec![icon("first", None), icon("second", None)];
        assert_eq!(select(&icons, 32).unwrap().href, "first");
    }

    #[test]
    fn unparsable_sizes_count_as_unsized() {
        let icons = vec![icon("weird", Some("any")), icon("sized", Some("128x128"))];
        assert_eq!(select(&icons, 32).unwrap().href, "sized");
    }

    #[test]
    fn empty_candidate_list() {
        assert_eq!(select(&[], 32), None);
    }
}
