//! Per-platform app deep-link resolution.
//!
//! Each platform checks the Twitter app-card dialect first, then the exact
//! App Links platform, then a shared fallback namespace (`ios` for
//! iPhone/iPad, `windows_universal` for Windows/Windows Phone). Only a
//! complete `{id, name, url}` triple is emitted.

use unfurl_tokenize::FlatDialect;

use crate::models::{AppEntry, Apps};

pub(crate) fn resolve(twitter: &FlatDialect, app_links: &FlatDialect) -> Apps {
    Apps {
        iphone: from_twitter(twitter, "iphone")
            .or_else(|| from_app_links(app_links, "iphone"))
            .or_else(|| from_app_links(app_links, "ios")),
        ipad: from_twitter(twitter, "ipad")
            .or_else(|| from_app_links(app_links, "ipad"))
            .or_else(|| from_app_links(app_links, "ios")),
        android: from_twitter(twitter, "googleplay").or_else(|| from_app_links(app_links, "android")),
        // Twitter cards have no Windows app attributes.
        windows: from_app_links(app_links, "windows").or_else(|| from_app_links(app_links, "windows_universal")),
        windows_phone: from_app_links(app_links, "windows_phone")
            .or_else(|| from_app_links(app_links, "windows_universal")),
    }
}

fn from_twitter(twitter: &FlatDialect, platform: &str) -> Option<AppEntry> {
    AppEntry::complete(
        twitter.first(&format!("app:id:{platform}")),
        twitter.first(&format!("app:name:{platform}")),
        twitter.first(&format!("app:url:{platform}")),
    )
}

fn from_app_links(app_links: &FlatDialect, namespace: &str) -> Option<AppEntry> {
    let id_key = match namespace {
        "android" => "package",
        "windows" | "windows_phone" | "windows_universal" => "app_id",
        // ios, iphone, ipad
        _ => "app_store_id",
    };
    AppEntry::complete(
        app_links.first(&format!("{namespace}:{id_key}")),
        app_links.first(&format!("{namespace}:app_name")),
        app_links.first(&format!("{namespace}:url")),
    )
}
