use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
}

/// Which variant of the site configuration a task runs against.
///
/// `Development` is the base record as written in the config file.
/// `Publish` is the base record with the `[publish]` overlay applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Publish,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Publish => "publish",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full site configuration record handed to the external generator.
///
/// Read once per invocation and never mutated; profile selection produces
/// a new merged record instead of editing this one in place.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub relative_urls: bool,
    pub plugins: Vec<String>,
    pub analytics: Option<String>,
    pub feed_domain: Option<String>,
    pub site: SiteMeta,
    pub content: ContentConfig,
    pub theme: ThemeConfig,
    pub markdown: MarkdownConfig,
    pub urls: UrlConfig,
    pub feeds: FeedConfig,
    /// Production-only keys, applied on top of the base record by
    /// [`SiteConfig::publish_profile`]. Never serialized into the
    /// effective config the generator sees.
    #[serde(skip_serializing)]
    pub publish: Option<PublishOverlay>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteMeta {
    pub author: String,
    pub name: String,
    pub url: String,
    pub timezone: String,
    pub default_lang: String,
    pub pagination: u32,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            author: String::new(),
            name: String::new(),
            url: String::new(),
            timezone: "UTC".to_string(),
            default_lang: "en".to_string(),
            pagination: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory the generator reads articles and pages from.
    pub path: String,
    /// Files and directories copied into the output as-is.
    pub static_paths: Vec<String>,
    /// Per-asset output remapping, e.g. `extras/robots.txt` -> `robots.txt`.
    pub extra_path_metadata: BTreeMap<String, StaticPathMeta>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: "content".to_string(),
            static_paths: Vec::new(),
            extra_path_metadata: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StaticPathMeta {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub dir: String,
    pub pygments_theme: String,
    pub typogrify: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dir: "theme".to_string(),
            pygments_theme: "default".to_string(),
            typogrify: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Markdown extensions enabled in the generator, by name.
    pub extensions: Vec<String>,
    /// Per-extension option tables, keyed by extension name.
    pub options: BTreeMap<String, toml::Value>,
}

/// URL and save-as templates per content type. The placeholder syntax
/// (`{date:%Y}`, `{slug}`) is the generator's, passed through untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UrlConfig {
    pub article: String,
    pub article_save_as: String,
    pub page: String,
    pub page_save_as: String,
    pub year_archive_save_as: String,
    pub month_archive_save_as: String,
    pub archives_save_as: String,
    pub tags_save_as: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            article: "{slug}.html".to_string(),
            article_save_as: "{slug}.html".to_string(),
            page: "pages/{slug}.html".to_string(),
            page_save_as: "pages/{slug}.html".to_string(),
            year_archive_save_as: String::new(),
            month_archive_save_as: String::new(),
            archives_save_as: String::new(),
            tags_save_as: String::new(),
        }
    }
}

/// Feed output paths. All unset in development so no feeds are generated
/// while writing locally.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub all_atom: Option<String>,
    pub category_atom: Option<String>,
    pub translation_atom: Option<String>,
    pub author_atom: Option<String>,
    pub author_rss: Option<String>,
}

/// The fixed set of keys the publish profile overwrites on the base record.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishOverlay {
    /// Canonical site URL, also used as the feed domain.
    pub url: String,
    pub relative_urls: bool,
    pub feed_all_atom: Option<String>,
    pub feed_category_atom: Option<String>,
    pub analytics: Option<String>,
}

impl SiteConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: SiteConfig = toml::from_str(&data)?;

        Ok(config)
    }

    /// The merged record for the given profile. The development profile is
    /// the base record as-is (minus the overlay table); the publish profile
    /// has the overlay keys overwritten on top of it.
    pub fn for_profile(&self, profile: Profile) -> SiteConfig {
        match profile {
            Profile::Development => {
                let mut base = self.clone();
                base.publish = None;
                base
            }
            Profile::Publish => self.publish_profile(),
        }
    }

    /// Base record with the `[publish]` overlay's keys overwritten. Keys
    /// the overlay does not carry are left exactly as in the base.
    pub fn publish_profile(&self) -> SiteConfig {
        let mut merged = self.clone();
        merged.publish = None;

        let Some(overlay) = &self.publish else {
            return merged;
        };

        merged.site.url = overlay.url.clone();
        merged.relative_urls = overlay.relative_urls;
        merged.feed_domain = Some(overlay.url.clone());
        if let Some(feed) = &overlay.feed_all_atom {
            merged.feeds.all_atom = Some(feed.clone());
        }
        if let Some(feed) = &overlay.feed_category_atom {
            merged.feeds.category_atom = Some(feed.clone());
        }
        if let Some(id) = &overlay.analytics {
            merged.analytics = Some(id.clone());
        }

        merged
    }
}
