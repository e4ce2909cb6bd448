//! Per-page metadata resolution.
//!
//! # Overview
//! `MetadataResolver` turns optional per-page overrides plus the current
//! route into a `ResolvedMetadata` record, then into a `HeadPayload` for a
//! `HeadSink`. Resolution is a pure function of its inputs and the runtime
//! config; calling it twice with the same arguments yields the same record.
//!
//! # Modes
//! - `Full`: every field is populated. Title gets the brand suffix, missing
//!   description/image fall back to site defaults, and the head carries the
//!   complete Open Graph / Twitter / link set. Never fails.
//! - `Strict`: no defaults. Title is required and used verbatim;
//!   description and image are emitted only when supplied. The head carries
//!   title, description and basic Open Graph tags only.
//!
//! In both modes an empty string counts as missing, and the canonical URL
//! is always `site_url + route path`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::head::{HeadPayload, HeadSink, LinkTag, MetaTag};

/// Path of the fallback social preview image, relative to the site URL.
pub const DEFAULT_PREVIEW_PATH: &str = "/default-preview.png";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("strict metadata requires a non-empty title")]
    MissingTitle,
}

/// Site-wide constants that page input cannot override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBrand {
    /// Appended to page titles as `"<title> | <suffix>"`.
    pub title_suffix: String,
    pub default_title: String,
    pub default_description: String,
    pub site_name: String,
    pub author: String,
    pub og_type: String,
    pub twitter_card: String,
    pub twitter_creator: String,
    pub robots: String,
    pub theme_color: String,
    pub favicon_path: String,
    pub favicon_type: String,
}

impl Default for SiteBrand {
    fn default() -> Self {
        Self {
            title_suffix: "Nuxt One".to_string(),
            default_title: "Injustify Real Estate".to_string(),
            default_description: "Discover, explore, and list amazing real estate properties \
                                  around the world. Built with Nuxt + FastAPI."
                .to_string(),
            site_name: "Injustify Real Estate".to_string(),
            author: "Injustify".to_string(),
            og_type: "website".to_string(),
            twitter_card: "summary_large_image".to_string(),
            twitter_creator: "@Injustify".to_string(),
            robots: "index, follow".to_string(),
            theme_color: "#ffffff".to_string(),
            favicon_path: "/favicon.png".to_string(),
            favicon_type: "image/png".to_string(),
        }
    }
}

/// Caller-supplied overrides for one page. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadataInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PageMetadataInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// The route being rendered. `path` is the full path including any query
/// string, e.g. `/listings/42?tab=photos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub path: String,
}

impl RouteContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    #[default]
    Full,
    Strict,
}

/// Output of resolution. In `Full` mode no field is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMetadata {
    pub mode: MetadataMode,
    pub title: String,
    pub description: String,
    pub image: String,
    pub canonical_url: String,
    pub robots_directive: String,
    pub site_name: String,
    pub author: String,
    pub og_type: String,
    pub twitter_card: String,
    pub twitter_creator: String,
    pub theme_color: String,
    pub favicon_path: String,
    pub favicon_type: String,
}

/// Resolves page metadata against the runtime config and a site brand.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    config: Arc<RuntimeConfig>,
    brand: SiteBrand,
    mode: MetadataMode,
}

impl MetadataResolver {
    /// `strict = true` selects the minimal no-defaults behavior.
    pub fn new(config: Arc<RuntimeConfig>, strict: bool) -> Self {
        Self {
            config,
            brand: SiteBrand::default(),
            mode: if strict {
                MetadataMode::Strict
            } else {
                MetadataMode::Full
            },
        }
    }

    pub fn with_brand(mut self, brand: SiteBrand) -> Self {
        self.brand = brand;
        self
    }

    pub fn mode(&self) -> MetadataMode {
        self.mode
    }

    pub fn brand(&self) -> &SiteBrand {
        &self.brand
    }

    pub fn resolve(
        &self,
        input: &PageMetadataInput,
        route: &RouteContext,
    ) -> Result<ResolvedMetadata, MetadataError> {
        let site_url = self.config.site_url();
        let title = present(&input.title);
        let description = present(&input.description);
        let image = present(&input.image);

        let (title, description, image) = match self.mode {
            MetadataMode::Full => (
                title
                    .map(|t| format!("{t} | {}", self.brand.title_suffix))
                    .unwrap_or_else(|| self.brand.default_title.clone()),
                description
                    .map(str::to_string)
                    .unwrap_or_else(|| self.brand.default_description.clone()),
                image
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{site_url}{DEFAULT_PREVIEW_PATH}")),
            ),
            MetadataMode::Strict => (
                title.ok_or(MetadataError::MissingTitle)?.to_string(),
                description.unwrap_or_default().to_string(),
                image.unwrap_or_default().to_string(),
            ),
        };

        let brand = &self.brand;
        Ok(ResolvedMetadata {
            mode: self.mode,
            title,
            description,
            image,
            canonical_url: format!("{site_url}{}", route.path),
            robots_directive: brand.robots.clone(),
            site_name: brand.site_name.clone(),
            author: brand.author.clone(),
            og_type: brand.og_type.clone(),
            twitter_card: brand.twitter_card.clone(),
            twitter_creator: brand.twitter_creator.clone(),
            theme_color: brand.theme_color.clone(),
            favicon_path: brand.favicon_path.clone(),
            favicon_type: brand.favicon_type.clone(),
        })
    }

    /// Head tags for a resolved record.
    pub fn head(&self, meta: &ResolvedMetadata) -> HeadPayload {
        match meta.mode {
            MetadataMode::Full => full_head(meta),
            MetadataMode::Strict => strict_head(meta),
        }
    }

    /// Resolve and hand the head to `sink`, replacing whatever it held.
    pub fn apply<S: HeadSink + ?Sized>(
        &self,
        input: &PageMetadataInput,
        route: &RouteContext,
        sink: &mut S,
    ) -> Result<(), MetadataError> {
        let resolved = self.resolve(input, route)?;
        tracing::trace!(route = %route.path, title = %resolved.title, "registering page head");
        sink.set_head(self.head(&resolved));
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn full_head(m: &ResolvedMetadata) -> HeadPayload {
    HeadPayload {
        title: m.title.clone(),
        meta: vec![
            MetaTag::name("description", &m.description),
            MetaTag::name("author", &m.author),
            MetaTag::property("og:title", &m.title),
            MetaTag::property("og:description", &m.description),
            MetaTag::property("og:image", &m.image),
            MetaTag::property("og:url", &m.canonical_url),
            MetaTag::property("og:type", &m.og_type),
            MetaTag::property("og:site_name", &m.site_name),
            MetaTag::name("twitter:card", &m.twitter_card),
            MetaTag::name("twitter:title", &m.title),
            MetaTag::name("twitter:description", &m.description),
            MetaTag::name("twitter:image", &m.image),
            MetaTag::name("twitter:creator", &m.twitter_creator),
            MetaTag::name("robots", &m.robots_directive),
            MetaTag::name("theme-color", &m.theme_color),
        ],
        link: vec![
            LinkTag::typed("icon", &m.favicon_path, &m.favicon_type),
            LinkTag::new("canonical", &m.canonical_url),
            LinkTag::new("apple-touch-icon", &m.favicon_path),
        ],
    }
}

fn strict_head(m: &ResolvedMetadata) -> HeadPayload {
    let mut meta = Vec::new();
    if !m.description.is_empty() {
        meta.push(MetaTag::name("description", &m.description));
    }
    meta.push(MetaTag::property("og:title", &m.title));
    if !m.description.is_empty() {
        meta.push(MetaTag::property("og:description", &m.description));
    }
    if !m.image.is_empty() {
        meta.push(MetaTag::property("og:image", &m.image));
    }
    meta.push(MetaTag::property("og:type", &m.og_type));

    HeadPayload {
        title: m.title.clone(),
        meta,
        link: Vec::new(),
    }
}
