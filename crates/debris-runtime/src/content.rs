#![forbid(unsafe_code)]

//! Adapter over the host's key/value content store.
//!
//! The engine treats content as opaque strings: a video URL, image URLs and
//! the anchor of the region to navigate to after the handoff. How the store
//! resolves overrides against defaults is its own business; a missing or
//! blank value simply falls back to the built-in default here.

use std::collections::BTreeMap;
use std::fmt;

/// Content keys read by [`HeroAssets::resolve`].
pub mod keys {
    /// Background video.
    pub const VIDEO: &str = "V1";
    /// Anchor id of the region after the hero.
    pub const NEXT_REGION: &str = "hero.next_region";

    /// Key for image `index` of debris `family` (`primary`, `secondary`, `side`).
    #[must_use]
    pub fn image(family: &str, index: usize) -> String {
        format!("hero.{family}.{index}")
    }
}

const DEFAULT_VIDEO: &str = "/videos/background.mp4";

const DEFAULT_PRIMARY: [&str; 4] = [
    "/images/portfolio/task_01k90mfa25f2etneptc7kekm99_1762031914_img_0.webp",
    "/images/portfolio/task_01k9fec0n8ej5rv3m6x8rnfsfn_1762528837_img_1.webp",
    "/images/portfolio/assets_task_01k816mxkwe908h5pg7v3yxtq9_1760977226_img_0.webp",
    "/images/portfolio/task_01k9akk4rjfcr83xkf3b7r0rdr_1762366467_img_1.webp",
];

const DEFAULT_SECONDARY: [&str; 4] = [
    "/images/portfolio/assets_task_01k05sqa0wedsbvfk5c0773fz5_1752541456_img_0.webp",
    "/images/portfolio/assets_task_01k1c880wqft0s0bcr3p77v2me_1753831780_img_0.webp",
    "/images/portfolio/assets_task_01k80qdg0ze1rskjzfpj7r1za3_1760961264_img_0.webp",
    "/images/portfolio/task_01k9et3f60e4782n74d3pkapg7_1762507579_img_0.webp",
];

/// Read-only key/value lookup.
pub trait ContentSource {
    /// Value for `key`, if the store has one.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory [`ContentSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
    entries: BTreeMap<String, String>,
}

impl ContentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContentSource for ContentMap {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for ContentMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where the page goes once the handoff completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "anchor", rename_all = "snake_case"))]
pub enum NavigationTarget {
    /// Scroll the element with this anchor id to the top of the viewport.
    Region(String),
    /// No next region: scroll down by one viewport height.
    #[default]
    NextViewport,
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(anchor) => write!(f, "#{anchor}"),
            Self::NextViewport => f.write_str("next-viewport"),
        }
    }
}

/// Asset strings the hero scene needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroAssets {
    pub video_url: String,
    pub primary_images: [String; 4],
    pub secondary_images: [String; 4],
    /// Side images reuse the primary set unless overridden.
    pub side_images: [String; 4],
    pub navigation: NavigationTarget,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl HeroAssets {
    /// Resolve every asset from `source`, falling back to built-in defaults
    /// for missing or blank values.
    #[must_use]
    pub fn resolve(source: &dyn ContentSource) -> Self {
        let lookup = |key: &str, fallback: &str| {
            non_blank(source.get(key)).unwrap_or_else(|| fallback.to_owned())
        };
        let family = |name: &str, defaults: &[&str; 4]| -> [String; 4] {
            std::array::from_fn(|i| lookup(&keys::image(name, i), defaults[i]))
        };
        let primary_images = family("primary", &DEFAULT_PRIMARY);
        let side_defaults: [&str; 4] = std::array::from_fn(|i| primary_images[i].as_str());
        let side_images = family("side", &side_defaults);
        Self {
            video_url: lookup(keys::VIDEO, DEFAULT_VIDEO),
            secondary_images: family("secondary", &DEFAULT_SECONDARY),
            side_images,
            primary_images,
            navigation: non_blank(source.get(keys::NEXT_REGION))
                .map(|anchor| NavigationTarget::Region(anchor.trim_start_matches('#').to_owned()))
                .unwrap_or_default(),
        }
    }

    /// Image URL for a debris group named `<family>.<index>`.
    #[must_use]
    pub fn image_for_group(&self, group: &str) -> Option<&str> {
        let (family, index) = group.split_once('.')?;
        let index: usize = index.parse().ok()?;
        let set = match family {
            "primary" => &self.primary_images,
            "secondary" => &self.secondary_images,
            "side" => &self.side_images,
            _ => return None,
        };
        set.get(index).map(String::as_str)
    }
}

impl Default for HeroAssets {
    fn default() -> Self {
        Self::resolve(&ContentMap::new())
    }
}
