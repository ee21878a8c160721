//! `<img>` and `<source>` tag construction.
//!
//! Builders resolve options into typed tags. A tag exposes its attributes as
//! an ordered name → value mapping (for hosts that do their own rendering)
//! and also renders itself with [maud](https://maud.lambda.xyz/), which
//! escapes every attribute value.
//!
//! ## Width/Height Suppression
//!
//! When a tag gets a srcset, its own `width` and `height` attributes are
//! dropped: the browser picks a candidate by width, and fixed dimensions on
//! the element would fight that choice. The sizing still reaches the server
//! through the transformation segment of every candidate URL. Suppression is
//! decided per call on the returned tag; the caller's options are untouched.

use crate::breakpoints::ConfigurationError;
use crate::config::Config;
use crate::srcset::{self, SrcsetParam};
use crate::transformation::Transformation;
use crate::url;
use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options for [`image_tag`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageOptions {
    /// Transformation applied to `src` and shared by every srcset candidate.
    pub transformation: Transformation,
    /// Responsive srcset; falls back to the config default when absent.
    pub srcset: Option<SrcsetParam>,
    /// File extension appended to the public id.
    pub format: Option<String>,
    /// Asset version, rendered as a `v<version>` segment.
    pub version: Option<u64>,
    pub alt: Option<String>,
    pub class: Option<String>,
}

/// A built `<img>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub src: String,
    pub srcset: Option<String>,
    pub sizes: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alt: Option<String>,
    pub class: Option<String>,
}

impl ImageTag {
    /// Attribute mapping in name order; absent attributes are omitted.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("src", self.src.clone());
        insert_opt(&mut attrs, "srcset", self.srcset.clone());
        insert_opt(&mut attrs, "sizes", self.sizes.clone());
        insert_opt(&mut attrs, "width", self.width.map(|w| w.to_string()));
        insert_opt(&mut attrs, "height", self.height.map(|h| h.to_string()));
        insert_opt(&mut attrs, "alt", self.alt.clone());
        insert_opt(&mut attrs, "class", self.class.clone());
        attrs
    }
}

impl Render for ImageTag {
    fn render(&self) -> Markup {
        html! {
            img src=(self.src)
                srcset=[self.srcset.as_deref()]
                sizes=[self.sizes.as_deref()]
                width=[self.width]
                height=[self.height]
                alt=[self.alt.as_deref()]
                class=[self.class.as_deref()];
        }
    }
}

/// Options for [`source_tag`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceOptions {
    pub transformation: Transformation,
    pub srcset: Option<SrcsetParam>,
    pub format: Option<String>,
    pub version: Option<u64>,
    /// Lower viewport bound for the `media` attribute.
    pub min_width: Option<u32>,
    /// Upper viewport bound for the `media` attribute.
    pub max_width: Option<u32>,
}

/// A built `<source>` tag, one child of a `<picture>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub srcset: String,
    pub sizes: Option<String>,
    pub media: Option<String>,
}

impl SourceTag {
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("srcset", self.srcset.clone());
        insert_opt(&mut attrs, "sizes", self.sizes.clone());
        insert_opt(&mut attrs, "media", self.media.clone());
        attrs
    }
}

impl Render for SourceTag {
    fn render(&self) -> Markup {
        html! {
            source srcset=(self.srcset) sizes=[self.sizes.as_deref()] media=[self.media.as_deref()];
        }
    }
}

fn insert_opt(attrs: &mut BTreeMap<&'static str, String>, name: &'static str, value: Option<String>) {
    if let Some(v) = value {
        attrs.insert(name, v);
    }
}

/// `(min_width: Wpx)`, optionally `and (max_width: Wpx)`. Empty when unbounded.
pub fn media_query(min_width: Option<u32>, max_width: Option<u32>) -> String {
    let mut parts = Vec::new();
    if let Some(min) = min_width {
        parts.push(format!("(min_width: {min}px)"));
    }
    if let Some(max) = max_width {
        parts.push(format!("(max_width: {max}px)"));
    }
    parts.join(" and ")
}

/// The srcset a call should use: its own, else the config default.
fn effective_srcset<'a>(
    own: Option<&'a SrcsetParam>,
    config: &'a Config,
) -> Option<std::borrow::Cow<'a, SrcsetParam>> {
    use std::borrow::Cow;
    own.map(Cow::Borrowed).or_else(|| {
        config
            .srcset
            .clone()
            .map(|options| Cow::Owned(SrcsetParam::Options(options)))
    })
}

/// Build an `<img>` tag for `public_id`.
pub fn image_tag(
    public_id: &str,
    options: &ImageOptions,
    config: &Config,
) -> Result<ImageTag, ConfigurationError> {
    let base = url::base_path(&config.cloud)?;
    let path = url::public_path(public_id, options.version, options.format.as_deref());
    let src = url::join(&base, &options.transformation, &path);

    let responsive = effective_srcset(options.srcset.as_ref(), config)
        .map(|param| srcset::responsive_attributes(&path, &base, &options.transformation, &param))
        .transpose()?;

    let tag = match responsive {
        Some(attrs) => ImageTag {
            src,
            srcset: Some(attrs.srcset),
            sizes: attrs.sizes,
            width: None,
            height: None,
            alt: options.alt.clone(),
            class: options.class.clone(),
        },
        None => {
            let (width, height) = options.transformation.html_dimensions();
            ImageTag {
                src,
                srcset: None,
                sizes: None,
                width,
                height,
                alt: options.alt.clone(),
                class: options.class.clone(),
            }
        }
    };
    log::debug!("built img tag for {public_id}: {tag:?}");
    Ok(tag)
}

/// Build a standalone `<source>` tag for `public_id`.
///
/// Without a srcset the source points at a single URL carrying the full
/// transformation.
pub fn source_tag(
    public_id: &str,
    options: &SourceOptions,
    config: &Config,
) -> Result<SourceTag, ConfigurationError> {
    let base = url::base_path(&config.cloud)?;
    let path = url::public_path(public_id, options.version, options.format.as_deref());

    let responsive = effective_srcset(options.srcset.as_ref(), config)
        .map(|param| srcset::responsive_attributes(&path, &base, &options.transformation, &param))
        .transpose()?;

    let (srcset, sizes) = match responsive {
        Some(attrs) => (attrs.srcset, attrs.sizes),
        None => (url::join(&base, &options.transformation, &path), None),
    };
    let media = media_query(options.min_width, options.max_width);

    let tag = SourceTag {
        srcset,
        sizes,
        media: (!media.is_empty()).then_some(media),
    };
    log::debug!("built source tag for {public_id}: {tag:?}");
    Ok(tag)
}
