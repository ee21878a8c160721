//! `<picture>` composition.
//!
//! A picture is a list of `<source>` children, each active above a viewport
//! width, followed by a fallback `<img>`:
//!
//! ```html
//! <picture>
//!   <source srcset=".../c_fill,h_399,w_399/a_17,c_scale,e_sepia,w_399/sample.jpg" media="(min_width: 300px)">
//!   <source srcset=".../c_fill,h_399,w_399/a_18,c_scale,e_colorize,w_200/sample.jpg" media="(min_width: 200px)">
//!   <img src=".../c_fill,h_399,w_399/sample.jpg" width="399" height="399">
//! </picture>
//! ```
//!
//! The shared transformation is applied first in every source, then the
//! source's own transformation as a chained segment. Sources keep the order
//! they were given in; browsers take the first matching `media`, so callers
//! usually list them from the widest breakpoint down.

use crate::breakpoints::ConfigurationError;
use crate::config::Config;
use crate::tags::{self, ImageOptions, ImageTag, SourceOptions, SourceTag};
use crate::transformation::{Transformation, TransformationParseError};
use crate::url;
use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseSourceError {
    #[error("source '{0}' must look like MIN[:MAX]=TRANSFORMATION")]
    MissingTransformation(String),
    #[error("invalid width '{0}' in source")]
    InvalidWidth(String),
    #[error(transparent)]
    Transformation(#[from] TransformationParseError),
}

/// One `<source>` request: a viewport range and its transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    pub min_width: u32,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub transformation: Transformation,
}

impl SourceEntry {
    pub fn new(min_width: u32, transformation: Transformation) -> Self {
        Self {
            min_width,
            max_width: None,
            transformation,
        }
    }
}

/// Parses `MIN[:MAX]=TRANSFORMATION`, e.g. `300=a_17,c_scale,e_sepia,w_399`.
impl FromStr for SourceEntry {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (range, transformation) = s
            .split_once('=')
            .ok_or_else(|| ParseSourceError::MissingTransformation(s.to_string()))?;

        let parse_width = |w: &str| {
            w.trim()
                .parse::<u32>()
                .map_err(|_| ParseSourceError::InvalidWidth(w.to_string()))
        };
        let (min_width, max_width) = match range.split_once(':') {
            Some((min, max)) => (parse_width(min)?, Some(parse_width(max)?)),
            None => (parse_width(range)?, None),
        };

        Ok(SourceEntry {
            min_width,
            max_width,
            transformation: transformation.parse()?,
        })
    }
}

/// A child of a `<picture>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureChild {
    Source(SourceTag),
    Image(ImageTag),
}

impl PictureChild {
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        match self {
            PictureChild::Source(source) => source.attributes(),
            PictureChild::Image(img) => img.attributes(),
        }
    }
}

impl Render for PictureChild {
    fn render(&self) -> Markup {
        match self {
            PictureChild::Source(source) => source.render(),
            PictureChild::Image(img) => img.render(),
        }
    }
}

/// A built `<picture>`: sources in caller order, then the fallback `<img>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureTag {
    pub children: Vec<PictureChild>,
}

impl PictureTag {
    /// The `<picture>` element itself never carries attributes.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::new()
    }
}

impl Render for PictureTag {
    fn render(&self) -> Markup {
        html! {
            picture {
                @for child in &self.children {
                    (child)
                }
            }
        }
    }
}

/// Render one single-URL `<source>` per entry, in input order.
pub fn format_sources(
    public_id: &str,
    base_path: &str,
    shared_transformation: &Transformation,
    sources: &[SourceEntry],
) -> Vec<SourceTag> {
    sources
        .iter()
        .map(|entry| {
            let chained = shared_transformation
                .clone()
                .then(entry.transformation.clone());
            let media = tags::media_query(Some(entry.min_width), entry.max_width);
            SourceTag {
                srcset: url::join(base_path, &chained, public_id),
                sizes: None,
                media: Some(media),
            }
        })
        .collect()
}

/// Build a `<picture>` for `public_id`.
///
/// `options` describes the fallback `<img>` and supplies the shared
/// transformation. When `options` (or the config) carries a srcset, every
/// source becomes responsive over the same breakpoints.
pub fn picture_tag(
    public_id: &str,
    options: &ImageOptions,
    sources: &[SourceEntry],
    config: &Config,
) -> Result<PictureTag, ConfigurationError> {
    let responsive = options.srcset.is_some() || config.srcset.is_some();

    let source_tags = if responsive {
        sources
            .iter()
            .map(|entry| {
                let source_options = SourceOptions {
                    transformation: options
                        .transformation
                        .clone()
                        .then(entry.transformation.clone()),
                    srcset: options.srcset.clone(),
                    format: options.format.clone(),
                    version: options.version,
                    min_width: Some(entry.min_width),
                    max_width: entry.max_width,
                };
                tags::source_tag(public_id, &source_options, config)
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let base = url::base_path(&config.cloud)?;
        let path = url::public_path(public_id, options.version, options.format.as_deref());
        format_sources(&path, &base, &options.transformation, sources)
    };

    let fallback = tags::image_tag(public_id, options, config)?;

    let mut children: Vec<PictureChild> =
        source_tags.into_iter().map(PictureChild::Source).collect();
    children.push(PictureChild::Image(fallback));

    log::debug!(
        "built picture for {public_id} with {} children",
        children.len()
    );
    Ok(PictureTag { children })
}
