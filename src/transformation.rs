//! Transformation descriptors and their canonical URL form.
//!
//! A [`Transformation`] describes a server-side edit (crop, effect, sizing)
//! that the delivery service applies before serving an image. It is encoded
//! into the URL path as a comma-separated list of `key_value` parameters:
//!
//! ```text
//! { crop: crop, width: 10, height: 20 }  →  c_crop,h_20,w_10
//! ```
//!
//! ## Canonical Ordering
//!
//! Parameters are sorted lexicographically by their encoded form, so the
//! same descriptor always produces the same string regardless of how it was
//! built. Caching layers on the delivery side key on this string.
//!
//! ## Chaining
//!
//! A transformation may carry a chain of preceding components. Each component
//! becomes its own path segment, applied in order:
//!
//! ```text
//! c_fill,h_399,w_399/a_17,c_scale,e_sepia,w_399
//! ```
//!
//! ## Sizing Rules
//!
//! `width` and `height` only reach the URL when a `crop` mode is set. Without
//! a crop they are layout hints for the `<img>` element and stay out of the
//! delivery path (see [`Transformation::html_dimensions`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformationParseError {
    #[error("transformation parameter '{0}' is not in key_value form")]
    MalformedParam(String),
    #[error("invalid value '{value}' for transformation key '{key}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown crop mode '{0}'")]
    UnknownCrop(String),
}

/// How the delivery service fits the image into the requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Resize to the exact dimensions, ignoring aspect ratio if both are given.
    Scale,
    /// Fit within the box, preserving aspect ratio.
    Fit,
    /// Like `fit`, but never upscale.
    Limit,
    /// Like `fit`, but never downscale.
    Mfit,
    /// Fill the box exactly, cropping overflow.
    Fill,
    /// Like `fill`, but never upscale.
    Lfill,
    /// Fit within the box and pad the remainder.
    Pad,
    /// Like `pad`, but never upscale.
    Lpad,
    /// Like `pad`, but never downscale.
    Mpad,
    /// Extract a region of the given size from the original.
    Crop,
    /// Face-aware thumbnail crop.
    Thumb,
}

impl CropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CropMode::Scale => "scale",
            CropMode::Fit => "fit",
            CropMode::Limit => "limit",
            CropMode::Mfit => "mfit",
            CropMode::Fill => "fill",
            CropMode::Lfill => "lfill",
            CropMode::Pad => "pad",
            CropMode::Lpad => "lpad",
            CropMode::Mpad => "mpad",
            CropMode::Crop => "crop",
            CropMode::Thumb => "thumb",
        }
    }

    /// Whether the served size is unknown until the service computes it.
    fn sizes_unknown(self) -> bool {
        matches!(self, CropMode::Fit | CropMode::Limit)
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropMode {
    type Err = TransformationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "scale" => CropMode::Scale,
            "fit" => CropMode::Fit,
            "limit" => CropMode::Limit,
            "mfit" => CropMode::Mfit,
            "fill" => CropMode::Fill,
            "lfill" => CropMode::Lfill,
            "pad" => CropMode::Pad,
            "lpad" => CropMode::Lpad,
            "mpad" => CropMode::Mpad,
            "crop" => CropMode::Crop,
            "thumb" => CropMode::Thumb,
            other => return Err(TransformationParseError::UnknownCrop(other.to_string())),
        })
    }
}

/// A server-side image transformation.
///
/// All fields are optional; an empty descriptor encodes to the empty string
/// and contributes no URL segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Transformation {
    /// Rotation in degrees (`a`).
    pub angle: Option<i32>,
    /// Background color for padding, e.g. `rgb:ff0000` (`b`).
    pub background: Option<String>,
    /// Crop/resize mode (`c`).
    pub crop: Option<CropMode>,
    /// Device pixel ratio (`dpr`).
    pub dpr: Option<f64>,
    /// Named effect, optionally with a level: `sepia`, `blur:300` (`e`).
    pub effect: Option<String>,
    /// Delivery format override, e.g. `auto`, `webp` (`f`).
    pub fetch_format: Option<String>,
    /// Crop gravity, e.g. `face`, `north_east` (`g`).
    pub gravity: Option<String>,
    /// Target height in pixels (`h`). Only encoded when `crop` is set.
    pub height: Option<u32>,
    /// Opacity 0 to 100 (`o`).
    pub opacity: Option<u32>,
    /// Compression quality, numeric or `auto` (`q`).
    pub quality: Option<String>,
    /// Corner radius, numeric or `max` (`r`).
    pub radius: Option<String>,
    /// Target width in pixels (`w`). Only encoded when `crop` is set.
    pub width: Option<u32>,
    /// Horizontal offset (`x`).
    pub x: Option<i32>,
    /// Vertical offset (`y`).
    pub y: Option<i32>,
    /// Components applied before this one, each rendered as its own segment.
    #[serde(rename = "transformation", skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<Transformation>,
    /// Pre-encoded parameters appended verbatim after the sorted ones.
    #[serde(rename = "raw_transformation")]
    pub raw: Option<String>,
}

impl Transformation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-width directive used for each srcset candidate.
    pub fn scale_to(width: u32) -> Self {
        Self::new().with_crop(CropMode::Scale).with_width(width)
    }

    pub fn with_angle(mut self, angle: i32) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_crop(mut self, crop: CropMode) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Append `next` after `self`, producing a two-stage chain.
    ///
    /// The result keeps `next`'s own parameters; `self` (with its own chain)
    /// moves in front of `next`'s existing chain.
    pub fn then(self, mut next: Transformation) -> Transformation {
        if !self.is_empty() {
            next.chain.insert(0, self);
        }
        next
    }

    /// True when this descriptor encodes to the empty string.
    pub fn is_empty(&self) -> bool {
        self.to_string().is_empty()
    }

    /// Width/height to emit as `<img>` attributes, if the served size is known.
    ///
    /// Rotation and the `fit`/`limit` modes change the output size in ways
    /// the markup cannot predict, so no dimensions are reported for them.
    pub fn html_dimensions(&self) -> (Option<u32>, Option<u32>) {
        let unknown = self.angle.is_some() || self.crop.is_some_and(CropMode::sizes_unknown);
        if unknown {
            (None, None)
        } else {
            (self.width, self.height)
        }
    }

    /// Encoded `key_value` pairs of this component only, sorted.
    fn params(&self) -> Vec<String> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                params.push(format!("{key}_{v}"));
            }
        };

        push("a", self.angle.map(|a| a.to_string()));
        push("b", self.background.clone());
        push("c", self.crop.map(|c| c.to_string()));
        push("dpr", self.dpr.map(format_dpr));
        push("e", self.effect.clone());
        push("f", self.fetch_format.clone());
        push("g", self.gravity.clone());
        push("o", self.opacity.map(|o| o.to_string()));
        push("q", self.quality.clone());
        push("r", self.radius.clone());
        push("x", self.x.map(|x| x.to_string()));
        push("y", self.y.map(|y| y.to_string()));
        if self.crop.is_some() {
            push("h", self.height.map(|h| h.to_string()));
            push("w", self.width.map(|w| w.to_string()));
        }

        params.sort();
        params
    }

    /// Encoded form of this component without its chain.
    fn own_segment(&self) -> String {
        let mut parts = self.params();
        if let Some(raw) = self.raw.as_deref().filter(|r| !r.is_empty()) {
            parts.push(raw.to_string());
        }
        parts.join(",")
    }
}

/// `2.0` renders as `2.0`, not `2`, matching the service's own URLs.
fn format_dpr(dpr: f64) -> String {
    if dpr.fract() == 0.0 {
        format!("{dpr:.1}")
    } else {
        dpr.to_string()
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<String> = self
            .chain
            .iter()
            .map(|t| t.to_string())
            .chain(std::iter::once(self.own_segment()))
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&segments.join("/"))
    }
}

/// Parse the canonical URL form (`c_crop,h_20,w_10`, `/` between components).
///
/// Unrecognized keys are kept, in order, as raw transformation text so that
/// service features this crate does not model still round-trip. `w_`/`h_`
/// in a component without a `c_` crop mode are kept the same way, after
/// the unrecognized keys.
impl FromStr for Transformation {
    type Err = TransformationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(parse_component)
            .collect::<Result<Vec<_>, _>>()?;

        let Some(mut last) = components.pop() else {
            return Ok(Transformation::default());
        };
        last.chain = components;
        Ok(last)
    }
}

fn parse_component(component: &str) -> Result<Transformation, TransformationParseError> {
    let mut t = Transformation::default();
    let mut raw = Vec::new();
    let mut dimensions = Vec::new();

    for param in component.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = param
            .split_once('_')
            .ok_or_else(|| TransformationParseError::MalformedParam(param.to_string()))?;

        match key {
            "a" => t.angle = Some(parse_num("a", value)?),
            "b" => t.background = Some(value.to_string()),
            "c" => t.crop = Some(value.parse()?),
            "dpr" => t.dpr = Some(parse_num("dpr", value)?),
            "e" => t.effect = Some(value.to_string()),
            "f" => t.fetch_format = Some(value.to_string()),
            "g" => t.gravity = Some(value.to_string()),
            "h" => {
                t.height = Some(parse_num("h", value)?);
                dimensions.push(param);
            }
            "o" => t.opacity = Some(parse_num("o", value)?),
            "q" => t.quality = Some(value.to_string()),
            "r" => t.radius = Some(value.to_string()),
            "w" => {
                t.width = Some(parse_num("w", value)?);
                dimensions.push(param);
            }
            "x" => t.x = Some(parse_num("x", value)?),
            "y" => t.y = Some(parse_num("y", value)?),
            _ => raw.push(param),
        }
    }

    // Without a crop mode the encoder drops w/h, so keep them as written.
    if t.crop.is_none() {
        t.width = None;
        t.height = None;
        raw.extend(dimensions);
    }

    if !raw.is_empty() {
        t.raw = Some(raw.join(","));
    }
    Ok(t)
}

fn parse_num<T: FromStr>(key: &'static str, value: &str) -> Result<T, TransformationParseError> {
    value
        .parse()
        .map_err(|_| TransformationParseError::InvalidValue {
            key,
            value: value.to_string(),
        })
}
