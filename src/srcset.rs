//! `srcset` and `sizes` attribute formatting.
//!
//! Each resolved breakpoint becomes one srcset candidate:
//!
//! ```text
//! <base>/<transformation>/c_scale,w_<w>/<public_id> <w>w
//! ```
//!
//! `<transformation>` is the tag's own (common) transformation, or the
//! srcset-specific transformation when one is supplied. The per-width scale
//! directive is chained after it as its own segment, so the common sizing is
//! applied first and the candidate is then scaled to its breakpoint.
//!
//! ## Options Shape
//!
//! The srcset option is either a raw string, used verbatim, or a table:
//!
//! ```toml
//! srcset = "some srcset data as is"
//!
//! [srcset]
//! breakpoints = [100, 200, 300, 399]   # or min_width / max_width / max_images
//! sizes = true
//! transformation = { crop = "crop", width = 10, height = 20 }
//! ```

use crate::breakpoints::{self, BreakpointSpec, ConfigurationError, ResolvedBreakpoints};
use crate::transformation::Transformation;
use crate::url;
use serde::{Deserialize, Serialize};

/// The srcset option as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SrcsetParam {
    /// Pre-formatted attribute value, emitted unchanged.
    Raw(String),
    Options(SrcsetOptions),
}

/// Structured srcset options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SrcsetOptions {
    /// Explicit widths. Mutually exclusive with the range fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_images: Option<u32>,
    /// Replaces the tag's transformation in srcset candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,
    /// Also emit a matching `sizes` attribute.
    pub sizes: bool,
}

impl SrcsetOptions {
    /// Pick the single active breakpoint form.
    pub fn breakpoint_spec(&self) -> Result<BreakpointSpec, ConfigurationError> {
        let has_range =
            self.min_width.is_some() || self.max_width.is_some() || self.max_images.is_some();

        match (&self.breakpoints, has_range) {
            (Some(_), true) => Err(ConfigurationError::ConflictingBreakpoints),
            (Some(list), false) => Ok(BreakpointSpec::Explicit(list.clone())),
            (None, true) => match (self.min_width, self.max_width, self.max_images) {
                (Some(min_width), Some(max_width), Some(max_images)) => Ok(BreakpointSpec::Range {
                    min_width,
                    max_width,
                    max_images,
                }),
                _ => Err(ConfigurationError::MissingBreakpoints),
            },
            (None, false) => Err(ConfigurationError::MissingBreakpoints),
        }
    }
}

impl SrcsetParam {
    pub fn breakpoint_spec(&self) -> Result<BreakpointSpec, ConfigurationError> {
        match self {
            SrcsetParam::Raw(raw) => Ok(BreakpointSpec::Raw(raw.clone())),
            SrcsetParam::Options(options) => options.breakpoint_spec(),
        }
    }
}

/// Attribute values produced for a responsive tag.
///
/// Whenever this is produced the enclosing tag drops its own `width` and
/// `height` attributes; the sizing lives in the candidate URLs instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveAttributes {
    pub srcset: String,
    pub sizes: Option<String>,
}

/// Render the `srcset` value for resolved widths.
///
/// An empty width list renders as the empty string.
pub fn format_srcset(
    public_id: &str,
    base_path: &str,
    common_transformation: &Transformation,
    breakpoints: &[u32],
    custom_transformation: Option<&Transformation>,
) -> String {
    let base = custom_transformation.unwrap_or(common_transformation);
    breakpoints
        .iter()
        .map(|&width| {
            let candidate = base.clone().then(Transformation::scale_to(width));
            format!("{} {}w", url::join(base_path, &candidate, public_id), width)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the `sizes` value: one `(max-width: Wpx) Wpx` per breakpoint.
pub fn format_sizes(breakpoints: &[u32]) -> String {
    breakpoints
        .iter()
        .map(|w| format!("(max-width: {w}px) {w}px"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a srcset option into final attribute values.
///
/// Raw strings skip resolution and URL construction entirely.
pub fn responsive_attributes(
    public_id: &str,
    base_path: &str,
    common_transformation: &Transformation,
    param: &SrcsetParam,
) -> Result<ResponsiveAttributes, ConfigurationError> {
    let spec = param.breakpoint_spec()?;
    let widths = match breakpoints::resolve(&spec)? {
        ResolvedBreakpoints::Raw(raw) => {
            return Ok(ResponsiveAttributes {
                srcset: raw,
                sizes: None,
            });
        }
        ResolvedBreakpoints::Widths(widths) => widths,
    };

    let (custom, want_sizes) = match param {
        SrcsetParam::Options(options) => (options.transformation.as_ref(), options.sizes),
        SrcsetParam::Raw(_) => (None, false),
    };

    Ok(ResponsiveAttributes {
        srcset: format_srcset(public_id, base_path, common_transformation, &widths, custom),
        sizes: want_sizes.then(|| format_sizes(&widths)),
    })
}
