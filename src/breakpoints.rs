//! Breakpoint resolution.
//!
//! A breakpoint is a pixel width at which a distinct image variant is offered
//! to the browser. Callers describe them in one of three ways:
//!
//! | Form | Example | Result |
//! |------|---------|--------|
//! | Explicit list | `[100, 200, 300, 399]` | used as given, order preserved |
//! | Range | `min 100, max 399, images 4` | `[100, 200, 300, 399]` |
//! | Raw string | `"a.jpg 1x, b.jpg 2x"` | passed through untouched |
//!
//! ## Range Spacing
//!
//! The step between widths is `ceil((max - min) / (images - 1))`. Widths are
//! generated from `min` while below `max`, and `max` itself is always the
//! final entry, so rounding never pushes past the upper bound. A range
//! narrower than `images - 1` pixels yields fewer widths rather than
//! duplicates. A single image collapses to `[max]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid responsive-image options. Reported before any output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("either breakpoints or (min_width, max_width, max_images) must be provided")]
    MissingBreakpoints,
    #[error("breakpoints and (min_width, max_width, max_images) are mutually exclusive")]
    ConflictingBreakpoints,
    #[error("breakpoints list must not be empty")]
    EmptyBreakpoints,
    #[error("breakpoint widths must be positive")]
    ZeroWidth,
    #[error("min_width ({min_width}) must not exceed max_width ({max_width})")]
    InvalidRange { min_width: u32, max_width: u32 },
    #[error("max_images must be a positive integer")]
    ZeroMaxImages,
    #[error("cloud_name must be configured")]
    MissingCloudName,
}

/// How the caller described the breakpoints. Exactly one form is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakpointSpec {
    Explicit(Vec<u32>),
    Range {
        min_width: u32,
        max_width: u32,
        max_images: u32,
    },
    Raw(String),
}

/// Output of [`resolve`]: concrete widths, or a raw attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBreakpoints {
    Widths(Vec<u32>),
    Raw(String),
}

impl ResolvedBreakpoints {
    pub fn widths(&self) -> Option<&[u32]> {
        match self {
            ResolvedBreakpoints::Widths(w) => Some(w),
            ResolvedBreakpoints::Raw(_) => None,
        }
    }
}

/// Resolve a breakpoint description into widths.
pub fn resolve(spec: &BreakpointSpec) -> Result<ResolvedBreakpoints, ConfigurationError> {
    let resolved = match spec {
        BreakpointSpec::Explicit(widths) => {
            if widths.is_empty() {
                return Err(ConfigurationError::EmptyBreakpoints);
            }
            if widths.contains(&0) {
                return Err(ConfigurationError::ZeroWidth);
            }
            ResolvedBreakpoints::Widths(widths.clone())
        }
        BreakpointSpec::Range {
            min_width,
            max_width,
            max_images,
        } => ResolvedBreakpoints::Widths(generate_range(*min_width, *max_width, *max_images)?),
        BreakpointSpec::Raw(raw) => ResolvedBreakpoints::Raw(raw.clone()),
    };
    log::debug!("resolved breakpoints {spec:?} -> {resolved:?}");
    Ok(resolved)
}

/// Evenly spaced widths spanning `[min_width, max_width]`.
///
/// # Examples
/// ```
/// # use cloudinary_tags::breakpoints::generate_range;
/// assert_eq!(generate_range(100, 399, 4).unwrap(), vec![100, 200, 300, 399]);
/// assert_eq!(generate_range(100, 399, 1).unwrap(), vec![399]);
/// ```
pub fn generate_range(
    min_width: u32,
    max_width: u32,
    max_images: u32,
) -> Result<Vec<u32>, ConfigurationError> {
    if min_width == 0 || max_width == 0 {
        return Err(ConfigurationError::ZeroWidth);
    }
    if min_width > max_width {
        return Err(ConfigurationError::InvalidRange {
            min_width,
            max_width,
        });
    }
    if max_images == 0 {
        return Err(ConfigurationError::ZeroMaxImages);
    }
    if max_images == 1 {
        return Ok(vec![max_width]);
    }

    let span = max_width - min_width;
    let step = span.div_ceil(max_images - 1).max(1);

    let mut widths: Vec<u32> = (min_width..max_width).step_by(step as usize).collect();
    widths.push(max_width);
    Ok(widths)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // generate_range tests
    // =========================================================================

    #[test]
    fn range_even_spacing_last_exact() {
        assert_eq!(generate_range(100, 399, 4).unwrap(), vec![100, 200, 300, 399]);
    }

    #[test]
    fn range_exact_division() {
        assert_eq!(generate_range(100, 400, 4).unwrap(), vec![100, 200, 300, 400]);
    }

    #[test]
    fn range_single_image_collapses_to_max() {
        assert_eq!(generate_range(100, 399, 1).unwrap(), vec![399]);
        assert_eq!(generate_range(1, 2000, 1).unwrap(), vec![2000]);
    }

    #[test]
    fn range_two_images_are_endpoints() {
        assert_eq!(generate_range(320, 1280, 2).unwrap(), vec![320, 1280]);
    }

    #[test]
    fn range_equal_bounds() {
        assert_eq!(generate_range(500, 500, 5).unwrap(), vec![500]);
    }

    #[test]
    fn range_narrower_than_count_has_no_duplicates() {
        // step = ceil(2 / 4) = 1
        assert_eq!(generate_range(100, 102, 5).unwrap(), vec![100, 101, 102]);
    }

    #[test]
    fn range_is_strictly_increasing() {
        let widths = generate_range(375, 3840, 12).unwrap();
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(widths.first(), Some(&375));
        assert_eq!(widths.last(), Some(&3840));
        assert!(widths.len() <= 12);
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            generate_range(400, 100, 3),
            Err(ConfigurationError::InvalidRange {
                min_width: 400,
                max_width: 100
            })
        );
    }

    #[test]
    fn range_rejects_zero_images() {
        assert_eq!(
            generate_range(100, 400, 0),
            Err(ConfigurationError::ZeroMaxImages)
        );
    }

    #[test]
    fn range_rejects_zero_width() {
        assert_eq!(generate_range(0, 400, 3), Err(ConfigurationError::ZeroWidth));
    }

    // =========================================================================
    // resolve tests
    // =========================================================================

    #[test]
    fn explicit_list_used_unmodified() {
        let spec = BreakpointSpec::Explicit(vec![300, 100, 200]);
        assert_eq!(
            resolve(&spec).unwrap(),
            ResolvedBreakpoints::Widths(vec![300, 100, 200])
        );
    }

    #[test]
    fn explicit_empty_list_is_error() {
        let spec = BreakpointSpec::Explicit(vec![]);
        assert_eq!(resolve(&spec), Err(ConfigurationError::EmptyBreakpoints));
    }

    #[test]
    fn explicit_zero_width_is_error() {
        let spec = BreakpointSpec::Explicit(vec![100, 0]);
        assert_eq!(resolve(&spec), Err(ConfigurationError::ZeroWidth));
    }

    #[test]
    fn raw_passes_through() {
        let spec = BreakpointSpec::Raw("some srcset data as is".to_string());
        let resolved = resolve(&spec).unwrap();
        assert_eq!(
            resolved,
            ResolvedBreakpoints::Raw("some srcset data as is".to_string())
        );
        assert_eq!(resolved.widths(), None);
    }

    #[test]
    fn range_spec_resolves() {
        let spec = BreakpointSpec::Range {
            min_width: 100,
            max_width: 399,
            max_images: 4,
        };
        assert_eq!(
            resolve(&spec).unwrap().widths(),
            Some(&[100, 200, 300, 399][..])
        );
    }
}
