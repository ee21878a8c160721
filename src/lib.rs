//! # cloudinary-tags
//!
//! Responsive `<img>`, `<source>` and `<picture>` tags for a hosted image
//! delivery service. Images are stored once under a public id; every variant
//! is described by a transformation encoded in the URL and rendered by the
//! service on first request:
//!
//! ```text
//! http://res.cloudinary.com/test123/image/upload/e_sepia/c_scale,w_200/sample.jpg
//! ```
//!
//! This crate only builds those URLs and the markup around them. Nothing is
//! fetched, uploaded or signed.
//!
//! # Pipeline
//!
//! ```text
//! options ─→ breakpoints ─→ srcset / sizes ─→ tags ─→ markup
//!            (resolve)      (format)          (img, source, picture)
//! ```
//!
//! Every step is a pure function of its inputs. Invalid options are reported
//! as [`ConfigurationError`] before any string is produced.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transformation`] | Typed transformation descriptor, canonical `c_crop,h_20,w_10` encoding and parsing |
//! | [`breakpoints`] | Explicit / range / raw breakpoint resolution |
//! | [`srcset`] | `srcset` and `sizes` attribute formatting |
//! | [`url`] | Delivery base path and URL joining |
//! | [`tags`] | `<img>` and `<source>` builders with attribute maps and maud rendering |
//! | [`picture`] | `<picture>` composition from ordered source entries |
//! | [`config`] | `cloudtags.toml` loading, layering and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Example
//!
//! ```
//! use cloudinary_tags::{Config, ImageOptions, SrcsetOptions, SrcsetParam, Transformation, image_tag};
//! use maud::Render;
//!
//! let options = ImageOptions {
//!     transformation: Transformation::new().with_effect("sepia"),
//!     srcset: Some(SrcsetParam::Options(SrcsetOptions {
//!         min_width: Some(100),
//!         max_width: Some(399),
//!         max_images: Some(4),
//!         sizes: true,
//!         ..Default::default()
//!     })),
//!     ..Default::default()
//! };
//! let tag = image_tag("sample.jpg", &options, &Config::for_cloud("test123")).unwrap();
//! assert!(tag.srcset.unwrap().ends_with("c_scale,w_399/sample.jpg 399w"));
//! ```
//!
//! # Design Decisions
//!
//! ## Typed Options Over Option Bags
//!
//! The srcset option is a string *or* a table. It deserializes into
//! [`SrcsetParam`], and the table form is narrowed to exactly one
//! [`breakpoints::BreakpointSpec`] variant up front; giving both an explicit
//! list and a range is an error, not a precedence rule.
//!
//! ## Suppression Lives on the Result
//!
//! A srcset removes `width`/`height` from the built tag. The caller's options
//! are borrowed immutably, so the same options can be reused across calls.
//!
//! ## Maud for Markup
//!
//! Tags implement [`maud::Render`], so they drop straight into `html!`
//! templates and every attribute value is escaped.

pub mod breakpoints;
pub mod config;
pub mod output;
pub mod picture;
pub mod srcset;
pub mod tags;
pub mod transformation;
pub mod url;

pub use breakpoints::{BreakpointSpec, ConfigurationError, ResolvedBreakpoints, resolve};
pub use config::{CloudConfig, Config};
pub use picture::{PictureChild, PictureTag, SourceEntry, format_sources, picture_tag};
pub use srcset::{SrcsetOptions, SrcsetParam, format_sizes, format_srcset};
pub use tags::{ImageOptions, ImageTag, SourceOptions, SourceTag, image_tag, source_tag};
pub use transformation::{CropMode, Transformation};

#[cfg(test)]
pub(crate) mod test_helpers;
