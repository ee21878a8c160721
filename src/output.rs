//! CLI output formatting.
//!
//! # Markup First
//!
//! Every command prints the rendered markup on its first line so the output
//! can be piped straight into a template. With `--explain`, indented context
//! lines follow: one entry per child tag, each with its attributes.
//!
//! # Output Format
//!
//! ## Image
//!
//! ```text
//! <img src="..." srcset="..." sizes="...">
//!     src: http://res.cloudinary.com/test123/image/upload/e_sepia/sample.jpg
//!     srcset:
//!         001 http://.../e_sepia/c_scale,w_100/sample.jpg 100w
//!         002 http://.../e_sepia/c_scale,w_200/sample.jpg 200w
//!     sizes: (max-width: 100px) 100px, (max-width: 200px) 200px
//! ```
//!
//! ## Picture
//!
//! ```text
//! <picture>...</picture>
//! 001 source (min_width: 300px)
//!     srcset: http://.../c_fill,h_399,w_399/a_17,c_scale,e_sepia,w_399/sample.jpg
//! 002 img
//!     src: http://.../c_fill,h_399,w_399/sample.jpg
//! ```
//!
//! ## Breakpoints
//!
//! ```text
//! 001 100px
//! 002 200px
//! ```
//!
//! With `--json`, the attribute mapping is printed instead of markup.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::breakpoints::ResolvedBreakpoints;
use crate::picture::{PictureChild, PictureTag};
use maud::Render;
use std::collections::BTreeMap;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Attribute lines for one tag. `srcset` candidates get one line each.
fn attribute_lines(attrs: &BTreeMap<&'static str, String>, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, value) in attrs {
        let candidates: Vec<&str> = value.split(", ").collect();
        if *name == "srcset" && candidates.len() > 1 {
            lines.push(format!("{}{}:", indent(depth), name));
            for (i, candidate) in candidates.iter().enumerate() {
                lines.push(format!(
                    "{}{} {}",
                    indent(depth + 1),
                    format_index(i + 1),
                    candidate
                ));
            }
        } else {
            lines.push(format!("{}{}: {}", indent(depth), name, value));
        }
    }
    lines
}

// ============================================================================
// Tags
// ============================================================================

/// Format a single tag: markup, then (optionally) its attributes.
pub fn format_tag<T: Render>(
    tag: &T,
    attrs: &BTreeMap<&'static str, String>,
    explain: bool,
) -> Vec<String> {
    let mut lines = vec![tag.render().into_string()];
    if explain {
        lines.extend(attribute_lines(attrs, 1));
    }
    lines
}

/// Format a picture: markup, then (optionally) each child with its attributes.
pub fn format_picture(picture: &PictureTag, explain: bool) -> Vec<String> {
    let mut lines = vec![picture.render().into_string()];
    if !explain {
        return lines;
    }
    for (i, child) in picture.children.iter().enumerate() {
        let label = match child {
            PictureChild::Source(source) => match &source.media {
                Some(media) => format!("source {media}"),
                None => "source".to_string(),
            },
            PictureChild::Image(_) => "img".to_string(),
        };
        lines.push(format!("{} {}", format_index(i + 1), label));
        let mut attrs = child.attributes();
        attrs.remove("media");
        lines.extend(attribute_lines(&attrs, 1));
    }
    lines
}

pub fn print_tag<T: Render>(tag: &T, attrs: &BTreeMap<&'static str, String>, explain: bool) {
    for line in format_tag(tag, attrs, explain) {
        println!("{}", line);
    }
}

pub fn print_picture(picture: &PictureTag, explain: bool) {
    for line in format_picture(picture, explain) {
        println!("{}", line);
    }
}

// ============================================================================
// JSON
// ============================================================================

/// A tag's attribute mapping as pretty JSON, for hosts that render themselves.
pub fn format_tag_json(attrs: &BTreeMap<&'static str, String>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(attrs)
}

/// A picture as `{ "attributes": {}, "children": [{ "tag", "attributes" }] }`.
pub fn format_picture_json(picture: &PictureTag) -> serde_json::Result<String> {
    let children: Vec<serde_json::Value> = picture
        .children
        .iter()
        .map(|child| {
            let tag = match child {
                PictureChild::Source(_) => "source",
                PictureChild::Image(_) => "img",
            };
            serde_json::json!({ "tag": tag, "attributes": child.attributes() })
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "attributes": picture.attributes(),
        "children": children,
    }))
}

// ============================================================================
// Breakpoints
// ============================================================================

/// Format resolved breakpoints, one width per line.
pub fn format_breakpoints(resolved: &ResolvedBreakpoints) -> Vec<String> {
    match resolved {
        ResolvedBreakpoints::Widths(widths) => widths
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{} {}px", format_index(i + 1), w))
            .collect(),
        ResolvedBreakpoints::Raw(raw) => vec![format!("raw: {raw}")],
    }
}

pub fn print_breakpoints(resolved: &ResolvedBreakpoints) {
    for line in format_breakpoints(resolved) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::{SourceEntry, picture_tag};
    use crate::srcset::{SrcsetOptions, SrcsetParam};
    use crate::tags::{ImageOptions, image_tag};
    use crate::test_helpers::*;
    use crate::transformation::Transformation;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn breakpoints_listed_with_index() {
        let lines = format_breakpoints(&ResolvedBreakpoints::Widths(vec![100, 399]));
        assert_eq!(lines, vec!["001 100px", "002 399px"]);
    }

    #[test]
    fn raw_breakpoints_shown_verbatim() {
        let lines = format_breakpoints(&ResolvedBreakpoints::Raw("a 1x".to_string()));
        assert_eq!(lines, vec!["raw: a 1x"]);
    }

    #[test]
    fn image_tag_without_explain_is_one_line() {
        let tag = image_tag("sample.jpg", &ImageOptions::default(), &test_config()).unwrap();
        let lines = format_tag(&tag, &tag.attributes(), false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("<img"));
    }

    #[test]
    fn image_tag_explain_splits_srcset_candidates() {
        let options = ImageOptions {
            transformation: Transformation::new().with_effect("sepia"),
            srcset: Some(SrcsetParam::Options(SrcsetOptions {
                breakpoints: Some(vec![100, 200]),
                ..Default::default()
            })),
            ..Default::default()
        };
        let tag = image_tag("sample.jpg", &options, &test_config()).unwrap();
        let lines = format_tag(&tag, &tag.attributes(), true);
        assert_eq!(lines[1], format!("    src: {UPLOAD_PATH}/e_sepia/sample.jpg"));
        assert_eq!(lines[2], "    srcset:");
        assert_eq!(
            lines[3],
            format!("        001 {UPLOAD_PATH}/e_sepia/c_scale,w_100/sample.jpg 100w")
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn picture_explain_labels_children() {
        let sources = vec![SourceEntry::new(
            300,
            Transformation::new().with_effect("sepia"),
        )];
        let picture =
            picture_tag("sample.jpg", &ImageOptions::default(), &sources, &test_config()).unwrap();
        let lines = format_picture(&picture, true);
        assert!(lines[0].starts_with("<picture>"));
        assert_eq!(lines[1], "001 source (min_width: 300px)");
        assert_eq!(lines[2], format!("    srcset: {UPLOAD_PATH}/e_sepia/sample.jpg"));
        assert_eq!(lines[3], "002 img");
        assert_eq!(lines[4], format!("    src: {UPLOAD_PATH}/sample.jpg"));
    }

    #[test]
    fn picture_json_has_empty_outer_attributes() {
        let sources = vec![
            SourceEntry::new(300, Transformation::new().with_effect("sepia")),
            SourceEntry::new(100, Transformation::new().with_effect("blur")),
        ];
        let picture =
            picture_tag("sample.jpg", &ImageOptions::default(), &sources, &test_config()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_picture_json(&picture).unwrap()).unwrap();
        assert_eq!(json["attributes"], serde_json::json!({}));
        assert_eq!(json["children"].as_array().unwrap().len(), 3);
        assert_eq!(json["children"][1]["attributes"]["media"], "(min_width: 100px)");
        assert_eq!(json["children"][2]["tag"], "img");
    }

    #[test]
    fn tag_json_is_attribute_object() {
        let tag = image_tag("sample.jpg", &ImageOptions::default(), &test_config()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_tag_json(&tag.attributes()).unwrap()).unwrap();
        assert_eq!(json["src"], format!("{UPLOAD_PATH}/sample.jpg"));
    }
}
