//! End-to-end checks of the public API: options in, attributes and markup out.
//!
//! Fixtures follow the common responsive setup used throughout the crate:
//! a `test123` cloud, a sepia base effect and four breakpoints.

use cloudinary_tags::{
    Config, CropMode, ImageOptions, PictureChild, SourceEntry, SrcsetOptions, SrcsetParam,
    Transformation, image_tag, picture_tag,
};
use maud::Render;

const BREAKPOINTS: [u32; 4] = [100, 200, 300, 399];
const UPLOAD_PATH: &str = "http://res.cloudinary.com/test123/image/upload";

fn expected_srcset(public_id: &str, common: &str, breakpoints: &[u32]) -> String {
    breakpoints
        .iter()
        .map(|w| format!("{UPLOAD_PATH}/{common}/c_scale,w_{w}/{public_id} {w}w"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn config() -> Config {
    Config::for_cloud("test123")
}

fn sepia_with(srcset: SrcsetParam) -> ImageOptions {
    ImageOptions {
        transformation: Transformation::new().with_effect("sepia"),
        srcset: Some(srcset),
        ..Default::default()
    }
}

fn options(srcset: SrcsetOptions) -> SrcsetParam {
    SrcsetParam::Options(srcset)
}

// =========================================================================
// srcset
// =========================================================================

#[test]
fn srcset_from_explicit_breakpoints() {
    let opts = sepia_with(options(SrcsetOptions {
        breakpoints: Some(BREAKPOINTS.to_vec()),
        ..Default::default()
    }));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    let srcset = tag.attributes()["srcset"].clone();

    assert_eq!(srcset.split(", ").count(), 4);
    assert_eq!(srcset, expected_srcset("sample.jpg", "e_sepia", &BREAKPOINTS));
}

#[test]
fn srcset_from_min_max_and_image_count() {
    let opts = sepia_with(options(SrcsetOptions {
        min_width: Some(100),
        max_width: Some(399),
        max_images: Some(4),
        ..Default::default()
    }));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.srcset.as_deref(),
        Some(expected_srcset("sample.jpg", "e_sepia", &BREAKPOINTS).as_str())
    );
}

#[test]
fn single_srcset_image_uses_max_width() {
    let opts = sepia_with(options(SrcsetOptions {
        min_width: Some(100),
        max_width: Some(399),
        max_images: Some(1),
        ..Default::default()
    }));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.srcset.as_deref(),
        Some(expected_srcset("sample.jpg", "e_sepia", &[399]).as_str())
    );
}

#[test]
fn custom_transformation_for_srcset_items() {
    let opts = sepia_with(options(SrcsetOptions {
        breakpoints: Some(BREAKPOINTS.to_vec()),
        transformation: Some(
            Transformation::new()
                .with_crop(CropMode::Crop)
                .with_width(10)
                .with_height(20),
        ),
        ..Default::default()
    }));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.srcset.as_deref(),
        Some(expected_srcset("sample.jpg", "c_crop,h_20,w_10", &BREAKPOINTS).as_str())
    );
}

#[test]
fn sizes_attribute_populated() {
    let opts = sepia_with(options(SrcsetOptions {
        breakpoints: Some(BREAKPOINTS.to_vec()),
        sizes: true,
        ..Default::default()
    }));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.attributes()["sizes"],
        "(max-width: 100px) 100px, (max-width: 200px) 200px, \
         (max-width: 300px) 300px, (max-width: 399px) 399px"
    );
}

#[test]
fn srcset_string_value_used_as_is() {
    let raw = "some srcset data as is";
    let opts = sepia_with(SrcsetParam::Raw(raw.to_string()));
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(tag.attributes()["srcset"], raw);
    assert!(!tag.attributes().contains_key("sizes"));
}

#[test]
fn width_and_height_move_into_transformation() {
    let opts = ImageOptions {
        transformation: Transformation::new()
            .with_effect("sepia")
            .with_width(500)
            .with_height(500)
            .with_crop(CropMode::Scale),
        srcset: Some(options(SrcsetOptions {
            breakpoints: Some(BREAKPOINTS.to_vec()),
            ..Default::default()
        })),
        ..Default::default()
    };
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.srcset.as_deref(),
        Some(expected_srcset("sample.jpg", "c_scale,e_sepia,h_500,w_500", &BREAKPOINTS).as_str())
    );
    let attrs = tag.attributes();
    assert!(attrs.get("width").is_none());
    assert!(attrs.get("height").is_none());
}

#[test]
fn identical_inputs_render_identically() {
    let opts = sepia_with(options(SrcsetOptions {
        breakpoints: Some(BREAKPOINTS.to_vec()),
        sizes: true,
        ..Default::default()
    }));
    let a = image_tag("sample.jpg", &opts, &config()).unwrap();
    let b = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(a.render().into_string(), b.render().into_string());
}

#[test]
fn options_deserialize_from_toml() {
    let opts: ImageOptions = toml::from_str(
        r#"
transformation = { effect = "sepia" }

[srcset]
breakpoints = [100, 200, 300, 399]
sizes = true
"#,
    )
    .unwrap();
    let tag = image_tag("sample.jpg", &opts, &config()).unwrap();
    assert_eq!(
        tag.srcset.as_deref(),
        Some(expected_srcset("sample.jpg", "e_sepia", &BREAKPOINTS).as_str())
    );
    assert!(tag.sizes.is_some());
}

// =========================================================================
// picture
// =========================================================================

fn fill_options() -> ImageOptions {
    ImageOptions {
        transformation: Transformation::new()
            .with_width(BREAKPOINTS[3])
            .with_height(BREAKPOINTS[3])
            .with_crop(CropMode::Fill),
        ..Default::default()
    }
}

fn sources() -> Vec<SourceEntry> {
    let scaled = |effect: &str, angle: i32, width: u32| {
        Transformation::new()
            .with_effect(effect)
            .with_angle(angle)
            .with_width(width)
            .with_crop(CropMode::Scale)
    };
    vec![
        SourceEntry::new(BREAKPOINTS[2], scaled("sepia", 17, BREAKPOINTS[3])),
        SourceEntry::new(BREAKPOINTS[1], scaled("colorize", 18, BREAKPOINTS[1])),
        SourceEntry::new(BREAKPOINTS[0], scaled("blur", 19, BREAKPOINTS[0])),
    ]
}

#[test]
fn creates_picture_tag() {
    let fill = fill_options();
    let sources = sources();
    let picture = picture_tag("sample.jpg", &fill, &sources, &config()).unwrap();

    assert!(picture.attributes().is_empty());
    assert_eq!(picture.children.len(), 4);

    let fill_str = fill.transformation.to_string();
    assert_eq!(fill_str, "c_fill,h_399,w_399");
    for (i, source) in sources.iter().enumerate() {
        let expected = format!(
            "{UPLOAD_PATH}/{fill_str}/{}/sample.jpg",
            source.transformation
        );
        assert_eq!(picture.children[i].attributes()["srcset"], expected);
    }

    let media: Vec<String> = picture.children[..3]
        .iter()
        .map(|c| c.attributes()["media"].clone())
        .collect();
    assert_eq!(
        media,
        vec![
            "(min_width: 300px)",
            "(min_width: 200px)",
            "(min_width: 100px)",
        ]
    );
    assert!(matches!(picture.children[3], PictureChild::Image(_)));
}

#[test]
fn picture_markup_has_no_outer_attributes() {
    let picture = picture_tag("sample.jpg", &fill_options(), &sources(), &config()).unwrap();
    let html = picture.render().into_string();
    assert!(html.starts_with("<picture><source "));
    assert_eq!(html.matches("<source ").count(), 3);
    assert_eq!(html.matches("<img ").count(), 1);
}
