//! Shared test utilities for the cloudinary-tags test suite.
//!
//! Fixtures mirror a typical responsive setup: a `test123` cloud, four
//! breakpoints and a helper that spells out the srcset expected for them.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tag = image_tag("sample.jpg", &options, &test_config()).unwrap();
//! assert_eq!(
//!     tag.srcset.as_deref(),
//!     Some(expected_srcset("sample.jpg", "e_sepia", BREAKPOINTS).as_str())
//! );
//! ```

use crate::config::Config;

pub const BREAKPOINTS: &[u32] = &[100, 200, 300, 399];

pub const UPLOAD_PATH: &str = "http://res.cloudinary.com/test123/image/upload";

/// Config for the `test123` cloud over plain http.
pub fn test_config() -> Config {
    Config::for_cloud("test123")
}

/// The srcset expected for `breakpoints` under a common transformation string.
pub fn expected_srcset(public_id: &str, common_transformation: &str, breakpoints: &[u32]) -> String {
    breakpoints
        .iter()
        .map(|w| format!("{UPLOAD_PATH}/{common_transformation}/c_scale,w_{w}/{public_id} {w}w"))
        .collect::<Vec<_>>()
        .join(", ")
}
