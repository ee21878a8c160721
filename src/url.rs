//! Delivery URL assembly.
//!
//! Every URL this crate emits has the same shape:
//!
//! ```text
//! http://res.cloudinary.com/test123/image/upload/e_sepia/c_scale,w_100/v1234/sample.jpg
//! └──────────── base path ────────────────────┘└── transformation ──┘└ public path ┘
//! ```
//!
//! The base path comes from [`CloudConfig`]; empty segments are skipped so a
//! request without a transformation yields `.../upload/sample.jpg`.

use crate::breakpoints::ConfigurationError;
use crate::config::CloudConfig;
use crate::transformation::Transformation;

const SHARED_HOST: &str = "res.cloudinary.com";

/// Base delivery prefix: `<scheme>://<host>/<cloud>/<resource_type>/<type>`.
pub fn base_path(cloud: &CloudConfig) -> Result<String, ConfigurationError> {
    if cloud.cloud_name.is_empty() {
        return Err(ConfigurationError::MissingCloudName);
    }
    let scheme = if cloud.secure { "https" } else { "http" };
    let host = cloud.cname.as_deref().unwrap_or(SHARED_HOST);
    Ok(format!(
        "{scheme}://{host}/{}/{}/{}",
        cloud.cloud_name, cloud.resource_type, cloud.delivery_type
    ))
}

/// The trailing `[v<version>/]<public_id>[.<format>]` part of a URL.
pub fn public_path(public_id: &str, version: Option<u64>, format: Option<&str>) -> String {
    let file = match format {
        Some(ext) if !ext.is_empty() => format!("{public_id}.{ext}"),
        _ => public_id.to_string(),
    };
    match version {
        Some(v) => format!("v{v}/{file}"),
        None => file,
    }
}

/// Join base path, transformation and public path, skipping empty segments.
pub fn join(base_path: &str, transformation: &Transformation, public_path: &str) -> String {
    let transformation = transformation.to_string();
    [base_path, transformation.as_str(), public_path]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}
