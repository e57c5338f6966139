//! Launch URLs of the form `<base>/lemonId/<id>`.

use std::fmt;

use crate::types::Lemon;

/// Path segment that marks a launch URL as pointing to a lemon.
pub const LEMON_SEGMENT: &str = "/lemonId";

#[derive(Debug, Clone, PartialEq)]
pub enum DeepLinkError {
    NoLaunchUrl,
    MissingSegment,
    InvalidId(String),
    UnknownId(i64),
}

impl fmt::Display for DeepLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepLinkError::NoLaunchUrl => write!(f, "No launch URL was provided"),
            DeepLinkError::MissingSegment => {
                write!(f, "Launch URL does not contain {}", LEMON_SEGMENT)
            }
            DeepLinkError::InvalidId(segment) => write!(f, "Invalid lemon id: {:?}", segment),
            DeepLinkError::UnknownId(id) => write!(f, "No lemon with id {}", id),
        }
    }
}

impl std::error::Error for DeepLinkError {}

/// Extracts the lemon id from the last path segment of a launch URL.
pub fn parse_lemon_id(url: &str) -> Result<i64, DeepLinkError> {
    let path = strip_query(url);
    if !path.contains(LEMON_SEGMENT) {
        return Err(DeepLinkError::MissingSegment);
    }

    let segment = path.rsplit('/').next().unwrap_or_default().trim();
    segment
        .parse::<i64>()
        .map_err(|_| DeepLinkError::InvalidId(segment.to_string()))
}

/// Finds the lemon a launch URL points to.
pub fn resolve<'a>(url: &str, lemons: &'a [Lemon]) -> Result<&'a Lemon, DeepLinkError> {
    let id = parse_lemon_id(url)?;
    lemons
        .iter()
        .find(|lemon| lemon.id == id)
        .ok_or(DeepLinkError::UnknownId(id))
}

/// Builds the shareable link for `id` from the URL the app was launched with.
///
/// If the launch URL already points to a lemon its last segment is swapped
/// for `id`, otherwise `/lemonId/<id>` is appended.
pub fn share_url(launch_url: &str, id: i64) -> String {
    if launch_url.contains(LEMON_SEGMENT) {
        match launch_url.rfind('/') {
            Some(last_slash) => format!("{}{}", &launch_url[..=last_slash], id),
            None => format!("{}/{}", launch_url, id),
        }
    } else {
        format!("{}{}/{}", launch_url, LEMON_SEGMENT, id)
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
