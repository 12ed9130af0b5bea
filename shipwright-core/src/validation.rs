//! Build request validation
//!
//! Validation never fails: it returns every problem it finds as a
//! human-readable message, in a stable order, so clients can fix all of them
//! in one round trip.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Fields every build request must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["app_name", "url", "color", "user_id"];

pub const COLOR_ERROR: &str = "Color must be a 6-character hex value without # (e.g., 'FF5722')";
pub const URL_ERROR: &str = "URL must start with http:// or https://";

const COLOR_LEN: usize = 6;
const BUILD_ID_LEN: usize = 8;

/// Validate an untyped request body
///
/// Returns an empty list when the body is valid. A `null` value is treated
/// the same as an absent field.
pub fn validate_request(body: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if present(body, field).is_none() {
            errors.push(format!("Missing required field: {}", field));
        }
    }

    if let Some(color) = present(body, "color") {
        if !color.as_str().is_some_and(is_valid_color) {
            errors.push(COLOR_ERROR.to_string());
        }
    }

    if let Some(url) = present(body, "url") {
        if !url.as_str().is_some_and(is_valid_url) {
            errors.push(URL_ERROR.to_string());
        }
    }

    for field in ["app_name", "user_id"] {
        if present(body, field).is_some_and(|v| !v.is_string()) {
            errors.push(format!("Field must be a string: {}", field));
        }
    }

    errors
}

/// Alphanumeric and exactly six characters long.
///
/// Letters outside a-f are accepted; only the shape is checked.
pub fn is_valid_color(color: &str) -> bool {
    color.chars().count() == COLOR_LEN && color.chars().all(char::is_alphanumeric)
}

pub fn is_valid_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Generate a short build identifier from a random UUID
pub fn generate_build_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(BUILD_ID_LEN);
    id
}

/// Pick the client-supplied build id, or generate one when it is absent,
/// null or empty
pub fn resolve_build_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => generate_build_id(),
    }
}

fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|v| !v.is_null())
}
