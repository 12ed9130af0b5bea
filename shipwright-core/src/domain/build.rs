//! Build request domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{
    self, COLOR_ERROR, URL_ERROR, is_valid_color, is_valid_url, resolve_build_id,
};

/// A validated request to build one customized APK
///
/// Only constructible through validation, so every instance satisfies the
/// color and URL format rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
    app_name: String,
    url: String,
    color: String,
    user_id: String,
    build_id: String,
}

impl BuildRequest {
    /// Build from typed fields, generating a build id when none is given
    pub fn new(
        app_name: impl Into<String>,
        url: impl Into<String>,
        color: impl Into<String>,
        user_id: impl Into<String>,
        build_id: Option<String>,
    ) -> Result<Self, Vec<String>> {
        let url: String = url.into();
        let color: String = color.into();

        let mut errors = Vec::new();
        if !is_valid_color(&color) {
            errors.push(COLOR_ERROR.to_string());
        }
        if !is_valid_url(&url) {
            errors.push(URL_ERROR.to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let build_id = resolve_build_id(build_id.map(Value::String).as_ref());

        Ok(Self {
            app_name: app_name.into(),
            url,
            color,
            user_id: user_id.into(),
            build_id,
        })
    }

    /// Validate an untyped JSON body and build from it
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let errors = validation::validate_request(body);
        if !errors.is_empty() {
            return Err(errors);
        }

        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self {
            app_name: field("app_name"),
            url: field("url"),
            color: field("color"),
            user_id: field("user_id"),
            build_id: resolve_build_id(body.get("build_id")),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Name the workflow gives the artifact it uploads for this build
    pub fn artifact_name(&self) -> String {
        artifact_name(&self.user_id, &self.build_id)
    }
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub build_id: String,
    pub expected_artifact_name: String,
}

impl DispatchResult {
    pub fn for_request(req: &BuildRequest) -> Self {
        Self {
            build_id: req.build_id.clone(),
            expected_artifact_name: req.artifact_name(),
        }
    }

    /// File name of the APK inside the artifact
    pub fn expected_filename(&self) -> String {
        format!("{}.apk", self.expected_artifact_name)
    }
}

pub fn artifact_name(user_id: &str, build_id: &str) -> String {
    format!("{}_{}", user_id, build_id)
}
