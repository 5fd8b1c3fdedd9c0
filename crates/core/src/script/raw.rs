use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CgError, CgResult};
use crate::resource::ResourceLimiter;

use super::lenient;

/// JSON-facing story document exactly as the authoring surface stored it.
///
/// Every field is optional and wrongly-typed values read as absent, so any
/// JSON object deserializes. Use [`ScriptRaw::normalize`] before resolving
/// anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "camelCase")]
pub struct ScriptRaw {
    #[serde(
        rename = "script_schema_version",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub script_schema_version: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<CoverRaw>")]
    pub cover: Option<CoverRaw>,
    #[serde(default, deserialize_with = "lenient::list")]
    #[schemars(with = "Vec<SceneRaw>")]
    pub scenes: Vec<SceneRaw>,
    #[serde(
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<EndingRaw>")]
    pub ending: Option<EndingRaw>,
    #[serde(
        alias = "start_scene",
        default,
        deserialize_with = "lenient::ident",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub start_scene: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct CoverRaw {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub cta: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SceneRaw {
    #[serde(default, deserialize_with = "lenient::ident", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub background: Option<String>,
    /// Display color; passed through untouched.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub accent: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    #[schemars(with = "Vec<LineRaw>")]
    pub dialogue: Vec<LineRaw>,
    #[serde(default, deserialize_with = "lenient::list")]
    #[schemars(with = "Vec<ChoiceRaw>")]
    pub choices: Vec<ChoiceRaw>,
    #[serde(default, deserialize_with = "lenient::ident", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub next: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct LineRaw {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub speaker: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ChoiceRaw {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::ident", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub next: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct EndingRaw {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub cta: Option<String>,
}

impl ScriptRaw {
    /// Parses a JSON document with the default resource limits.
    ///
    /// Returns `Ok(None)` when the document is `null` or not an object: the
    /// script is "not configured" and the caller should say so.
    pub fn from_json(input: &str) -> CgResult<Option<Self>> {
        Self::from_json_with_limits(input, ResourceLimiter::default())
    }

    /// Parses a JSON document, rejecting it early when it exceeds `limits`.
    pub fn from_json_with_limits(input: &str, limits: ResourceLimiter) -> CgResult<Option<Self>> {
        if input.len() > limits.max_script_bytes {
            return Err(CgError::ResourceLimit(format!(
                "script is {} bytes, budget is {}",
                input.len(),
                limits.max_script_bytes
            )));
        }
        let value: Value =
            serde_json::from_str(input).map_err(|err| json_deserialize_error(input, &err))?;
        let Some(script) = Self::from_value(value)? else {
            tracing::debug!("top-level script is not an object");
            return Ok(None);
        };
        if script.scenes.len() > limits.max_scenes {
            return Err(CgError::ResourceLimit(format!(
                "script has {} scenes, budget is {}",
                script.scenes.len(),
                limits.max_scenes
            )));
        }
        Ok(Some(script))
    }

    /// Reads an already-parsed JSON value. Non-objects are "not configured".
    ///
    /// When both `startScene` and `start_scene` are present, `startScene` wins.
    pub fn from_value(value: Value) -> CgResult<Option<Self>> {
        let Value::Object(mut map) = value else {
            return Ok(None);
        };
        if map.contains_key("startScene") && map.remove("start_scene").is_some() {
            tracing::debug!("ignoring start_scene, startScene is also set");
        }
        serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(|err| CgError::Serialization {
                message: err.to_string(),
                src: String::new(),
                span: (0, 0).into(),
            })
    }

    /// Serializes the script back to pretty JSON.
    pub fn to_json(&self) -> CgResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| CgError::Serialization {
            message: err.to_string(),
            src: String::new(),
            span: (0, 0).into(),
        })
    }
}

/// JSON Schema of the authoring format, for editors and validators.
pub fn script_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ScriptRaw)
}

#[cold]
#[inline(never)]
fn json_deserialize_error(input: &str, err: &serde_json::Error) -> CgError {
    let (offset, length) = json_error_span(input, err);
    let (window, local_offset) = json_error_window(input, offset, length);
    let max_len = window.len().saturating_sub(local_offset);
    let span_len = if max_len == 0 { 0 } else { length.min(max_len) };
    CgError::Serialization {
        message: err.to_string(),
        src: window,
        span: (local_offset, span_len).into(),
    }
}

#[cold]
#[inline(never)]
fn json_error_span(input: &str, error: &serde_json::Error) -> (usize, usize) {
    let line = error.line();
    let column = error.column();
    if line == 0 || column == 0 {
        return (0, 1);
    }
    let mut offset = 0usize;
    for (current_line, chunk) in (1usize..).zip(input.split_inclusive('\n')) {
        if current_line == line {
            let byte_index = chunk
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(idx, _)| idx)
                .unwrap_or(chunk.len().saturating_sub(1));
            return (offset + byte_index, 1);
        }
        offset += chunk.len();
    }
    (input.len().saturating_sub(1), 1)
}

#[cold]
#[inline(never)]
fn json_error_window(input: &str, offset: usize, length: usize) -> (String, usize) {
    const CONTEXT: usize = 160;
    let mut start = offset.saturating_sub(CONTEXT);
    let mut end = (offset + length + CONTEXT).min(input.len());
    while start > 0 && !input.is_char_boundary(start) {
        start -= 1;
    }
    while end < input.len() && !input.is_char_boundary(end) {
        end += 1;
    }
    (input[start..end].to_string(), offset.saturating_sub(start))
}
