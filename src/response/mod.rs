//! Shape validation of raw backend output.
//!
//! One parse attempt, fail fast: the validator never retries or repairs
//! malformed output. It checks structural shape only — field presence,
//! primitive types, and panel numbering — and never judges prose content
//! (visual/narrative fidelity is enforced upstream by instruction).

use crate::error::Error;
use crate::model::{Panel, Storyboard};
use serde_json::Value;

/// Validates a raw backend payload into a [`Storyboard`].
///
/// `expected_start` is 1 for a root request and `root_len + 1` for a
/// branch request.
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator {
    expected_start: u32,
}

impl ResponseValidator {
    pub fn new(expected_start: u32) -> Self {
        Self { expected_start }
    }

    /// Parse and validate one backend payload.
    ///
    /// Error mapping:
    /// - not parseable as JSON → [`Error::BackendFormat`]
    /// - field absent / wrong primitive type → [`Error::MalformedPanel`]
    ///   (with the JSON path of the offending item)
    /// - wrong document shape or bad numbering → [`Error::MalformedStoryboard`]
    pub fn validate(&self, raw: &str) -> Result<Storyboard, Error> {
        let document: Value =
            serde_json::from_str(raw.trim()).map_err(|e| Error::BackendFormat {
                detail: e.to_string(),
            })?;

        let items = document.as_array().ok_or_else(|| Error::MalformedStoryboard {
            detail: "response document is not an array".to_string(),
        })?;

        let mut panels = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            panels.push(validate_panel(item, &format!("[{}]", i))?);
        }

        Storyboard::new(panels, self.expected_start)
    }
}

fn validate_panel(item: &Value, path: &str) -> Result<Panel, Error> {
    let obj = item.as_object().ok_or_else(|| Error::MalformedPanel {
        path: path.to_string(),
        detail: "expected a panel object".to_string(),
    })?;

    let number = match obj.get("panel") {
        None => {
            return Err(Error::MalformedPanel {
                path: format!("{}.panel", path),
                detail: "missing required field".to_string(),
            })
        }
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| Error::MalformedPanel {
                path: format!("{}.panel", path),
                detail: format!("expected a positive integer, got {}", type_name(v)),
            })?,
    };

    Ok(Panel {
        panel: number,
        scene: required_string(obj, path, "scene")?,
        camera: required_string(obj, path, "camera")?,
        action: required_string(obj, path, "action")?,
        dialogue: required_string(obj, path, "dialogue")?,
        image_prompt: required_string(obj, path, "imagePrompt")?,
        video_prompt: required_string(obj, path, "videoPrompt")?,
    })
}

fn required_string(
    obj: &serde_json::Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<String, Error> {
    match obj.get(field) {
        None => Err(Error::MalformedPanel {
            path: format!("{}.{}", path, field),
            detail: "missing required field".to_string(),
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v) => Err(Error::MalformedPanel {
            path: format!("{}.{}", path, field),
            detail: format!("expected a string, got {}", type_name(v)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
