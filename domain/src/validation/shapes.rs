//! Structural fallback shapes
//!
//! Generators rarely match the schema exactly. These rules recognize the
//! shapes that show up in practice, checked in [`default_fallbacks`] order.

use super::rule::{ShapeRule, Verdict};
use serde_json::Value;

const APP_REQUIRED_FIELDS: &[&str] = &["name", "description", "screens"];
const WIREFRAME_KEYS: &[&str] = &["screens", "components", "app", "MVP"];

/// The fallback rules in evaluation order
pub fn default_fallbacks() -> Vec<Box<dyn ShapeRule>> {
    vec![
        Box::new(AppObjectShape),
        Box::new(AppNameWithScreensShape),
        Box::new(MvpShape),
        Box::new(WireframeKeysShape),
    ]
}

/// `app` is an object carrying `name`, `description`, and `screens`.
///
/// Unlike the schema, `screens` may be a keyed mapping as well as a list.
/// When `app` is an object this rule is decisive: missing fields reject the
/// document instead of deferring to looser shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppObjectShape;

impl ShapeRule for AppObjectShape {
    fn name(&self) -> &str {
        "app_object"
    }

    fn check(&self, document: &Value) -> Verdict {
        let Some(app) = document.get("app").and_then(Value::as_object) else {
            return Verdict::Abstain;
        };

        let missing: Vec<&str> = APP_REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !app.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Verdict::Reject(format!(
                "missing required fields in app object: {}",
                missing.join(", ")
            ));
        }

        match app.get("screens") {
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                Verdict::Accept("valid, recognized fallback shape: app object".to_string())
            }
            _ => Verdict::Reject("screens must be an array or object".to_string()),
        }
    }
}

/// `app` is a plain name with a sibling `screens` mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppNameWithScreensShape;

impl ShapeRule for AppNameWithScreensShape {
    fn name(&self) -> &str {
        "app_name_with_screens"
    }

    fn check(&self, document: &Value) -> Verdict {
        let named = document.get("app").is_some_and(Value::is_string);
        let screens = document.get("screens").is_some_and(Value::is_object);
        if named && screens {
            Verdict::Accept(
                "valid, recognized alternative shape: app as string with screens mapping"
                    .to_string(),
            )
        } else {
            Verdict::Abstain
        }
    }
}

/// A top-level `MVP` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct MvpShape;

impl ShapeRule for MvpShape {
    fn name(&self) -> &str {
        "mvp"
    }

    fn check(&self, document: &Value) -> Verdict {
        if document.get("MVP").is_some() {
            Verdict::Accept("valid, recognized fallback shape: MVP".to_string())
        } else {
            Verdict::Abstain
        }
    }
}

/// Any recognizable top-level wireframe key.
///
/// Abstains on everything else so rules appended after it still run.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireframeKeysShape;

impl ShapeRule for WireframeKeysShape {
    fn name(&self) -> &str {
        "wireframe_keys"
    }

    fn check(&self, document: &Value) -> Verdict {
        let Some(map) = document.as_object() else {
            return Verdict::Abstain;
        };
        match WIREFRAME_KEYS.iter().find(|key| map.contains_key(**key)) {
            Some(key) => Verdict::Accept(format!(
                "valid, recognized fallback shape: top-level '{key}' (flexible format)"
            )),
            None => Verdict::Abstain,
        }
    }
}
