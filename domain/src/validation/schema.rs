//! Primary validation against a JSON Schema

use super::rule::{ShapeRule, Verdict};
use jsonschema::Validator;
use serde_json::{Value, json};
use thiserror::Error;

/// Errors building a [`SchemaRule`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// The minimal schema used when no schema is supplied or it cannot be used.
///
/// Requires an `app` object carrying `name`, `description`, and a `screens`
/// array.
pub fn builtin_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "app": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "screens": {"type": "array"}
                },
                "required": ["name", "description", "screens"]
            }
        },
        "required": ["app"]
    })
}

/// Validates documents against a compiled JSON Schema.
pub struct SchemaRule {
    validator: Validator,
    builtin: bool,
}

impl SchemaRule {
    /// Compile `schema`
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Invalid(e.to_string()))?;
        Ok(Self {
            validator,
            builtin: false,
        })
    }

    /// Rule for the built-in minimal schema
    pub fn builtin() -> Self {
        let validator =
            jsonschema::validator_for(&builtin_schema()).expect("built-in schema compiles");
        Self {
            validator,
            builtin: true,
        }
    }

    /// Whether this rule uses the built-in minimal schema
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }
}

impl Default for SchemaRule {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for SchemaRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRule")
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}

impl ShapeRule for SchemaRule {
    fn name(&self) -> &str {
        "schema"
    }

    fn check(&self, document: &Value) -> Verdict {
        let messages: Vec<String> = self
            .validator
            .iter_errors(document)
            .map(|err| err.to_string())
            .collect();
        if messages.is_empty() {
            Verdict::Accept("valid against primary schema".to_string())
        } else {
            Verdict::Reject(format!("schema validation failed: {}", messages.join("; ")))
        }
    }
}
