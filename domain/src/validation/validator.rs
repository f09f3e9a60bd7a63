//! Ordered validator chain
//!
//! ```text
//! document ──► primary (schema) ──accept──► valid
//!                  │ reject
//!                  ▼
//!              fallback 1 ──accept/reject──► result
//!                  │ abstain
//!                  ▼
//!              fallback 2 ... ──► invalid (no shape recognized)
//! ```

use super::rule::{ShapeRule, Verdict};
use super::schema::SchemaRule;
use super::shapes::default_fallbacks;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNRECOGNIZED_SHAPE: &str =
    "no recognized document shape - must contain app, screens, MVP, or components";

/// Result of [`ShapeValidator::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub detail: String,
    /// Name of the rule that decided the result, if any
    pub rule: Option<String>,
}

impl ValidationResult {
    fn decided(is_valid: bool, detail: String, rule: &dyn ShapeRule) -> Self {
        Self {
            is_valid,
            detail,
            rule: Some(rule.name().to_string()),
        }
    }
}

/// Validates a parsed document against a primary rule, then falls back to
/// structural shape recognition.
///
/// The primary rule either accepts the document or defers to the fallbacks.
/// Fallbacks run in order; the first that accepts or rejects decides.
///
/// # Example
///
/// ```
/// use concord_domain::ShapeValidator;
/// use serde_json::json;
///
/// let validator = ShapeValidator::new();
///
/// let strict = validator.validate(&json!({"app": {"name": "X", "description": "Y", "screens": []}}));
/// assert!(strict.is_valid);
/// assert_eq!(strict.detail, "valid against primary schema");
///
/// let loose = validator.validate(&json!({"app": "X", "screens": {}}));
/// assert!(loose.is_valid);
/// assert!(loose.detail.contains("recognized alternative shape"));
/// ```
pub struct ShapeValidator {
    primary: Option<Box<dyn ShapeRule>>,
    fallbacks: Vec<Box<dyn ShapeRule>>,
}

impl Default for ShapeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeValidator {
    /// Built-in minimal schema plus the default fallback shapes
    pub fn new() -> Self {
        Self::with_primary(SchemaRule::builtin())
    }

    /// Custom primary rule plus the default fallback shapes
    pub fn with_primary(primary: impl ShapeRule + 'static) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            fallbacks: default_fallbacks(),
        }
    }

    /// Fallback shapes only
    pub fn structural() -> Self {
        Self {
            primary: None,
            fallbacks: default_fallbacks(),
        }
    }

    /// Append a fallback rule after the existing ones
    pub fn with_fallback(mut self, rule: impl ShapeRule + 'static) -> Self {
        self.fallbacks.push(Box::new(rule));
        self
    }

    /// Names of the configured rules, primary first
    pub fn rule_names(&self) -> Vec<&str> {
        self.primary
            .iter()
            .chain(self.fallbacks.iter())
            .map(|rule| rule.name())
            .collect()
    }

    /// Validate `document`. Never fails; every problem becomes a negative
    /// result with a descriptive detail.
    pub fn validate(&self, document: &Value) -> ValidationResult {
        let mut rejections = Vec::new();

        if let Some(primary) = &self.primary {
            match primary.check(document) {
                Verdict::Accept(detail) => {
                    return ValidationResult::decided(true, detail, primary.as_ref());
                }
                Verdict::Reject(reason) => rejections.push(reason),
                Verdict::Abstain => {}
            }
        }

        for rule in &self.fallbacks {
            match rule.check(document) {
                Verdict::Accept(detail) => {
                    return ValidationResult::decided(true, detail, rule.as_ref());
                }
                Verdict::Reject(reason) => {
                    rejections.push(reason);
                    return ValidationResult::decided(false, rejections.join("; "), rule.as_ref());
                }
                Verdict::Abstain => {}
            }
        }

        rejections.push(UNRECOGNIZED_SHAPE.to_string());
        ValidationResult {
            is_valid: false,
            detail: rejections.join("; "),
            rule: None,
        }
    }
}

impl std::fmt::Debug for ShapeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeValidator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct RejectEverything;

    impl ShapeRule for RejectEverything {
        fn name(&self) -> &str {
            "reject_everything"
        }

        fn check(&self, _document: &Value) -> Verdict {
            Verdict::Reject("nope".to_string())
        }
    }

    struct AcceptTitles;

    impl ShapeRule for AcceptTitles {
        fn name(&self) -> &str {
            "titles"
        }

        fn check(&self, document: &Value) -> Verdict {
            if document.get("title").is_some() {
                Verdict::Accept("valid, recognized fallback shape: title".to_string())
            } else {
                Verdict::Abstain
            }
        }
    }

    #[test]
    fn test_primary_schema_accepts() {
        let result = ShapeValidator::new()
            .validate(&json!({"app": {"name": "X", "description": "Y", "screens": []}}));
        assert!(result.is_valid);
        assert_eq!(result.detail, "valid against primary schema");
        assert_eq!(result.rule.as_deref(), Some("schema"));
    }

    #[test]
    fn test_fallback_accepts_screens_mapping() {
        let result = ShapeValidator::new()
            .validate(&json!({"app": {"name": "X", "description": "Y", "screens": {"home": {}}}}));
        assert!(result.is_valid);
        assert_eq!(result.rule.as_deref(), Some("app_object"));
        assert!(result.detail.starts_with("valid, recognized fallback shape"));
    }

    #[test]
    fn test_alternative_shape() {
        let result = ShapeValidator::new().validate(&json!({"app": "X", "screens": {}}));
        assert!(result.is_valid);
        assert!(result.detail.contains("recognized alternative shape"));
    }

    #[test]
    fn test_mvp_and_loose_shapes() {
        let validator = ShapeValidator::new();
        assert_eq!(
            validator.validate(&json!({"MVP": {"features": []}})).rule.as_deref(),
            Some("mvp")
        );
        assert_eq!(
            validator.validate(&json!({"components": []})).rule.as_deref(),
            Some("wireframe_keys")
        );
    }

    #[test]
    fn test_incomplete_app_object_is_invalid() {
        let result = ShapeValidator::new().validate(&json!({"app": {"name": "X"}}));
        assert!(!result.is_valid);
        assert!(result.detail.contains("schema validation failed"));
        assert!(result.detail.contains("missing required fields in app object: description, screens"));
    }

    #[test]
    fn test_unrecognized_document() {
        let result = ShapeValidator::new().validate(&json!({"title": "Todo"}));
        assert!(!result.is_valid);
        assert!(result.detail.contains("must contain app, screens, MVP, or components"));

        assert!(result.rule.is_none());

        let scalar = ShapeValidator::new().validate(&json!(42));
        assert!(!scalar.is_valid);
        assert!(scalar.detail.ends_with(UNRECOGNIZED_SHAPE));
    }

    #[test]
    fn test_primary_rejection_defers_to_fallbacks() {
        let validator = ShapeValidator::with_primary(RejectEverything);
        let result = validator.validate(&json!({"MVP": "x"}));
        assert!(result.is_valid);
        assert_eq!(result.rule.as_deref(), Some("mvp"));
    }

    #[test]
    fn test_appended_fallback_runs_after_defaults() {
        let validator = ShapeValidator::new().with_fallback(AcceptTitles);
        let result = validator.validate(&json!({"title": "x"}));
        assert!(result.is_valid);
        assert_eq!(result.rule.as_deref(), Some("titles"));

        // Earlier shapes still win when they match
        let result = validator.validate(&json!({"screens": [], "title": "x"}));
        assert_eq!(result.rule.as_deref(), Some("wireframe_keys"));
    }

    #[test]
    fn test_appended_fallback_on_structural_chain() {
        let validator = ShapeValidator::structural().with_fallback(AcceptTitles);
        assert!(validator.validate(&json!({"title": "x"})).is_valid);

        let result = validator.validate(&json!({"other": 1}));
        assert!(!result.is_valid);
        assert_eq!(result.detail, UNRECOGNIZED_SHAPE);
        assert!(result.rule.is_none());
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(
            ShapeValidator::new().rule_names(),
            vec!["schema", "app_object", "app_name_with_screens", "mvp", "wireframe_keys"]
        );
        assert_eq!(ShapeValidator::structural().rule_names().len(), 4);
    }
}
