//! Shape validation for recovered documents
//!
//! A [`ShapeValidator`] runs a primary [`SchemaRule`] followed by an ordered
//! list of structural [`ShapeRule`]s. Validation never fails; it returns a
//! [`ValidationResult`] describing which rule decided and why.

pub mod rule;
pub mod schema;
pub mod shapes;
pub mod validator;

pub use rule::{ShapeRule, Verdict};
pub use schema::{SchemaError, SchemaRule, builtin_schema};
pub use shapes::{
    AppNameWithScreensShape, AppObjectShape, MvpShape, WireframeKeysShape, default_fallbacks,
};
pub use validator::{ShapeValidator, ValidationResult};
