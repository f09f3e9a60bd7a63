//! Application-level configuration.
//!
//! - [`SessionParams`]: round ceiling, heuristic cutoffs, extraction limits

pub mod session_params;

pub use session_params::SessionParams;
