//! Core domain types shared across all modules

pub mod error;
pub mod text;
pub mod thresholds;
