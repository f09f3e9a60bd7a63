//! Recovering structured documents from generator output

pub mod extractor;
pub mod sanitize;

pub use extractor::{
    DEFAULT_MAX_REGEX_INPUT_BYTES, Extraction, ExtractionStrategy, StructuredExtractor,
};
pub use sanitize::sanitize;
