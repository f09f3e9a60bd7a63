//! Structured document recovery from free text
//!
//! Generators wrap the document in prose, code fences, or a consensus
//! announcement, and often emit slightly malformed JSON. The extractor tries
//! a cascade of strategies and returns the first document that parses:
//!
//! | Order | Strategy | Looks at |
//! |-------|----------|----------|
//! | 1 | [`ExtractionStrategy::ConsensusMarker`] | text after the first `consensus reached:` |
//! | 2 | [`ExtractionStrategy::FencedBlock`] | each ```` ```json ```` / ```` ``` ```` block in order |
//! | 3 | [`ExtractionStrategy::BalancedBraces`] | the span from the first `{` to its matching `}` |
//! | 4 | [`ExtractionStrategy::RegexFallback`] | brace-matching patterns over the whole text |
//!
//! Finding nothing is an expected outcome and yields `None`.

use super::sanitize::{sanitize, strip_fences};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Range;
use std::sync::LazyLock;

/// Default input size above which the regex fallback is skipped
pub const DEFAULT_MAX_REGEX_INPUT_BYTES: usize = 64 * 1024;

static CONSENSUS_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)consensus reached:").expect("marker pattern is valid"));

const FENCE: &str = "```";

/// Brace-matching patterns for the regex fallback, nested-aware first.
static FALLBACK_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").expect("nested pattern is valid"),
        Regex::new(r"(?s)\{.*\}").expect("simple pattern is valid"),
    ]
});

/// Which cascade stage recovered the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    ConsensusMarker,
    FencedBlock,
    BalancedBraces,
    RegexFallback,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::ConsensusMarker => "consensus_marker",
            ExtractionStrategy::FencedBlock => "fenced_block",
            ExtractionStrategy::BalancedBraces => "balanced_braces",
            ExtractionStrategy::RegexFallback => "regex_fallback",
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recovered document and the stage that found it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub document: Value,
    pub strategy: ExtractionStrategy,
}

/// Locates, repairs, and parses a document embedded in free text.
///
/// # Example
///
/// ```
/// use concord_domain::{ExtractionStrategy, StructuredExtractor};
///
/// let extractor = StructuredExtractor::new();
/// let text = r#"CONSENSUS REACHED: {"app": {"name": "X", "description": "Y", "screens": []}}"#;
///
/// let extraction = extractor.extract(text).unwrap();
/// assert_eq!(extraction.strategy, ExtractionStrategy::ConsensusMarker);
/// assert_eq!(extraction.document["app"]["name"], "X");
///
/// assert!(extractor.extract("no structure here").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StructuredExtractor {
    max_regex_input_bytes: usize,
}

impl Default for StructuredExtractor {
    fn default() -> Self {
        Self {
            max_regex_input_bytes: DEFAULT_MAX_REGEX_INPUT_BYTES,
        }
    }
}

impl StructuredExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the input size the regex fallback will scan
    pub fn with_max_regex_input_bytes(mut self, max: usize) -> Self {
        self.max_regex_input_bytes = max;
        self
    }

    pub fn max_regex_input_bytes(&self) -> usize {
        self.max_regex_input_bytes
    }

    /// Run the extraction cascade over `text`.
    pub fn extract(&self, text: &str) -> Option<Extraction> {
        if text.trim().is_empty() {
            return None;
        }

        if let Some(marker) = CONSENSUS_MARKER_RE.find(text)
            && let Some(document) = self.extract_from_block(&text[marker.end()..])
        {
            return Some(Extraction {
                document,
                strategy: ExtractionStrategy::ConsensusMarker,
            });
        }

        for body in fenced_bodies(text) {
            if let Some(document) = self.extract_from_block(body) {
                return Some(Extraction {
                    document,
                    strategy: ExtractionStrategy::FencedBlock,
                });
            }
        }

        if let Some(document) = balanced_document(text) {
            return Some(Extraction {
                document,
                strategy: ExtractionStrategy::BalancedBraces,
            });
        }

        self.regex_document(text).map(|document| Extraction {
            document,
            strategy: ExtractionStrategy::RegexFallback,
        })
    }

    /// Run the cascade and keep only the document
    pub fn extract_document(&self, text: &str) -> Option<Value> {
        self.extract(text).map(|extraction| extraction.document)
    }

    fn extract_from_block(&self, block: &str) -> Option<Value> {
        let block = block.trim();
        if let Some(document) = balanced_document(block) {
            return Some(document);
        }
        let stripped = strip_fences(block);
        balanced_document(&stripped).or_else(|| self.regex_document(&stripped))
    }

    fn regex_document(&self, text: &str) -> Option<Value> {
        if text.len() > self.max_regex_input_bytes {
            return None;
        }
        FALLBACK_RES
            .iter()
            .flat_map(|re| re.find_iter(text))
            .find_map(|candidate| parse_candidate(candidate.as_str()))
    }
}

/// Bodies of the fenced blocks in `text`, in order of appearance.
///
/// A fence that sits inside a string literal of the first balanced object
/// is part of that object's data, not a block boundary. The closing fence
/// is searched outside string literals of the body when the body's quotes
/// balance.
fn fenced_bodies(text: &str) -> Vec<&str> {
    let protected = string_literal_ranges(text);
    let is_protected = |at: usize| protected.iter().any(|range| range.contains(&at));

    let mut bodies = Vec::new();
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find(FENCE) {
        let open = cursor + found;
        cursor = open + FENCE.len();
        if is_protected(open) {
            continue;
        }

        let mut body_start = cursor;
        if text[body_start..].starts_with("json") {
            body_start += "json".len();
        }
        let Some(close) = closing_fence(&text[body_start..]) else {
            break;
        };
        bodies.push(text[body_start..body_start + close].trim());
        cursor = body_start + close + FENCE.len();
    }
    bodies
}

/// Offset of the fence that closes a block body.
fn closing_fence(body: &str) -> Option<usize> {
    let mut literal = StringState::default();
    for (index, c) in body.char_indices() {
        if !literal.step(c) && body[index..].starts_with(FENCE) {
            return Some(index);
        }
    }
    // Unbalanced quotes: fall back to the first fence
    body.find(FENCE)
}

/// Byte ranges of the string literals inside the first balanced object.
fn string_literal_ranges(text: &str) -> Vec<Range<usize>> {
    let Some(start) = text.find('{') else {
        return Vec::new();
    };
    let Some(end) = matching_brace(&text[start..]) else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut literal = StringState::default();
    let mut opened_at = 0;
    for (index, c) in text[start..start + end].char_indices() {
        let was_inside = literal.in_string;
        literal.step(c);
        match (was_inside, literal.in_string) {
            (false, true) => opened_at = start + index,
            (true, false) => ranges.push(opened_at..start + index + 1),
            _ => {}
        }
    }
    ranges
}

/// Tracks whether a character stream is inside a double-quoted literal.
#[derive(Debug, Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Advance over `c`; true when `c` belongs to a string literal,
    /// delimiters included.
    fn step(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return true;
        }
        if c == '"' {
            self.in_string = true;
            return true;
        }
        false
    }
}

/// Parse the span from the first `{` to the brace that closes it.
fn balanced_document(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = matching_brace(&text[start..])?;
    parse_candidate(&text[start..start + end])
}

/// Byte length of the balanced `{ ... }` span at the start of `text`.
///
/// Braces inside double-quoted strings do not count toward the depth.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut literal = StringState::default();

    for (index, c) in text.char_indices() {
        if literal.step(c) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a candidate span, repairing it only if it is not already valid.
fn parse_candidate(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate)
        .or_else(|_| serde_json::from_str(&sanitize(candidate)))
        .ok()
}
