//! Project brief intake
//!
//! Splits a free-form user request into the three sections a conversation is
//! seeded with: the idea/MVP, the target personas, and the desired outcomes.

use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

static IDEA_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:idea|mvp|app)[:\s]+").expect("idea label is valid"));

static PERSONAS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpersonas?[:\s]+").expect("personas label is valid"));

static OUTCOMES_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\boutcomes?[:\s]+").expect("outcomes label is valid"));

/// How the sections were told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefLayout {
    /// `idea * personas * outcomes`
    Asterisks,
    /// One paragraph per section
    Paragraphs,
    /// `Idea: ...`, `Personas: ...`, `Outcomes: ...`
    Labels,
}

/// A parsed project request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub idea_mvp: String,
    pub personas: String,
    pub outcomes: String,
    pub layout: BriefLayout,
}

impl ProjectBrief {
    /// Opening message for a conversation about this brief
    pub fn kickoff_message(&self) -> String {
        format!(
            "App Idea/MVP: {}\nUser Personas: {}\nDesired Outcomes: {}\n",
            self.idea_mvp, self.personas, self.outcomes
        )
    }

    fn missing_sections(&self) -> Vec<String> {
        [
            ("idea_mvp", &self.idea_mvp),
            ("personas", &self.personas),
            ("outcomes", &self.outcomes),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

/// Parse a project brief.
///
/// Layouts are tried in order: `*`-separated sections, blank-line-separated
/// paragraphs, then labeled keywords. The first layout yielding three
/// sections wins; extra sections are ignored.
///
/// ```
/// use concord_domain::{BriefLayout, parse_brief};
///
/// let brief = parse_brief("* Recipe app * Busy parents * Plan a week of meals").unwrap();
/// assert_eq!(brief.layout, BriefLayout::Asterisks);
/// assert_eq!(brief.personas, "Busy parents");
/// ```
pub fn parse_brief(text: &str) -> Result<ProjectBrief, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyInput);
    }

    let brief = split_on_asterisks(text)
        .or_else(|| split_on_blank_lines(text))
        .or_else(|| split_on_labels(text))
        .ok_or(DomainError::UnrecognizedBrief)?;

    let missing = brief.missing_sections();
    if !missing.is_empty() {
        return Err(DomainError::MissingSections(missing));
    }
    Ok(brief)
}

fn from_parts<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    layout: BriefLayout,
) -> Option<ProjectBrief> {
    let idea_mvp = parts.next()?.trim().to_string();
    let personas = parts.next()?.trim().to_string();
    let outcomes = parts.next()?.trim().to_string();
    Some(ProjectBrief {
        idea_mvp,
        personas,
        outcomes,
        layout,
    })
}

fn split_on_asterisks(text: &str) -> Option<ProjectBrief> {
    let parts = text.split('*').map(str::trim).filter(|part| !part.is_empty());
    from_parts(parts, BriefLayout::Asterisks)
}

fn split_on_blank_lines(text: &str) -> Option<ProjectBrief> {
    from_parts(BLANK_LINE_RE.split(text.trim()), BriefLayout::Paragraphs)
}

fn split_on_labels(text: &str) -> Option<ProjectBrief> {
    let idea_mvp = labeled_value(text, &IDEA_LABEL_RE, &["personas", "outcomes"])?;
    let personas = labeled_value(text, &PERSONAS_LABEL_RE, &["outcomes"])?;
    let outcomes = labeled_value(text, &OUTCOMES_LABEL_RE, &[])?;
    Some(ProjectBrief {
        idea_mvp,
        personas,
        outcomes,
        layout: BriefLayout::Labels,
    })
}

/// Text after the first `label`, up to the end of its line or the first
/// of `stop_words` (case-insensitive), whichever comes first.
fn labeled_value(text: &str, label: &Regex, stop_words: &[&str]) -> Option<String> {
    let start = label.find(text)?.end();
    let rest = &text[start..];
    // ASCII lowercasing keeps byte offsets aligned with `rest`
    let lowered = rest.to_ascii_lowercase();

    let end = stop_words
        .iter()
        .filter_map(|word| lowered.find(word))
        .chain(lowered.find('\n'))
        .min()
        .unwrap_or(rest.len());

    Some(rest[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asterisk_layout() {
        let brief =
            parse_brief("* Test app. MVP: Test features. * Test user (25). * Test outcomes")
                .unwrap();
        assert_eq!(brief.layout, BriefLayout::Asterisks);
        assert_eq!(brief.idea_mvp, "Test app. MVP: Test features.");
        assert_eq!(brief.personas, "Test user (25).");
        assert_eq!(brief.outcomes, "Test outcomes");
    }

    #[test]
    fn test_asterisk_layout_ignores_extra_sections() {
        let brief = parse_brief("a * b * c * d").unwrap();
        assert_eq!(brief.outcomes, "c");
    }

    #[test]
    fn test_paragraph_layout() {
        let text = "A habit tracker\n\nStudents and night owls\n  \nBuild three habits a month";
        let brief = parse_brief(text).unwrap();
        assert_eq!(brief.layout, BriefLayout::Paragraphs);
        assert_eq!(brief.idea_mvp, "A habit tracker");
        assert_eq!(brief.personas, "Students and night owls");
        assert_eq!(brief.outcomes, "Build three habits a month");
    }

    #[test]
    fn test_label_layout_on_separate_lines() {
        let text = "Idea: plant watering reminders\nPersonas: apartment gardeners\nOutcomes: fewer dead plants";
        let brief = parse_brief(text).unwrap();
        assert_eq!(brief.layout, BriefLayout::Labels);
        assert_eq!(brief.idea_mvp, "plant watering reminders");
        assert_eq!(brief.personas, "apartment gardeners");
        assert_eq!(brief.outcomes, "fewer dead plants");
    }

    #[test]
    fn test_label_layout_on_one_line() {
        let text = "MVP: carpool planner Personas: commuters Outcomes: shared rides";
        let brief = parse_brief(text).unwrap();
        assert_eq!(brief.idea_mvp, "carpool planner");
        assert_eq!(brief.personas, "commuters");
        assert_eq!(brief.outcomes, "shared rides");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_brief(""), Err(DomainError::EmptyInput));
        assert_eq!(parse_brief(" \n\t "), Err(DomainError::EmptyInput));
    }

    #[test]
    fn test_unrecognized_input() {
        assert_eq!(
            parse_brief("just a single sentence about an app"),
            Err(DomainError::UnrecognizedBrief)
        );
    }

    #[test]
    fn test_missing_sections_from_labels() {
        let text = "Idea: a budgeting tool\nPersonas:\nOutcomes: save money";
        // "Personas:" swallows the newline, so the persona value runs into "Outcomes"
        let err = parse_brief(text).unwrap_err();
        assert_eq!(err, DomainError::MissingSections(vec!["personas".to_string()]));
        assert_eq!(err.to_string(), "Missing required components: personas");
    }

    #[test]
    fn test_kickoff_message() {
        let brief = parse_brief("a * b * c").unwrap();
        assert_eq!(
            brief.kickoff_message(),
            "App Idea/MVP: a\nUser Personas: b\nDesired Outcomes: c\n"
        );
    }
}
