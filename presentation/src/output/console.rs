//! Console output formatter for session outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use concord_application::{ReplayTranscriptOutput, SessionOutcome};
use concord_domain::ProjectBrief;
use serde::Serialize;

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete replay result
    pub fn format_replay(output: &ReplayTranscriptOutput) -> String {
        let outcome = &output.outcome;
        let mut text = String::new();

        text.push_str(&Self::header("Conversation Outcome"));
        text.push('\n');

        let status = match outcome.termination {
            Some(reason) if reason.is_consensus() => reason.as_str().green().bold(),
            Some(reason) => reason.as_str().yellow().bold(),
            None => "transcript exhausted".dimmed(),
        };
        text.push_str(&format!("{} {}\n", "Termination:".cyan().bold(), status));
        text.push_str(&format!(
            "{} {} of {} messages\n",
            "Replayed:".cyan().bold(),
            output.replayed,
            output.total
        ));

        text.push_str(&Self::conversation_section(outcome));
        text.push_str(&Self::consensus_section(outcome));
        text.push_str(&Self::document_section(outcome));
        text.push_str(&Self::footer());

        text
    }

    /// Format a parsed brief
    pub fn format_brief(brief: &ProjectBrief) -> String {
        let mut text = String::new();
        text.push_str(&Self::section_header("Project Brief"));
        for (label, value) in [
            ("Idea/MVP:", &brief.idea_mvp),
            ("Personas:", &brief.personas),
            ("Outcomes:", &brief.outcomes),
        ] {
            text.push_str(&format!("{} {}\n", label.cyan().bold(), value));
        }
        text
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn conversation_section(outcome: &SessionOutcome) -> String {
        let summary = &outcome.conversation;
        let mut text = Self::section_header("Conversation");

        text.push_str(&format!(
            "Rounds: {}/{}  Consensus attempts: {}  Agreement: {:.2}\n",
            summary.round_count,
            summary.max_rounds,
            summary.consensus_attempts,
            summary.agreement_level
        ));
        if summary.stalemate_detected {
            text.push_str(&format!("{}\n", "Stalemate detected".yellow()));
        }
        if !summary.participation.is_empty() {
            text.push_str(&format!("\n{}\n", "Participation:".cyan().bold()));
            for (author, count) in &summary.participation {
                text.push_str(&format!("  * {}: {}\n", author, count));
            }
        }
        if !summary.topics.is_empty() {
            let topics: Vec<&str> = summary.topics.iter().map(String::as_str).collect();
            text.push_str(&format!(
                "{} {}\n",
                "Topics:".cyan().bold(),
                topics.join(", ")
            ));
        }
        text
    }

    fn consensus_section(outcome: &SessionOutcome) -> String {
        let assessment = &outcome.consensus;
        let mut text = Self::section_header("Consensus Analysis");

        text.push_str(&format!(
            "Agreement: {:.2}  Confidence: {:.2}\n",
            assessment.agreement_level, assessment.confidence
        ));
        let flags = [
            ("converged", assessment.converged),
            ("consensus bid", assessment.consensus_attempt),
            ("stalemate", assessment.stalemate),
            ("repetition", assessment.repetition),
            ("force decision", assessment.force_consensus),
        ];
        let raised: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        if !raised.is_empty() {
            text.push_str(&format!("Signals: {}\n", raised.join(", ")));
        }
        text
    }

    fn document_section(outcome: &SessionOutcome) -> String {
        let mut text = Self::section_header("Document");

        let (Some(document), Some(strategy)) = (&outcome.document, outcome.strategy) else {
            text.push_str(&format!("{}\n", "No structured document found".red()));
            return text;
        };

        text.push_str(&format!("{} {}\n", "Recovered via:".cyan().bold(), strategy));
        if let Some(validation) = &outcome.validation {
            let verdict = if validation.is_valid {
                "valid".green().bold()
            } else {
                "invalid".red().bold()
            };
            text.push_str(&format!(
                "{} {} ({})\n",
                "Validation:".cyan().bold(),
                verdict,
                validation.detail
            ));
        }
        text.push('\n');
        text.push_str(&Self::indent(&Self::format_json(document), "  "));
        text.push('\n');
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_replay(&self, output: &ReplayTranscriptOutput) -> String {
        Self::format_replay(output)
    }

    fn format_brief(&self, brief: &ProjectBrief) -> String {
        Self::format_brief(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_application::{ReplayTranscriptInput, ReplayTranscriptUseCase, SessionParams, TranscriptEntry};
    use concord_domain::parse_brief;

    fn replay(entries: &[(&str, &str)]) -> ReplayTranscriptOutput {
        let entries = entries
            .iter()
            .map(|(author, content)| TranscriptEntry::new(Some(author), *content))
            .collect();
        ReplayTranscriptUseCase::default()
            .execute(ReplayTranscriptInput::new(entries, SessionParams::default()))
            .unwrap()
    }

    #[test]
    fn test_format_replay_with_document() {
        colored::control::set_override(false);
        let output = replay(&[
            ("pm", "A notes app"),
            ("dev", r#"consensus reached: {"app": {"name": "Notes", "description": "Jot", "screens": []}}"#),
        ]);
        let text = ConsoleFormatter::format_replay(&output);

        assert!(text.contains("Termination: consensus reached"));
        assert!(text.contains("Replayed: 2 of 2 messages"));
        assert!(text.contains("Recovered via: consensus_marker"));
        assert!(text.contains("Validation: valid (valid against primary schema)"));
        assert!(text.contains("\"name\": \"Notes\""));
        assert!(text.contains("  * pm: 1"));
    }

    #[test]
    fn test_format_replay_without_document() {
        colored::control::set_override(false);
        let output = replay(&[("pm", "Still thinking about it")]);
        let text = ConsoleFormatter::format_replay(&output);

        assert!(text.contains("transcript exhausted"));
        assert!(text.contains("No structured document found"));
    }

    #[test]
    fn test_format_brief() {
        colored::control::set_override(false);
        let brief = parse_brief("Chore app * Roommates * Fair rotas").unwrap();
        let text = ConsoleFormatter.format_brief(&brief);
        assert!(text.contains("Idea/MVP: Chore app"));
        assert!(text.contains("Outcomes: Fair rotas"));
    }

    #[test]
    fn test_format_json() {
        let brief = parse_brief("a * b * c").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&brief)).unwrap();
        assert_eq!(value["personas"], "b");
        assert_eq!(value["layout"], "asterisks");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
