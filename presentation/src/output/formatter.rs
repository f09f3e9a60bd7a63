//! Output formatter trait

use concord_application::ReplayTranscriptOutput;
use concord_domain::ProjectBrief;

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Format a replay result as a report
    fn format_replay(&self, output: &ReplayTranscriptOutput) -> String;

    /// Format a parsed brief as a report
    fn format_brief(&self, brief: &ProjectBrief) -> String;
}
