//! Phrase tables consumed by the conversation heuristics.
//!
//! Both [`ConversationTracker`](crate::ConversationTracker) and
//! [`ConsensusAnalyzer`](crate::ConsensusAnalyzer) read from these tables so
//! the two detectors cannot drift apart. Bump [`LEXICON_VERSION`] whenever an
//! entry changes, since scores recorded under one version are not comparable
//! with another.
//!
//! All matching is plain substring membership over lower-cased text. Negated
//! phrases ("I don't agree") still count as agreement; that is a known
//! limitation of the heuristic, not something to patch here.

/// Version of the phrase tables below
pub const LEXICON_VERSION: u32 = 1;

/// Phrases that signal a participant is trying to close the discussion.
pub const CONSENSUS_MARKERS: &[&str] = &[
    "consensus reached",
    "consensus achieved",
    "agreed upon",
    "final decision",
    "we have consensus",
    "consensus has been reached",
    "let's finalize",
    "ready to move forward",
    "we should proceed",
    "consensus reached:",
    "consensus_reached",
];

/// Literal markers that end a conversation outright.
///
/// These two strings are part of the contract with the message generator and
/// must be matched exactly (case-insensitively).
pub const TERMINAL_MARKERS: &[&str] = &["consensus reached:", "consensus_reached"];

/// Phrases that indicate the discussion stopped making progress.
pub const STALEMATE_PHRASES: &[&str] = &[
    "agree to disagree",
    "no consensus",
    "deadlock",
    "cannot agree",
    "stuck",
    "impasse",
    "no progress",
    "going in circles",
];

/// Phrases that nudge the tracker's running agreement level up.
pub const AGREEMENT_PHRASES: &[&str] = &[
    "agree",
    "consensus",
    "yes",
    "correct",
    "good point",
    "that makes sense",
    "i agree",
    "we agree",
];

/// Phrases that nudge the tracker's running agreement level down.
pub const DISAGREEMENT_PHRASES: &[&str] = &[
    "disagree", "no", "wrong", "bad", "problem", "issue", "concern", "dispute",
];

/// Positive indicators for per-message agreement scoring.
pub const POSITIVE_WORDS: &[&str] = &[
    "agree",
    "yes",
    "correct",
    "right",
    "good",
    "excellent",
    "consensus",
    "aligned",
    "support",
    "approve",
    "like",
    "sounds good",
    "works for me",
];

/// Negative indicators for per-message agreement scoring.
pub const NEGATIVE_WORDS: &[&str] = &[
    "disagree",
    "no",
    "wrong",
    "bad",
    "problem",
    "issue",
    "concern",
    "disapprove",
    "against",
    "oppose",
    "don't like",
    "not sure",
    "hesitant",
    "worried",
];

/// Neutral indicators; each counts as half an agreement.
pub const NEUTRAL_WORDS: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "consider",
    "think about",
    "explore",
    "investigate",
    "look into",
    "examine",
];

/// Short explicit agreement phrases that strengthen a consensus bid.
pub const AGREEMENT_PATTERNS: &[&str] = &[
    "i agree",
    "we agree",
    "that's right",
    "exactly",
    "you're right",
    "correct",
    "good point",
    "makes sense",
];

/// Topic label and the keywords that tag a message with it.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("user experience", &["ux", "user experience", "ui", "user interface"]),
    (
        "technical",
        &["technical", "feasibility", "implementation", "architecture"],
    ),
    ("business", &["business", "value", "roi", "market"]),
    ("quality", &["quality", "testing", "qa", "reliability"]),
    ("design", &["design", "layout", "components", "wireframe"]),
];

/// Number of distinct phrases from `phrases` that occur in `lowered`.
///
/// `lowered` must already be lower-cased.
pub fn count_hits(lowered: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| lowered.contains(*p)).count()
}

/// Whether any phrase from `phrases` occurs in `lowered`.
pub fn contains_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| lowered.contains(p))
}

/// Topic labels whose keywords occur in `content`, in table order.
pub fn topics_in(content: &str) -> Vec<&'static str> {
    let lowered = content.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(topic, _)| *topic)
        .collect()
}

/// Whether `content` carries one of the [`TERMINAL_MARKERS`].
pub fn has_terminal_marker(content: &str) -> bool {
    contains_any(&content.to_lowercase(), TERMINAL_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        let tables = [
            CONSENSUS_MARKERS,
            TERMINAL_MARKERS,
            STALEMATE_PHRASES,
            AGREEMENT_PHRASES,
            DISAGREEMENT_PHRASES,
            POSITIVE_WORDS,
            NEGATIVE_WORDS,
            NEUTRAL_WORDS,
            AGREEMENT_PATTERNS,
        ];
        for table in tables {
            for phrase in table {
                assert_eq!(*phrase, phrase.to_lowercase(), "{phrase} must be lower-case");
            }
        }
    }

    #[test]
    fn test_terminal_markers_are_consensus_markers() {
        for marker in TERMINAL_MARKERS {
            assert!(CONSENSUS_MARKERS.contains(marker));
        }
    }

    #[test]
    fn test_count_hits_counts_distinct_phrases() {
        // "agree" also matches inside "disagree"
        assert_eq!(count_hits("i disagree", AGREEMENT_PHRASES), 1);
        assert_eq!(count_hits("stuck at an impasse, stuck", STALEMATE_PHRASES), 2);
        assert_eq!(count_hits("", STALEMATE_PHRASES), 0);
    }

    #[test]
    fn test_topics_in() {
        assert_eq!(
            topics_in("The UI layout needs more testing"),
            vec!["user experience", "quality", "design"]
        );
        assert!(topics_in("lunch?").is_empty());
    }

    #[test]
    fn test_has_terminal_marker() {
        assert!(has_terminal_marker("CONSENSUS REACHED: {}"));
        assert!(has_terminal_marker("status=consensus_reached"));
        assert!(!has_terminal_marker("consensus reached without colon"));
    }
}
