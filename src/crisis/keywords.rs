// Crisis keyword screener
//
// Deterministic lexical scan, no external calls. This is the fast path that
// stays available when the LLM is unreachable.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::analyzer::RiskLevel;
use crate::errors::ChatError;

/// Versioned crisis phrase set, grouped by category.
///
/// The `critical` list holds phrases indicating imminent intent; a match
/// there floors the risk tier at Critical instead of High.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisKeywords {
    pub critical: Vec<String>,
    pub self_harm: Vec<String>,
    pub violence: Vec<String>,
    pub abuse: Vec<String>,
}

fn strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|s| s.to_string()).collect()
}

impl Default for CrisisKeywords {
    fn default() -> Self {
        Self {
            critical: strings(&[
                "kill myself",
                "end my life",
                "suicide",
                "suicidal",
                "want to die",
                "better off dead",
                "no reason to live",
                "end it all",
            ]),
            self_harm: strings(&[
                "hurt myself",
                "harm myself",
                "self harm",
                "self-harm",
                "cut myself",
                "cutting myself",
                "overdose",
            ]),
            violence: strings(&[
                "kill someone",
                "hurt someone",
                "kill him",
                "kill her",
            ]),
            abuse: strings(&[
                "being abused",
                "abusing me",
                "he hits me",
                "she hits me",
                "afraid to go home",
            ]),
        }
    }
}

/// First matching phrase and the severity floor it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    pub phrase: &'a str,
    pub floor: RiskLevel,
}

/// Case-insensitive whole-phrase matcher over the crisis keyword set.
///
/// Phrases match on word boundaries only, so "kill" inside "killer deal"
/// never fires. Patterns are compiled once at construction.
#[derive(Clone)]
pub struct KeywordScreener {
    patterns: Vec<(Regex, String, RiskLevel)>,
}

impl KeywordScreener {
    pub fn new(keywords: CrisisKeywords) -> Result<Self, ChatError> {
        let mut patterns = Vec::new();
        let groups = [
            (&keywords.critical, RiskLevel::Critical),
            (&keywords.self_harm, RiskLevel::High),
            (&keywords.violence, RiskLevel::High),
            (&keywords.abuse, RiskLevel::High),
        ];

        for (phrases, floor) in groups {
            for phrase in phrases {
                let pattern = format!(r"\b{}\b", regex::escape(phrase));
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ChatError::Configuration(format!(
                            "invalid crisis phrase {phrase:?}: {e}"
                        ))
                    })?;
                patterns.push((regex, phrase.clone(), floor));
            }
        }

        Ok(Self { patterns })
    }

    /// Load a phrase set from a JSON file matching the CrisisKeywords shape.
    pub fn load_from_file(path: &Path) -> Result<Self, ChatError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ChatError::Configuration(format!(
                "failed to read crisis keywords file {}: {e}",
                path.display()
            ))
        })?;

        let keywords: CrisisKeywords = serde_json::from_str(&contents).map_err(|e| {
            ChatError::Configuration(format!("failed to parse crisis keywords file: {e}"))
        })?;

        Self::new(keywords)
    }

    /// True if the text contains any crisis phrase. Returns on the first hit.
    pub fn scan(&self, text: &str) -> bool {
        self.match_phrase(text).is_some()
    }

    /// First matching phrase with its severity floor, in set order.
    /// Critical phrases are checked first, so a multi-category hit reports
    /// the most severe floor.
    pub fn match_phrase(&self, text: &str) -> Option<KeywordMatch<'_>> {
        for (regex, phrase, floor) in &self.patterns {
            if regex.is_match(text) {
                tracing::warn!(phrase = %phrase, "Crisis keyword detected");
                return Some(KeywordMatch {
                    phrase,
                    floor: *floor,
                });
            }
        }
        None
    }
}

impl Default for KeywordScreener {
    fn default() -> Self {
        // The built-in set contains only escaped literal phrases.
        Self::new(CrisisKeywords::default()).expect("built-in crisis keywords must compile")
    }
}
