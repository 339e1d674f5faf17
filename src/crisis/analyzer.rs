// Risk analyzer
//
// Combines the lexical screener with a best-effort LLM classification.
// Assessments never fail: any classifier error degrades to a safe default,
// and a keyword match is a severity floor the model cannot lower.

use std::cmp;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::keywords::KeywordScreener;
use crate::errors::ChatError;
use crate::llm::{ChatMessage, LlmClient, ResponseFormat};

/// Ordered severity tiers. Unknown sorts below Low so it can never raise a
/// final level on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the final level was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMethod {
    /// Lexical screening only, no classifier configured.
    Keyword,
    /// LLM classification succeeded.
    AiAnalysis,
    /// LLM classification failed and was replaced with a safe default.
    AiAnalysisFallback,
}

/// Per-message risk assessment. Computed fresh for each message and not
/// persisted beyond the turn.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub keyword_flag: bool,
    pub model_risk_level: RiskLevel,
    pub final_risk_level: RiskLevel,
    pub sentiment: String,
    pub method: AssessmentMethod,
}

/// Structured result requested from the classifier model.
#[derive(Debug, Deserialize)]
struct ModelClassification {
    risk_level: RiskLevel,
    #[serde(default)]
    sentiment: Option<String>,
}

const RISK_SYSTEM_PROMPT: &str = "You are a risk assessment assistant. Analyze the user's \
message for crisis risk. Respond with a JSON object with exactly two keys: \"risk_level\" \
(one of \"low\", \"moderate\", \"high\", \"critical\") and \"sentiment\" (a short \
description of the emotional tone).";

const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(20);

pub struct RiskAnalyzer {
    screener: KeywordScreener,
    classifier: Option<Arc<dyn LlmClient>>,
    classify_timeout: Duration,
}

impl RiskAnalyzer {
    pub fn new(screener: KeywordScreener, classifier: Arc<dyn LlmClient>) -> Self {
        Self {
            screener,
            classifier: Some(classifier),
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    /// Analyzer without a model classifier. Assessments carry
    /// `AssessmentMethod::Keyword` and rely on the lexical floor alone.
    pub fn lexical_only(screener: KeywordScreener) -> Self {
        Self {
            screener,
            classifier: None,
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    /// Bound the wait on the classifier model. A timeout counts as a
    /// transport failure and degrades to the lexical floor.
    pub fn with_classify_timeout(mut self, classify_timeout: Duration) -> Self {
        self.classify_timeout = classify_timeout;
        self
    }

    /// Assess one message, optionally with recent conversation context.
    /// Infallible: classifier errors are recovered locally.
    pub async fn assess(
        &self,
        text: &str,
        history: Option<&[ChatMessage]>,
    ) -> RiskAssessment {
        let keyword_floor = self.screener.match_phrase(text).map(|hit| hit.floor);
        let keyword_flag = keyword_floor.is_some();
        let floor = keyword_floor.unwrap_or(RiskLevel::Low);

        let Some(classifier) = &self.classifier else {
            return RiskAssessment {
                keyword_flag,
                model_risk_level: RiskLevel::Unknown,
                final_risk_level: floor,
                sentiment: "unknown".to_string(),
                method: AssessmentMethod::Keyword,
            };
        };

        match self.classify(classifier.as_ref(), text, history).await {
            Ok(classification) => {
                // Keyword evidence is authoritative for the severity floor:
                // the model can raise the tier but never lower it.
                let final_level = cmp::max(floor, classification.risk_level);
                RiskAssessment {
                    keyword_flag,
                    model_risk_level: classification.risk_level,
                    final_risk_level: final_level,
                    sentiment: classification
                        .sentiment
                        .unwrap_or_else(|| "unknown".to_string()),
                    method: AssessmentMethod::AiAnalysis,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Risk classification unavailable, using lexical floor");
                RiskAssessment {
                    keyword_flag,
                    model_risk_level: RiskLevel::Unknown,
                    final_risk_level: floor,
                    sentiment: "unknown".to_string(),
                    method: AssessmentMethod::AiAnalysisFallback,
                }
            }
        }
    }

    async fn classify(
        &self,
        classifier: &dyn LlmClient,
        text: &str,
        history: Option<&[ChatMessage]>,
    ) -> Result<ModelClassification, ChatError> {
        let mut messages = Vec::new();
        if let Some(history) = history {
            messages.extend_from_slice(history);
        }
        messages.push(ChatMessage::user(text));

        let raw = timeout(
            self.classify_timeout,
            classifier.complete(RISK_SYSTEM_PROMPT, &messages, ResponseFormat::JsonObject),
        )
        .await
        .map_err(|_| ChatError::Transport("risk classification timed out".to_string()))??;

        serde_json::from_str(&raw).map_err(|e| ChatError::MalformedResponse(e.to_string()))
    }
}
