// Crisis detection and risk escalation pipeline
// Public interface for screening, risk assessment, and safety responses

mod analyzer;
mod keywords;
mod responder;

pub use analyzer::{AssessmentMethod, RiskAnalyzer, RiskAssessment, RiskLevel};
pub use keywords::{CrisisKeywords, KeywordMatch, KeywordScreener};
pub use responder::CrisisResponder;
