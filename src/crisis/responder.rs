// Crisis responder
//
// Maps risk tiers to fixed safety text. Everything here is static and local
// so crisis replies are never subject to LLM failure.

use super::analyzer::{RiskAssessment, RiskLevel};

/// Fixed full-replacement reply for the keyword short-circuit path.
/// Deliberately not AI-generated.
const SAFETY_MESSAGE: &str = "It sounds like you are going through something very \
difficult right now, and I want you to know you don't have to face it alone. I'm \
not able to help the way a trained counselor can, so please reach out now:\n\n\
- 988 Suicide & Crisis Lifeline: call or text 988 (US)\n\
- Crisis Text Line: text HOME to 741741\n\
- Outside the US: https://findahelpline.com\n\n\
If you are in immediate danger, please call your local emergency number (911 in \
the US). You matter, and help is available right now.";

const FOLLOW_UP_MODERATE: &str = "It sounds like things have been weighing on you. \
If talking to someone would help, the 988 Suicide & Crisis Lifeline (call or text \
988) is there any time, not only in emergencies.";

const FOLLOW_UP_HIGH: &str = "I'm concerned about how you're feeling. Please \
consider reaching out to the 988 Suicide & Crisis Lifeline (call or text 988), or \
text HOME to 741741 to reach the Crisis Text Line. You deserve support from a real \
person.";

const FOLLOW_UP_CRITICAL: &str = "Your safety matters most right now. Please call \
or text 988 (Suicide & Crisis Lifeline) immediately, or call 911 if you are in \
immediate danger. You don't have to go through this alone.";

/// Decides when to intervene and supplies the tier-specific safety text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrisisResponder;

impl CrisisResponder {
    pub fn new() -> Self {
        Self
    }

    /// True iff the final tier is High or Critical, or a keyword fired.
    /// A lexical match always triggers intervention regardless of what the
    /// model estimated.
    pub fn should_intervene(&self, assessment: &RiskAssessment) -> bool {
        assessment.keyword_flag || assessment.final_risk_level >= RiskLevel::High
    }

    /// Tier-specific follow-up appended after a normal AI reply.
    /// Low and Unknown tiers get no follow-up.
    pub fn follow_up_message(&self, level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Moderate => FOLLOW_UP_MODERATE,
            RiskLevel::High => FOLLOW_UP_HIGH,
            RiskLevel::Critical => FOLLOW_UP_CRITICAL,
            RiskLevel::Low | RiskLevel::Unknown => "",
        }
    }

    /// Fixed reply for the full-replacement path. The orchestrator returns
    /// this without ever calling the LLM.
    pub fn safety_message(&self) -> &'static str {
        SAFETY_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crisis::AssessmentMethod;

    fn assessment(keyword_flag: bool, level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            keyword_flag,
            model_risk_level: level,
            final_risk_level: level,
            sentiment: "test".to_string(),
            method: AssessmentMethod::AiAnalysis,
        }
    }

    #[test]
    fn test_intervenes_on_high_and_critical() {
        let responder = CrisisResponder::new();

        assert!(responder.should_intervene(&assessment(false, RiskLevel::High)));
        assert!(responder.should_intervene(&assessment(false, RiskLevel::Critical)));
        assert!(!responder.should_intervene(&assessment(false, RiskLevel::Moderate)));
        assert!(!responder.should_intervene(&assessment(false, RiskLevel::Low)));
    }

    #[test]
    fn test_keyword_flag_forces_intervention() {
        let responder = CrisisResponder::new();

        // Even if the model somehow reported low, a lexical hit intervenes
        assert!(responder.should_intervene(&assessment(true, RiskLevel::Low)));
    }

    #[test]
    fn test_follow_ups_are_distinct_per_tier() {
        let responder = CrisisResponder::new();

        let moderate = responder.follow_up_message(RiskLevel::Moderate);
        let high = responder.follow_up_message(RiskLevel::High);
        let critical = responder.follow_up_message(RiskLevel::Critical);

        assert!(!moderate.is_empty());
        assert!(!high.is_empty());
        assert!(!critical.is_empty());
        assert_ne!(moderate, high);
        assert_ne!(high, critical);

        // All tiers reference a helpline
        assert!(moderate.contains("988"));
        assert!(high.contains("988"));
        assert!(critical.contains("988"));
    }

    #[test]
    fn test_low_and_unknown_get_no_follow_up() {
        let responder = CrisisResponder::new();

        assert!(responder.follow_up_message(RiskLevel::Low).is_empty());
        assert!(responder.follow_up_message(RiskLevel::Unknown).is_empty());
    }

    #[test]
    fn test_safety_message_includes_helplines() {
        let responder = CrisisResponder::new();
        let message = responder.safety_message();

        assert!(message.contains("988"));
        assert!(message.contains("741741"));
    }
}
