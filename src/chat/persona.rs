// Conversational personas
//
// A persona affects only the system prompt sent with the reply request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Peer,
    Mentor,
    #[default]
    Therapist,
}

impl Persona {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Peer => {
                "You are a supportive peer. Speak casually and warmly, like a good \
                 friend who listens without judging."
            }
            Persona::Mentor => {
                "You are a wise mentor. Offer perspective and gentle, practical \
                 guidance drawn from experience."
            }
            Persona::Therapist => {
                "You are a compassionate therapist. Listen carefully, validate the \
                 user's feelings, and respond with warmth and care."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Peer => "peer",
            Persona::Mentor => "mentor",
            Persona::Therapist => "therapist",
        }
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peer" => Ok(Persona::Peer),
            "mentor" => Ok(Persona::Mentor),
            "therapist" => Ok(Persona::Therapist),
            other => Err(format!(
                "unknown persona {other:?} (expected peer, mentor, or therapist)"
            )),
        }
    }
}
