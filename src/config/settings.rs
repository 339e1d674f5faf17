// Configuration structs

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Mistral API key
    pub api_key: String,

    /// Model used for empathetic replies
    pub chat_model: String,

    /// Smaller model used for risk classification
    pub analysis_model: String,

    /// Optional override for the crisis keyword set (JSON file)
    pub keywords_path: Option<PathBuf>,

    /// Chat interaction log destination
    pub log_path: PathBuf,

    /// Sessions idle beyond this are evicted by the store
    pub session_timeout_minutes: u64,
}

impl Config {
    pub fn new(api_key: String) -> Self {
        let home = dirs::home_dir().expect("Could not determine home directory");

        Self {
            api_key,
            chat_model: "mistral-large-latest".to_string(),
            analysis_model: "mistral-small-latest".to_string(),
            keywords_path: None,
            log_path: home.join(".solace/chat_log.jsonl"),
            session_timeout_minutes: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("test-key".to_string());
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.chat_model, "mistral-large-latest");
        assert_eq!(config.analysis_model, "mistral-small-latest");
        assert!(config.keywords_path.is_none());
    }
}
