// Configuration loader
// Loads the API key from ~/.solace/config.toml or environment variable

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::settings::Config;

/// Load configuration from the Solace config file or environment.
///
/// A missing API key is a startup-time fatal error, never a per-request one.
pub fn load_config() -> Result<Config> {
    if let Some(config) = try_load_from_file()? {
        return Ok(config);
    }

    if let Ok(api_key) = std::env::var("MISTRAL_API_KEY") {
        if !api_key.is_empty() {
            return Ok(Config::new(api_key));
        }
    }

    bail!(
        "No configuration found. Either set the environment variable:\n\n\
        export MISTRAL_API_KEY=\"...\"\n\n\
        or create ~/.solace/config.toml:\n\n\
        [llm]\n\
        api_key = \"...\"\n\
        chat_model = \"mistral-large-latest\"\n\
        analysis_model = \"mistral-small-latest\""
    );
}

fn try_load_from_file() -> Result<Option<Config>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home.join(".solace/config.toml");

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    #[derive(serde::Deserialize)]
    struct TomlConfig {
        llm: LlmSection,
        #[serde(default)]
        crisis: CrisisSection,
        #[serde(default)]
        sessions: SessionSection,
    }

    #[derive(serde::Deserialize)]
    struct LlmSection {
        api_key: String,
        chat_model: Option<String>,
        analysis_model: Option<String>,
    }

    #[derive(Default, serde::Deserialize)]
    struct CrisisSection {
        keywords_path: Option<PathBuf>,
    }

    #[derive(Default, serde::Deserialize)]
    struct SessionSection {
        timeout_minutes: Option<u64>,
    }

    let toml_config: TomlConfig =
        toml::from_str(&contents).context("Failed to parse config.toml")?;

    if toml_config.llm.api_key.is_empty() {
        bail!("config.toml is missing llm.api_key");
    }

    let mut config = Config::new(toml_config.llm.api_key);
    if let Some(model) = toml_config.llm.chat_model {
        config.chat_model = model;
    }
    if let Some(model) = toml_config.llm.analysis_model {
        config.analysis_model = model;
    }
    config.keywords_path = toml_config.crisis.keywords_path;
    if let Some(timeout) = toml_config.sessions.timeout_minutes {
        config.session_timeout_minutes = timeout;
    }

    Ok(Some(config))
}
