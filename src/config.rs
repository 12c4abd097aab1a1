use anyhow::{Context, Result};
use serde::Deserialize;
use axum::http::HeaderValue;
use std::path::{Path, PathBuf};

/// Persona sent as the system message ahead of every question.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful study assistant specialized in computer science, engineering, cybersecurity and technology.
You provide detailed explanations and step-by-step solutions to questions related to these fields.
Be friendly and engaging in your responses.

Focus on contextual teaching and provide well-structured answers.
When appropriate, use examples and break down complex topics into digestible parts.
";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StudyBotConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    /// File the config was read from, `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Comma-separated origin list. `None` allows any origin.
    pub cors_allowed_origins: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Connection string for the chat history database. Required.
    pub database_url: String,
    /// Applied once while connecting at startup.
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub api_key: String,
    pub system_prompt: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            log_level: "info".into(),
            cors_allowed_origins: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            connect_timeout_ms: 5000,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "openai/gpt-oss-120b".into(),
            temperature: 0.3,
            timeout_secs: 60,
            api_key: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        }
    }
}

/// Returns `~/.studybot/`
pub fn default_studybot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".studybot")
}

/// Returns the default config file path: `~/.studybot/config.toml`
pub fn default_config_path() -> PathBuf {
    default_studybot_dir().join("config.toml")
}

impl StudyBotConfig {
    /// Load config from a TOML file (if it exists), then `.env`, then env vars.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            let mut config: StudyBotConfig =
                toml::from_str(&contents).context("failed to parse config TOML")?;
            config.source = Some(path.to_path_buf());
            config
        } else {
            StudyBotConfig::default()
        };

        // Best-effort .env load; a missing file is not an error.
        let _ = dotenvy::dotenv();

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("STUDYBOT_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("STUDYBOT_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("invalid STUDYBOT_PORT: {val}"))?;
        }
        if let Ok(val) = std::env::var("STUDYBOT_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("STUDYBOT_CORS_ORIGINS") {
            self.server.cors_allowed_origins = Some(val);
        }
        if let Ok(val) = std::env::var("STUDYBOT_DATABASE_URL") {
            self.storage.database_url = val;
        }
        if let Ok(val) = std::env::var("GROQ_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("GROQ_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("GROQ_API_KEY") {
            self.llm.api_key = val;
        }
        Ok(())
    }

    /// Reject configurations the process cannot start with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.storage.database_url.trim().is_empty(),
            "STUDYBOT_DATABASE_URL is required but not set"
        );
        if let Some(origins) = &self.server.cors_allowed_origins {
            for origin in origins.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if origin != "*" && origin.parse::<HeaderValue>().is_err() {
                    anyhow::bail!("invalid CORS origin {origin:?} in STUDYBOT_CORS_ORIGINS");
                }
            }
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), plus the provider credential needed to answer questions.
    pub fn validate_for_serving(&self) -> Result<()> {
        self.validate()?;
        anyhow::ensure!(
            !self.llm.api_key.trim().is_empty(),
            "GROQ_API_KEY is required but not set"
        );
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_config_is_valid_apart_from_database() {
        let config = StudyBotConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.llm.model, "openai/gpt-oss-120b");
        assert_eq!(config.storage.connect_timeout_ms, 5000);
        assert!(config.llm.system_prompt.contains("study assistant"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9090
cors_allowed_origins = "http://localhost:3000"

[storage]
database_url = "sqlite:///tmp/chats.db"

[llm]
temperature = 0.7
"#;
        let config: StudyBotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.server.cors_allowed_origins.as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(config.storage.database_url, "sqlite:///tmp/chats.db");
        assert_eq!(config.llm.temperature, 0.7);
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config = StudyBotConfig::default();
        std::env::set_var("STUDYBOT_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("STUDYBOT_PORT", "3001");
        std::env::set_var("GROQ_API_KEY", "gsk-test");

        config.apply_env_overrides().unwrap();

        assert_eq!(config.storage.database_url, "sqlite::memory:");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.llm.api_key, "gsk-test");
        assert!(config.validate_for_serving().is_ok());

        std::env::remove_var("STUDYBOT_DATABASE_URL");
        std::env::remove_var("STUDYBOT_PORT");
        std::env::remove_var("GROQ_API_KEY");
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config = StudyBotConfig::default();
        std::env::set_var("STUDYBOT_PORT", "not-a-port");
        assert!(config.apply_env_overrides().is_err());
        std::env::remove_var("STUDYBOT_PORT");
    }

    #[test]
    fn serving_requires_api_key() {
        let mut config = StudyBotConfig::default();
        config.storage.database_url = "sqlite::memory:".into();
        assert!(config.validate().is_ok());
        assert!(config.validate_for_serving().is_err());
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        let mut config = StudyBotConfig::default();
        config.storage.database_url = "sqlite::memory:".into();

        config.server.cors_allowed_origins = Some("https://app.example, *".into());
        assert!(config.validate().is_ok());

        config.server.cors_allowed_origins = Some("https://app.example,bad\u{1}origin".into());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid CORS origin"), "{err}");
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = StudyBotConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert!(config.source.is_none());
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn loaded_config_file_is_recorded_as_source() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"llama-3.1-8b-instant\"\n").unwrap();

        let config = StudyBotConfig::load_from(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let mut config = StudyBotConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 3000;
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
