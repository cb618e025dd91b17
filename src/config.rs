use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::types::{AppError, AppResult};

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
}

// Keep the key out of logs
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub max_file_size_mb: u64,
    pub debug: bool,
    pub supported_file_types: Vec<String>,
    /// Upper bound on document characters sent to the model. `None` disables the guard.
    pub max_document_chars: Option<usize>,
    /// Sessions unused this long are dropped. `0` keeps them until deleted.
    pub session_idle_minutes: u64,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source; `lookup` returns `None` for unset names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration("GROQ_API_KEY not found in environment variables".to_string())
            })?;

        Ok(Self {
            server: ServerConfig {
                port: parse_var(&lookup, "PORT", 8501)?,
                host: var_or("HOST", "0.0.0.0"),
                cors_allowed_origins: split_list(&var_or("ALLOWED_ORIGINS", "*")),
            },
            llm: LLMConfig {
                api_key,
                api_base: var_or("GROQ_API_BASE", DEFAULT_GROQ_API_BASE),
                model: var_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
                max_tokens: parse_var(&lookup, "MAX_TOKENS", 4096)?,
            },
            app: AppConfig {
                name: var_or("APP_NAME", "AI Document Analyzer"),
                max_file_size_mb: parse_var(&lookup, "MAX_FILE_SIZE_MB", 10)?,
                debug: lookup("DEBUG_MODE")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(false),
                supported_file_types: split_list(&var_or("SUPPORTED_FILE_TYPES", "pdf,txt"))
                    .into_iter()
                    .map(|kind| kind.to_lowercase())
                    .collect(),
                max_document_chars: match lookup("MAX_DOCUMENT_CHARS") {
                    Some(raw) => Some(parse_value("MAX_DOCUMENT_CHARS", &raw)?),
                    None => None,
                },
                session_idle_minutes: parse_var(&lookup, "SESSION_IDLE_MINUTES", 60)?,
                log_dir: lookup("LOG_DIR"),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> AppResult<T> {
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{} has an invalid value: {:?}", name, raw)))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_configuration_error() {
        let err = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk-test")])).unwrap();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_allowed_origins, vec!["*"]);
        assert_eq!(config.llm.api_key, "gsk-test");
        assert_eq!(config.llm.model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.llm.api_base, DEFAULT_GROQ_API_BASE);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.app.name, "AI Document Analyzer");
        assert_eq!(config.app.max_file_size_mb, 10);
        assert_eq!(config.app.supported_file_types, vec!["pdf", "txt"]);
        assert_eq!(config.app.max_document_chars, None);
        assert_eq!(config.app.session_idle_minutes, 60);
        assert!(!config.app.debug);
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("PORT", "9000"),
            ("SUPPORTED_FILE_TYPES", "TXT"),
            ("DEBUG_MODE", "True"),
            ("MAX_DOCUMENT_CHARS", "1000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.app.supported_file_types, vec!["txt"]);
        assert!(config.app.debug);
        assert_eq!(config.app.max_document_chars, Some(1000));

        let err = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "k"), ("MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_split_list_trims_and_skips_empty() {
        assert_eq!(split_list(" pdf, txt ,,"), vec!["pdf", "txt"]);
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u64>("MAX_FILE_SIZE_MB", "ten").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("MAX_FILE_SIZE_MB"));
        assert_eq!(parse_value::<u64>("MAX_FILE_SIZE_MB", " 25 ").unwrap(), 25);
    }

    #[test]
    fn test_llm_config_debug_hides_key() {
        let llm = LLMConfig {
            api_key: "gsk-secret".to_string(),
            api_base: DEFAULT_GROQ_API_BASE.to_string(),
            model: DEFAULT_GROQ_MODEL.to_string(),
            max_tokens: 4096,
        };
        let rendered = format!("{:?}", llm);
        assert!(!rendered.contains("gsk-secret"));
        assert!(rendered.contains(DEFAULT_GROQ_MODEL));
    }
}
