use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub static_config: StaticConfig,
    pub llm: LlmConfig,
    pub record_store: RecordStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub enabled: bool,
    pub web_root: String,
}

/// Chat-completion provider (any OpenAI-compatible endpoint)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    /// Model used by `POST /api/generateSVG`
    pub chat_model: String,
    /// Model used by `POST /api/generateSVGFormatted`
    pub structured_model: String,
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    /// Send a JSON schema `response_format` with structured requests
    pub json_schema_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!("unknown deployment mode: {}", other)),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordStoreConfig {
    pub mode: DeploymentMode,
    pub development_url: String,
    pub production_url: String,
    pub collection: String,
    pub auth_token: Option<String>,
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

/// Resolved connection settings for the record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStoreConnection {
    pub base_url: String,
    pub collection: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl RecordStoreConfig {
    /// The single place where a deployment mode turns into a base URL
    pub fn connection_for(&self, mode: DeploymentMode) -> RecordStoreConnection {
        let base_url = match mode {
            DeploymentMode::Development => &self.development_url,
            DeploymentMode::Production => &self.production_url,
        };

        RecordStoreConnection {
            base_url: base_url.clone(),
            collection: self.collection.clone(),
            auth_token: self.auth_token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn connection(&self) -> RecordStoreConnection {
        self.connection_for(self.mode)
    }
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given path, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        let mut config = match path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(found) => Self::from_toml(&found)?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST / APP_SERVER_PORT
    /// - APP_LOG_LEVEL
    /// - APP_LLM_BASE_URL / APP_LLM_API_KEY
    /// - APP_LLM_CHAT_MODEL / APP_LLM_STRUCTURED_MODEL
    /// - APP_LLM_TIMEOUT_SECS (accepts "90", "90s", "2m")
    /// - APP_MODE: record store deployment mode ("development" / "production")
    /// - APP_RECORD_STORE_DEV_URL / APP_RECORD_STORE_PROD_URL
    /// - APP_RECORD_STORE_TOKEN
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = lookup("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Some(level) = lookup("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(base_url) = lookup("APP_LLM_BASE_URL") {
            self.llm.base_url = base_url;
            tracing::info!("Override llm.base_url from env: {}", self.llm.base_url);
        }

        if let Some(api_key) = lookup("APP_LLM_API_KEY") {
            self.llm.api_key = api_key;
            tracing::info!("Override llm.api_key from env");
        }

        if let Some(model) = lookup("APP_LLM_CHAT_MODEL") {
            self.llm.chat_model = model;
            tracing::info!("Override llm.chat_model from env: {}", self.llm.chat_model);
        }

        if let Some(model) = lookup("APP_LLM_STRUCTURED_MODEL") {
            self.llm.structured_model = model;
            tracing::info!(
                "Override llm.structured_model from env: {}",
                self.llm.structured_model
            );
        }

        if let Some(timeout) = lookup("APP_LLM_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = val;
                    tracing::info!("Override llm.timeout_secs from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_LLM_TIMEOUT_SECS '{}': {} (keep {})",
                    timeout,
                    e,
                    self.llm.timeout_secs
                ),
            }
        }

        if let Some(mode) = lookup("APP_MODE") {
            match mode.parse::<DeploymentMode>() {
                Ok(val) => {
                    self.record_store.mode = val;
                    tracing::info!("Override record_store.mode from env: {}", val);
                },
                Err(e) => tracing::warn!("Invalid APP_MODE: {} (keep {})", e, self.record_store.mode),
            }
        }

        if let Some(url) = lookup("APP_RECORD_STORE_DEV_URL") {
            self.record_store.development_url = url;
            tracing::info!("Override record_store.development_url from env");
        }

        if let Some(url) = lookup("APP_RECORD_STORE_PROD_URL") {
            self.record_store.production_url = url;
            tracing::info!("Override record_store.production_url from env");
        }

        if let Some(token) = lookup("APP_RECORD_STORE_TOKEN") {
            self.record_store.auth_token = Some(token);
            tracing::info!("Override record_store.auth_token from env");
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.llm.api_key.is_empty() {
            tracing::warn!("⚠️  No LLM API key configured (set APP_LLM_API_KEY)");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.llm.base_url.is_empty() {
            anyhow::bail!("llm.base_url cannot be empty");
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be > 0");
        }

        let connection = self.record_store.connection();
        if connection.base_url.is_empty() {
            anyhow::bail!("record store URL for mode '{}' cannot be empty", self.record_store.mode);
        }
        if connection.collection.is_empty() {
            anyhow::bail!("record_store.collection cannot be empty");
        }
        if connection.timeout_secs == 0 {
            anyhow::bail!("record_store.timeout_secs must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 4321 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,svg_studio=debug".to_string(), file: Some("logs/svg-studio.log".to_string()) }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self { enabled: true, web_root: "web".to_string() }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/v1".to_string(),
            api_key: String::new(),
            chat_model: "openai/gpt-oss-20b".to_string(),
            structured_model: "codellama".to_string(),
            timeout_secs: 120,
            json_schema_output: true,
        }
    }
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::Development,
            development_url: "http://127.0.0.1:8090".to_string(),
            production_url: "http://127.0.0.1:8091".to_string(),
            collection: "svg".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    let factor: u64 = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 60 * 60,
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    n.checked_mul(factor).ok_or_else(|| format!("duration too large: {}", input))
}

// Accepts either a number of seconds or a string like "30s" / "2m"
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '5m', '1h'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
