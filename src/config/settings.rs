//! Application settings structs, defaults, TOML persistence and environment
//! overrides.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Once loaded, an
//! [`AppConfig`] is never mutated; the server shares it behind an `Arc`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// NonPostPolicy
// ---------------------------------------------------------------------------

/// Status returned for non-POST requests on the webhook path.
///
/// Never a 5xx: the messaging platform retries deliveries that fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonPostPolicy {
    /// `200 OK` (platform console "verify" requests use GET).
    #[default]
    Ok,
    /// `405 Method Not Allowed`.
    MethodNotAllowed,
}

// ---------------------------------------------------------------------------
// OutputFormat / SchemaDialect
// ---------------------------------------------------------------------------

/// Shape the model is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Strict JSON object; a `response_format` hint is sent to the API.
    #[default]
    Json,
    /// Degraded mode: one or two plain lines, literal line prefixed.
    PlainLines,
}

/// Field naming used in the JSON answer.
///
/// | Variant             | KR→TH                          | TH→KR          |
/// |---------------------|--------------------------------|----------------|
/// | `ModeFields`        | `{mode, th, ko_backliteral}`   | `{mode, ko}`   |
/// | `PrimaryPreview`    | `{primary, preview}`           | `{primary}`    |
/// | `TranslatedLiteral` | `{translated, literal}`        | `{translated}` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaDialect {
    #[default]
    ModeFields,
    PrimaryPreview,
    TranslatedLiteral,
}

impl SchemaDialect {
    /// Every recognised dialect, in declaration order.
    pub const ALL: [SchemaDialect; 3] = [
        SchemaDialect::ModeFields,
        SchemaDialect::PrimaryPreview,
        SchemaDialect::TranslatedLiteral,
    ];
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the webhook server binds to.
    pub bind_addr: String,
    /// Path the messaging platform delivers webhooks to.  A missing leading
    /// `/` is added when the router is built.
    pub webhook_path: String,
    /// Response for GET/PUT/... on the webhook path.
    pub non_post_status: NonPostPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            webhook_path: "/webhook".into(),
            non_post_status: NonPostPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection and retry settings for the completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (no trailing `/v1`).
    pub base_url: String,
    /// Bearer key.  Required; checked by [`AppConfig::validate`].
    pub api_key: Option<String>,
    /// Sampling temperature.  Low values keep translations literal.
    pub temperature: f32,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts on the same model after an HTTP 429.
    pub max_rate_limit_retries: u32,
    /// First backoff delay after a 429; doubles on each retry.
    pub initial_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            temperature: 0.3,
            timeout_secs: 15,
            max_rate_limit_retries: 2,
            initial_backoff_ms: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// StyleConfig
// ---------------------------------------------------------------------------

/// Translation policy shared read-only by every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Model tried first.
    pub target_model: String,
    /// Cheaper / more available model used after the target fails.
    /// Empty disables the fallback hop.
    pub fallback_model: String,
    /// Emit the "(직역) ..." second segment for KR→TH replies.
    pub include_back_translation: bool,
    /// Append "ครับ" to Thai output lacking a polite ending.
    pub enforce_honorific: bool,
    /// Per-segment cap, in characters.
    pub max_segment_length: usize,
    /// Answer shape requested from the model.
    pub output_format: OutputFormat,
    /// JSON field naming requested from the model (tried first when parsing).
    pub schema_dialect: SchemaDialect,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            target_model: "gpt-4o-mini".into(),
            fallback_model: "gpt-3.5-turbo".into(),
            include_back_translation: true,
            enforce_honorific: true,
            max_segment_length: 5000,
            output_format: OutputFormat::default(),
            schema_dialect: SchemaDialect::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// MessagingConfig
// ---------------------------------------------------------------------------

/// Reply API settings for the messaging platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Base URL of the reply API.
    pub api_base_url: String,
    /// Channel access token.  Required; checked by [`AppConfig::validate`].
    pub access_token: Option<String>,
    /// Timeout for one reply call, in seconds.
    pub timeout_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.line.me".into(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use korthai::config::AppConfig;
///
/// let config = AppConfig::load().unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub style: StyleConfig,
    pub messaging: MessagingConfig,
    /// Raise the default log filter from `info` to `debug`.
    pub debug_logging: bool,
}

impl AppConfig {
    /// Load `settings.toml` (defaults when missing) and apply environment
    /// overrides from the process environment.
    ///
    /// Rejected overrides are logged, so call this after the logger is
    /// installed.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let paths = AppPaths::resolve(env);
        let mut config = Self::load_from(&paths.settings_file)?;
        let rejected = config.apply_env(env);
        if !rejected.is_empty() {
            log::warn!("config: kept file/default values for {}", rejected.join(", "));
        }
        Ok(config)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` is injected so tests never touch the real environment.
    /// Unparseable boolean / numeric values are logged and ignored; their
    /// keys are returned.  Install the logger before calling this.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.llm.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.style.target_model = v;
        }
        if let Some(v) = get("OPENAI_FALLBACK_MODEL") {
            self.style.fallback_model = v;
        }
        if let Some(v) = get("LINE_CHANNEL_ACCESS_TOKEN") {
            self.messaging.access_token = Some(v);
        }
        if let Some(v) = get("INCLUDE_BACK_TRANSLATION") {
            set_flag(&mut self.style.include_back_translation, "INCLUDE_BACK_TRANSLATION", &v, &mut rejected);
        }
        if let Some(v) = get("ENFORCE_POLITE_PARTICLE") {
            set_flag(&mut self.style.enforce_honorific, "ENFORCE_POLITE_PARTICLE", &v, &mut rejected);
        }
        if let Some(v) = get("DEBUG_LOG") {
            set_flag(&mut self.debug_logging, "DEBUG_LOG", &v, &mut rejected);
        }
        if let Some(v) = get("BIND_ADDR") {
            self.server.bind_addr = v;
        } else if let Some(v) = get("PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.server.bind_addr = format!("0.0.0.0:{port}"),
                Err(_) => {
                    log::warn!("config: ignoring invalid PORT={v:?}");
                    rejected.push("PORT");
                }
            }
        }
        rejected
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            bail!("completion API key is not set (OPENAI_API_KEY)");
        }
        if self
            .messaging
            .access_token
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
        {
            bail!("reply access token is not set (LINE_CHANNEL_ACCESS_TOKEN)");
        }
        if self.style.target_model.trim().is_empty() {
            bail!("target model must not be empty");
        }
        if self.style.max_segment_length == 0 {
            bail!("max_segment_length must be positive");
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn set_flag(target: &mut bool, key: &'static str, value: &str, rejected: &mut Vec<&'static str>) {
    match parse_flag(value) {
        Some(flag) => *target = flag,
        None => {
            log::warn!("config: ignoring non-boolean {key}={value:?}, keeping {target}");
            rejected.push(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
