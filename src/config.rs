use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECONDS};
use anyhow::{bail, Context, Result};

pub const DEFAULT_PLATFORM: &str = "deepseek";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise, safe translator. Detect the user's source language and translate the message to the requested target language code (ISO 639-1). Output only the translated text.";

/// Whose API token pays for provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    /// The server-wide token from configuration.
    #[default]
    Server,
    /// A token owned by the sending player.
    Player,
}

impl TokenType {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "server" => Ok(TokenType::Server),
            "player" => Ok(TokenType::Player),
            other => bail!("Unknown token type '{}', expected 'server' or 'player'", other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Server => "server",
            TokenType::Player => "player",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Cache
    pub cache_max_entries: usize,
    pub cache_ttl_seconds: u64,

    // AI provider
    pub ai_platform: String,
    pub ai_model: String,
    pub token_type: TokenType,
    pub system_prompt: String,
    pub api_key: String,
    pub api_url: Option<String>,

    // Per-call timeout for provider requests; `None` waits indefinitely
    pub provider_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Cache
            cache_max_entries: std::env::var("TRANSLATOR_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            cache_ttl_seconds: std::env::var("TRANSLATOR_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),

            // AI provider
            ai_platform: std::env::var("TRANSLATOR_AI_PLATFORM")
                .unwrap_or_else(|_| DEFAULT_PLATFORM.to_string()),
            ai_model: std::env::var("TRANSLATOR_AI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            token_type: match std::env::var("TRANSLATOR_AI_TOKEN_TYPE") {
                Ok(v) => TokenType::parse(&v).context("Invalid TRANSLATOR_AI_TOKEN_TYPE")?,
                Err(_) => TokenType::default(),
            },
            system_prompt: std::env::var("TRANSLATOR_AI_SYSTEM_PROMPT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            api_key: std::env::var("TRANSLATOR_API_KEY").context("TRANSLATOR_API_KEY not set")?,
            api_url: std::env::var("TRANSLATOR_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            provider_timeout_secs: std::env::var("TRANSLATOR_PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0),
        })
    }
}
