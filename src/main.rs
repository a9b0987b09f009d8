use anyhow::{bail, Result};
use chat_translator::config::{self, TokenType};
use chat_translator::lang::{normalize_lang_set, LanguageRegistry};
use chat_translator::{OpenAiCompatibleProvider, TranslationService};
use std::sync::Arc;
use tracing::{info, warn};

const USAGE: &str = "Usage: chat-translator <lang[,lang...]> <message...>";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chat_translator=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(langs_arg) = args.next() else {
        bail!(USAGE);
    };
    let message = args.collect::<Vec<_>>().join(" ");
    if message.trim().is_empty() {
        bail!(USAGE);
    }

    let langs = normalize_lang_set(langs_arg.split(','));
    if langs.is_empty() {
        bail!("No target languages given. {}", USAGE);
    }

    let registry = LanguageRegistry::get();
    for lang in langs.iter().filter(|lang| !registry.is_known(lang)) {
        warn!("'{}' is not an ISO 639-1 code, translating anyway", lang);
    }

    // Load configuration from environment
    let config = config::Config::from_env()?;
    if config.token_type == TokenType::Player {
        warn!("Player-owned tokens are not available here, using the server token");
    }

    let provider = OpenAiCompatibleProvider::from_config(reqwest::Client::new(), &config);
    let service = TranslationService::from_config(&config, Arc::new(provider));

    info!(
        "Translating into {} language(s) via {} ({}, {} token)",
        langs.len(),
        config.ai_platform,
        config.ai_model,
        config.token_type.as_str()
    );

    let translations = service
        .translate_once_per_language(&message, langs.iter())
        .await;

    // Languages that failed fall back to the untranslated original
    for lang in &langs {
        match translations.get(lang) {
            Some(text) => println!("[T:{}] {}", lang, text),
            None => println!("[{}] {}", lang, message),
        }
    }

    let report = service.metrics().report();
    info!(
        "Done: {} cache hit(s), {} provider call(s), {} failure(s)",
        report.cache_hits, report.provider_calls, report.provider_failures
    );

    Ok(())
}
