//! Fan-out translation: one provider call per distinct missing language.
//!
//! `translate_once_per_language` checks the shared cache for every requested
//! language, spawns one task per miss, and waits for all of them before
//! returning. A failed language is logged and left out of the result; it never
//! fails the whole request.

use crate::cache::TranslationCache;
use crate::config::{Config, TokenType};
use crate::error::ProviderError;
use crate::lang::normalize_lang_set;
use crate::metrics::TranslationMetrics;
use crate::provider::TranslationProvider;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest message excerpt included in failure logs.
const LOG_EXCERPT_CHARS: usize = 80;

/// Values forwarded to the provider on every call.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub platform: String,
    pub model: String,
    pub system_prompt: String,
    pub token_type: TokenType,

    /// Upper bound on a single provider call. `None` means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ProviderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            platform: config.ai_platform.clone(),
            model: config.ai_model.clone(),
            system_prompt: config.system_prompt.clone(),
            token_type: config.token_type,
            timeout_secs: config.provider_timeout_secs,
        }
    }
}

/// Translation orchestrator backed by a provider and a shared cache.
///
/// Cloning is cheap and clones share the same cache and metrics.
#[derive(Clone)]
pub struct TranslationService {
    cache: Arc<TranslationCache>,
    provider: Arc<dyn TranslationProvider>,
    settings: Arc<ProviderSettings>,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationService {
    pub fn new(
        cache: Arc<TranslationCache>,
        provider: Arc<dyn TranslationProvider>,
        settings: ProviderSettings,
    ) -> Self {
        Self {
            cache,
            provider,
            settings: Arc::new(settings),
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    /// Build a service with a cache sized from the configuration.
    pub fn from_config(config: &Config, provider: Arc<dyn TranslationProvider>) -> Self {
        let cache = TranslationCache::new(config.cache_max_entries, config.cache_ttl_seconds);
        Self::new(Arc::new(cache), provider, ProviderSettings::from_config(config))
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Translate `message` into every language in `target_langs`.
    ///
    /// Language codes are normalized (trimmed, lowercased) and de-duplicated;
    /// blank codes are ignored. Cached translations are used as-is, and each
    /// remaining language gets exactly one provider call. The returned map is
    /// keyed by normalized code and holds only languages that succeeded.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn translate_once_per_language<I, S>(
        &self,
        message: &str,
        target_langs: I,
    ) -> HashMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let langs = normalize_lang_set(target_langs);
        let mut result = HashMap::with_capacity(langs.len());

        let mut pending = Vec::new();
        let mut tasks = Vec::new();

        for lang in langs {
            if let Some(cached) = self.cache.get(message, &lang) {
                debug!("Cache hit for '{}'", lang);
                self.metrics.record_cache_hit();
                result.insert(lang, cached);
                continue;
            }

            self.metrics.record_cache_miss();

            let service = self.clone();
            let task_message = message.to_string();
            let task_lang = lang.clone();
            tasks.push(tokio::spawn(async move {
                service.translate_one(&task_message, &task_lang).await
            }));
            pending.push(lang);
        }

        if tasks.is_empty() {
            return result;
        }

        debug!("Dispatched {} provider calls", tasks.len());

        for (lang, outcome) in pending.into_iter().zip(join_all(tasks).await) {
            match outcome {
                Ok(Ok(translated)) => {
                    result.insert(lang, translated);
                }
                Ok(Err(e)) => {
                    self.metrics.record_provider_failure();
                    warn!(
                        "Failed to translate to {}: {} (message: {:?})",
                        lang,
                        e,
                        excerpt(message)
                    );
                }
                Err(e) => {
                    self.metrics.record_provider_failure();
                    warn!(
                        "Translation task for {} aborted: {} (message: {:?})",
                        lang,
                        e,
                        excerpt(message)
                    );
                }
            }
        }

        result
    }

    /// Call the provider once for a single language and cache the outcome.
    async fn translate_one(&self, message: &str, lang: &str) -> Result<String, ProviderError> {
        self.metrics.record_provider_call();

        let settings = &self.settings;
        let user_prompt = build_user_prompt(lang, message);
        let call = self.provider.call(
            &settings.platform,
            &settings.model,
            &settings.system_prompt,
            &user_prompt,
        );

        let response = match settings.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| ProviderError::Timeout(secs))??,
            None => call.await?,
        };

        let translated = clean_response(self.provider.extract_text(&response));
        self.cache.put(message, lang, &translated);

        Ok(translated)
    }
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

/// Build the user prompt for one target language.
pub fn build_user_prompt(lang: &str, message: &str) -> String {
    format!("Target language code: {}\nText:\n{}", lang, message)
}

/// Normalize raw provider output into a translation.
///
/// Missing text becomes an empty string. Surrounding whitespace is trimmed,
/// and one pair of enclosing double quotes is removed.
pub fn clean_response(raw: Option<String>) -> String {
    let trimmed = raw.as_deref().unwrap_or("").trim();

    if trimmed.len() > 1 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

fn excerpt(message: &str) -> String {
    if message.chars().count() <= LOG_EXCERPT_CHARS {
        return message.to_string();
    }
    let mut short: String = message.chars().take(LOG_EXCERPT_CHARS).collect();
    short.push('…');
    short
}
