//! Expiring LRU cache mapping (message, target language) to a translated string.
//!
//! Entries are bounded by count (least-recently-used eviction on insert) and by
//! age (expired entries are purged lazily when read). Both `get` and `put`
//! count as a use for recency purposes.
//!
//! Recency is tracked by an unbounded `lru::LruCache` (hash map plus linked
//! list); the capacity is enforced here so eviction can be logged. The whole
//! structure sits behind a single `Mutex`.

use crate::lang::normalize_lang_code;
use lru::LruCache;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Smallest capacity a cache may be configured with.
pub const MIN_MAX_ENTRIES: usize = 100;

/// Smallest TTL (in seconds) a cache may be configured with.
pub const MIN_TTL_SECONDS: u64 = 10;

/// Default capacity when none is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default TTL (in seconds) when none is configured.
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Source of wall-clock time in whole seconds.
pub trait Clock: Send + Sync {
    /// Current time as seconds since the Unix epoch.
    fn now_secs(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    message: String,
    lang: String,
}

impl CacheKey {
    fn new(message: &str, lang: &str) -> Self {
        Self {
            message: message.to_string(),
            lang: normalize_lang_code(lang),
        }
    }
}

struct CacheEntry {
    translated_text: String,
    written_at: i64,
}

/// Thread-safe translation cache bounded by entry count and entry age.
pub struct TranslationCache {
    max_entries: usize,
    ttl_seconds: u64,
    clock: Arc<dyn Clock>,
    inner: Mutex<LruCache<CacheKey, CacheEntry>>,
}

impl TranslationCache {
    /// Create a cache using the system clock.
    ///
    /// `max_entries` is raised to at least [`MIN_MAX_ENTRIES`] and
    /// `ttl_seconds` to at least [`MIN_TTL_SECONDS`].
    pub fn new(max_entries: usize, ttl_seconds: u64) -> Self {
        Self::with_clock(max_entries, ttl_seconds, Arc::new(SystemClock))
    }

    /// Create a cache that measures entry age with the given clock.
    pub fn with_clock(max_entries: usize, ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self::unclamped(
            max_entries.max(MIN_MAX_ENTRIES),
            ttl_seconds.max(MIN_TTL_SECONDS),
            clock,
        )
    }

    fn unclamped(max_entries: usize, ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_entries,
            ttl_seconds,
            clock,
            inner: Mutex::new(LruCache::unbounded()),
        }
    }

    // No user code runs while the map is mid-update, so a poisoned lock
    // still guards a consistent cache.
    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Age is compared unsigned; an entry stamped in the future is fresh.
    fn is_expired(&self, written_at: i64, now: i64) -> bool {
        u64::try_from(now.saturating_sub(written_at)).is_ok_and(|age| age > self.ttl_seconds)
    }

    /// Look up a cached translation.
    ///
    /// Returns `None` if absent or older than the TTL; expired entries are
    /// removed on the spot. A hit makes the entry most recently used.
    pub fn get(&self, message: &str, lang: &str) -> Option<String> {
        let key = CacheKey::new(message, lang);
        let now = self.clock.now_secs();
        let mut cache = self.lock();

        let written_at = cache.peek(&key)?.written_at;
        if self.is_expired(written_at, now) {
            debug!("Cache entry for '{}' expired after {}s", key.lang, now - written_at);
            cache.pop(&key);
            return None;
        }

        cache.get(&key).map(|entry| entry.translated_text.clone())
    }

    /// Insert or overwrite a translation with a fresh timestamp.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first.
    pub fn put(&self, message: &str, lang: &str, translated: &str) {
        let key = CacheKey::new(message, lang);
        let entry = CacheEntry {
            translated_text: translated.to_string(),
            written_at: self.clock.now_secs(),
        };
        let mut cache = self.lock();

        if !cache.contains(&key) && cache.len() >= self.max_entries {
            if let Some((evicted, _)) = cache.pop_lru() {
                debug!("Cache full, evicted least recently used entry for '{}'", evicted.lang);
            }
        }

        cache.put(key, entry);
    }

    /// Number of entries currently held, including ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity after the floor was applied.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entry lifetime in seconds after the floor was applied.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECONDS)
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("max_entries", &self.max_entries)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("len", &self.len())
            .finish()
    }
}
