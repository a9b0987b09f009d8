//! Chat message translation with a bounded, expiring cache.
//!
//! A message is translated into each requested language at most once per
//! cache lifetime: cached languages are answered locally and every missing
//! language gets a single concurrent provider call.

pub mod cache;
pub mod config;
pub mod error;
pub mod lang;
pub mod metrics;
pub mod provider;
pub mod service;

pub use cache::TranslationCache;
pub use error::ProviderError;
pub use provider::{OpenAiCompatibleProvider, TranslationProvider};
pub use service::{ProviderSettings, TranslationService};
