use thiserror::Error;

/// Failure of a single call to a translation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to send request to {platform}: {source}")]
    Transport {
        platform: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{platform} API error ({status}): {body}")]
    Status {
        platform: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {platform} response: {source}")]
    Decode {
        platform: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported AI platform '{0}' (set TRANSLATOR_API_URL to use a custom endpoint)")]
    UnsupportedPlatform(String),

    #[error("provider call timed out after {0}s")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}
