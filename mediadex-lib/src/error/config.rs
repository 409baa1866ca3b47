//! Configuration error types

/// Errors caused by missing or invalid client configuration.
///
/// These are surfaced immediately, never cached, and never retried: the call
/// cannot succeed until the configuration is fixed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key configured for a service that requires one.
    #[error("No API key configured for {service}")]
    MissingApiKey {
        /// The service requiring the key.
        service: &'static str,
    },

    /// A base URL could not be parsed.
    #[error("Invalid base URL for {service}: {url}")]
    InvalidBaseUrl {
        /// The service the URL was configured for.
        service: &'static str,
        /// The rejected URL.
        url: String,
    },
}
