//! Error types for the server binary.
//!
//! [`EnvError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: snake_core::ConfigError,
    },

    /// The default board could not be built.
    #[error("pool error: {source}")]
    Pool {
        /// The underlying pool error.
        #[from]
        source: snake_core::PoolError,
    },

    /// The REST adapter failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: snake_server::ServerError,
    },
}
