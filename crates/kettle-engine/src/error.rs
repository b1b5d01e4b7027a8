//! Error types for the kettle binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and while a driver runs.

/// Top-level error for the kettle binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: kettle_core::config::ConfigError,
    },

    /// Reading from or writing to the terminal failed.
    #[error("console I/O error: {source}")]
    Console {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A kettle could not be created from the accepted water amount.
    #[error("kettle error: {source}")]
    Kettle {
        /// The underlying validation error.
        #[from]
        source: kettle_core::WaterAmountError,
    },

    /// The web surface could not be set up.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying web layer error.
        #[from]
        source: kettle_observer::ObserverError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: kettle_observer::ServerError,
    },
}
