//! Error types for the simulation engine.
//!
//! Every fallible entry point returns [`SimError`] through the crate-wide
//! [`Result`] alias. All of these are raised before a run starts; once the
//! generation loop is entered nothing can fail.

/// Errors raised while loading or validating a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// More tagged (special) founders were requested than there are agents.
    #[error("more tagged agents ({tagged}) than agents in the population ({population})")]
    TooManyTagged {
        /// Requested tagged founders.
        tagged: usize,
        /// Population size.
        population: usize,
    },

    /// The scenario selector is not one of 0, 1 or 2.
    #[error("unknown scenario selector: {0}")]
    UnknownScenario(i32),

    /// A numeric parameter is out of its admissible range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Configuration field name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Failed to read a configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON configuration.
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;
