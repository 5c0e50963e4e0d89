//! Error types for csum.

use thiserror::Error;

/// Errors that can occur while registering algorithms or computing checksums.
#[derive(Debug, Error)]
pub enum CsumError {
    /// A descriptor was rejected at registration time.
    #[error("invalid algorithm descriptor: {reason}")]
    InvalidDescriptor {
        /// What was missing or malformed.
        reason: &'static str,
    },

    /// An algorithm with the same name is already registered.
    #[error("algorithm already registered: {name}")]
    AlreadyRegistered {
        /// Name of the conflicting algorithm.
        name: String,
    },

    /// The descriptor instance is not present in the registry.
    #[error("algorithm not registered: {name}")]
    NotFound {
        /// Name carried by the descriptor that was not found.
        name: String,
    },

    /// No algorithm is registered under the requested name.
    #[error("unknown algorithm: {name}")]
    UnknownAlgorithm {
        /// The requested name.
        name: String,
    },

    /// The algorithm factory could not allocate its private state.
    #[error("failed to allocate computation context")]
    AllocationFailure,

    /// An algorithm parameter could not be parsed.
    ///
    /// Only reported when [`Flags::STRICT`](crate::Flags::STRICT) is set;
    /// otherwise malformed parameters degrade to a default value.
    #[error("malformed algorithm parameter: {input:?}")]
    MalformedParameter {
        /// The offending parameter string.
        input: String,
    },

    /// The bound block source failed to produce the next block.
    #[error("source read failure: {0}")]
    SourceRead(#[from] std::io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}
