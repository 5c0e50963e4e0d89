//! Configuration for checksum computation.
//!
//! - [`ComputeConfig`] - Transfer sizes used by streaming sources
//! - [`Flags`] - Behavior flags stamped on every context

use crate::error::CsumError;

/// Default pipe transfer buffer size (64 KiB).
pub const DEFAULT_PIPE_BUFFER_SIZE: usize = 0x10000;

/// Largest accepted pipe transfer buffer (16 MiB).
pub const MAX_PIPE_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for streaming block sources.
///
/// # Example
///
/// ```
/// use csum::ComputeConfig;
///
/// let config = ComputeConfig::default().with_pipe_buffer_size(4096);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.pipe_buffer_size(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputeConfig {
    pipe_buffer_size: usize,
}

impl ComputeConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if the buffer size is zero or above [`MAX_PIPE_BUFFER_SIZE`].
    pub fn new(pipe_buffer_size: usize) -> Result<Self, CsumError> {
        if pipe_buffer_size == 0 {
            return Err(CsumError::InvalidConfig {
                message: "pipe buffer size must be non-zero",
            });
        }

        if pipe_buffer_size > MAX_PIPE_BUFFER_SIZE {
            return Err(CsumError::InvalidConfig {
                message: "pipe buffer size exceeds 16 MiB",
            });
        }

        Ok(Self { pipe_buffer_size })
    }

    /// Sets the pipe transfer buffer size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ComputeConfig::validate`] to check it.
    pub fn with_pipe_buffer_size(mut self, size: usize) -> Self {
        self.pipe_buffer_size = size;
        self
    }

    /// Returns the pipe transfer buffer size.
    pub fn pipe_buffer_size(&self) -> usize {
        self.pipe_buffer_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), CsumError> {
        Self::new(self.pipe_buffer_size).map(|_| ())
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            pipe_buffer_size: DEFAULT_PIPE_BUFFER_SIZE,
        }
    }
}

bitflags::bitflags! {
    /// Behavior flags passed to [`Registry::prepare`](crate::Registry::prepare).
    ///
    /// The registry stamps them on the resulting [`Context`](crate::Context);
    /// algorithms receive them in their factory.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// Reject malformed algorithm parameters instead of degrading them.
        const STRICT = 1 << 0;
        /// Caller prints NUL-terminated records. Not interpreted by algorithms.
        const ZERO_TERMINATED = 1 << 1;
    }
}
