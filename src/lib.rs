//! csum
//!
//! Streaming checksum engine behind the `csum` command-line tool.
//!
//! Algorithms are looked up by name in a [`Registry`]. Preparing one yields a
//! [`Context`] that owns the algorithm's running accumulator. Input is never
//! pushed into a context: the context pulls blocks from a [`BlockSource`]
//! until the source reports the end. The same CRC state machine therefore
//! runs unchanged over:
//!
//! - one contiguous buffer ([`Linear`])
//! - bounded reads from a pipe or any reader ([`Pipe`])
//! - a sequence of buffers fed by the caller ([`Linear::feed`],
//!   [`Context::resume`])
//!
//! The crate intentionally:
//! - does NOT implement CRC polynomial math (the `crc` crate does)
//! - does NOT open files or parse arguments (the binary does)
//! - does NOT run computations concurrently
//!
//! # Linear
//!
//! ```
//! use csum::{ComputeState, Flags, Linear};
//!
//! let mut ctx = csum::global().prepare("crc32", None, Flags::empty())?;
//! let mut state = ComputeState::<Linear>::default();
//!
//! assert_eq!(Linear::begin(&mut ctx, &mut state, &b"1234"[..])?, "0x9be3e0a3");
//! assert_eq!(Linear::feed(&mut ctx, &mut state, &b"56789"[..])?, "0xcbf43926");
//! ctx.destroy();
//! # Ok::<(), csum::CsumError>(())
//! ```
//!
//! # Pipe
//!
//! ```no_run
//! use csum::{ComputeConfig, Flags, Pipe};
//!
//! let mut ctx = csum::global().prepare("crc64", None, Flags::empty())?;
//! let (digest, size) = Pipe::compute(&mut ctx, std::io::stdin().lock(), &ComputeConfig::default())?;
//! println!("{digest} {size}");
//! # Ok::<(), csum::CsumError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod algo;
mod config;
mod context;
mod error;
mod registry;
mod source;

mod buffer; // internal (thread-local reuse)
mod util; // internal parameter parsing

//
// Public surface
//

#[cfg(feature = "hash-blake3")]
pub use algo::Blake3Algorithm;
pub use algo::{Accumulator, Algorithm, CrcAlgorithm, FoldFn, builtins};
pub use config::{ComputeConfig, DEFAULT_PIPE_BUFFER_SIZE, Flags, MAX_PIPE_BUFFER_SIZE};
pub use context::Context;
pub use error::CsumError;
pub use registry::{Registry, RegistryBuilder, global};
pub use source::{BlockSource, ComputeState, Linear, Pipe};

/// Computes the digest of `data` with the named algorithm from the global
/// registry, without a parameter.
///
/// # Example
///
/// ```
/// assert_eq!(csum::checksum("crc32", &b"123456789"[..])?, "0xcbf43926");
/// assert!(csum::checksum("does-not-exist", &b""[..]).is_err());
/// # Ok::<(), csum::CsumError>(())
/// ```
pub fn checksum(name: &str, data: impl Into<bytes::Bytes>) -> Result<String, CsumError> {
    let mut ctx = global().prepare(name, None, Flags::empty())?;
    let mut state = ComputeState::new(Linear::new(data));
    let digest = ctx.compute(&mut state);
    ctx.destroy();
    digest
}
