//! Algorithm descriptors and the built-in algorithm set.
//!
//! An [`Algorithm`] is the static descriptor the registry stores. Its
//! `prepare` factory hands out an [`Accumulator`], the algorithm-private
//! running state that a [`Context`](crate::Context) folds blocks into.
//!
//! - [`CrcAlgorithm`] - The CRC family, math supplied by the `crc` crate
//! - [`Blake3Algorithm`] - BLAKE3 (requires `hash-blake3` feature)

mod crc;

#[cfg(feature = "hash-blake3")]
mod blake3;

pub use self::crc::{CrcAlgorithm, FoldFn};

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3Algorithm;

use std::fmt;
use std::sync::Arc;

use crate::config::Flags;
use crate::error::CsumError;

/// A registered checksum algorithm.
///
/// Descriptors live for the whole process once registered and are never
/// mutated. Identity in the registry is the `Arc` allocation, uniqueness is
/// by [`Algorithm::name`].
pub trait Algorithm: Send + Sync + fmt::Debug {
    /// Unique name used for lookup.
    fn name(&self) -> &str;

    /// Optional one-line description for help listings.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Allocates the private state for one computation.
    ///
    /// `args` is the optional algorithm-specific parameter string.
    fn prepare(&self, args: Option<&str>, flags: Flags)
    -> Result<Box<dyn Accumulator>, CsumError>;

    /// Releases state previously returned by [`Algorithm::prepare`].
    fn destroy(&self, accumulator: Box<dyn Accumulator>) {
        drop(accumulator);
    }
}

/// Algorithm-private running state.
///
/// This is the one point of algorithm polymorphism in a computation: the
/// drive loop pulls blocks and hands each one to [`Accumulator::update`].
pub trait Accumulator: Send + fmt::Debug {
    /// Restores the initial value chosen at prepare time.
    fn reset(&mut self);

    /// Folds one block into the running value.
    fn update(&mut self, block: &[u8]);

    /// Formats the current value as `0x` followed by fixed-width lowercase hex.
    fn digest(&self) -> String;
}

/// Returns fresh descriptors for every built-in algorithm, in help order.
pub fn builtins() -> Vec<Arc<dyn Algorithm>> {
    #[cfg_attr(not(feature = "hash-blake3"), allow(unused_mut))]
    let mut algorithms: Vec<Arc<dyn Algorithm>> = CrcAlgorithm::catalog()
        .into_iter()
        .map(|algo| Arc::new(algo) as Arc<dyn Algorithm>)
        .collect();

    #[cfg(feature = "hash-blake3")]
    algorithms.push(Arc::new(Blake3Algorithm::new()));

    algorithms
}
