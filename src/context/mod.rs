//! Computation context.
//!
//! A [`Context`] binds one algorithm descriptor, the flags it was prepared
//! with, and that algorithm's private accumulator. It is created by
//! [`Registry::prepare`](crate::Registry::prepare) and driven against a
//! [`ComputeState`] whose source supplies the input.
//!
//! A context runs at most one computation at a time; the `&mut self`
//! receivers enforce it. Destroying it consumes it, so a destroyed context
//! cannot be used again.

use std::fmt;
use std::sync::Arc;

use crate::algo::{Accumulator, Algorithm};
use crate::config::Flags;
use crate::error::CsumError;
use crate::source::{BlockSource, ComputeState};

/// Per-computation state of one algorithm.
pub struct Context {
    algorithm: Arc<dyn Algorithm>,
    flags: Flags,
    accumulator: Box<dyn Accumulator>,
}

impl Context {
    pub(crate) fn new(
        algorithm: Arc<dyn Algorithm>,
        flags: Flags,
        accumulator: Box<dyn Accumulator>,
    ) -> Self {
        Self {
            algorithm,
            flags,
            accumulator,
        }
    }

    /// Returns the descriptor this context was prepared from.
    pub fn algorithm(&self) -> &Arc<dyn Algorithm> {
        &self.algorithm
    }

    /// Returns the flags this context was prepared with.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Runs a fresh computation.
    ///
    /// Resets the state offset and the accumulator, then drains the bound
    /// source and returns the formatted digest. On return the state offset
    /// holds the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Whatever the source reports. The computation stops at the failing
    /// pull; the accumulator then holds a partial value that must not be
    /// used as a checksum.
    pub fn compute<S>(&mut self, state: &mut ComputeState<S>) -> Result<String, CsumError>
    where
        S: BlockSource + ?Sized,
    {
        state.offset = 0;
        self.accumulator.reset();
        self.drive(state)
    }

    /// Continues the running computation.
    ///
    /// Same as [`Context::compute`] but keeps both the accumulator and the
    /// state offset, so successive calls over successive sources digest their
    /// concatenation.
    pub fn resume<S>(&mut self, state: &mut ComputeState<S>) -> Result<String, CsumError>
    where
        S: BlockSource + ?Sized,
    {
        self.drive(state)
    }

    /// Returns the digest of everything folded so far.
    pub fn digest(&self) -> String {
        self.accumulator.digest()
    }

    /// Releases the context through its descriptor.
    ///
    /// Dropping a context has the same effect; this only makes the release
    /// point explicit.
    pub fn destroy(self) {
        drop(self);
    }

    fn drive<S>(&mut self, state: &mut ComputeState<S>) -> Result<String, CsumError>
    where
        S: BlockSource + ?Sized,
    {
        let start = state.offset;
        let mut consumed = state.offset;

        loop {
            let block = match state.source.next_block(consumed) {
                Ok(block) => block,
                Err(e) => {
                    state.offset = consumed;
                    tracing::debug!(
                        algorithm = self.algorithm.name(),
                        consumed,
                        error = %e,
                        "computation aborted"
                    );
                    return Err(e);
                }
            };

            if block.is_empty() {
                break;
            }

            self.accumulator.update(block);
            consumed += block.len() as u64;
        }

        state.offset = consumed;
        let digest = self.accumulator.digest();
        tracing::debug!(
            algorithm = self.algorithm.name(),
            bytes = consumed - start,
            total = consumed,
            %digest,
            "computation finished"
        );

        Ok(digest)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let accumulator = std::mem::replace(&mut self.accumulator, Box::new(Released));
        tracing::trace!(algorithm = self.algorithm.name(), "destroying context");
        self.algorithm.destroy(accumulator);
    }
}

/// Stands in for an accumulator already handed back to its descriptor.
#[derive(Debug)]
struct Released;

impl Accumulator for Released {
    fn reset(&mut self) {}

    fn update(&mut self, _block: &[u8]) {}

    fn digest(&self) -> String {
        String::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("algorithm", &self.algorithm.name())
            .field("flags", &self.flags)
            .field("accumulator", &self.accumulator)
            .finish()
    }
}
