//! Block source over one contiguous in-memory buffer.

use bytes::Bytes;

use crate::context::Context;
use crate::error::CsumError;
use crate::source::{BlockSource, ComputeState};

/// A block source backed by a single contiguous buffer.
///
/// The buffer has no natural block boundary, so the whole unread remainder is
/// handed out in one block. Every later pull returns an empty block.
///
/// Cloning [`Bytes`] is cheap, so a memory-mapped or otherwise shared region
/// can be windowed with [`Bytes::slice`] before binding.
///
/// # Example
///
/// ```
/// use csum::{ComputeState, Linear};
///
/// let mut ctx = csum::global().prepare("crc32", None, Default::default())?;
/// let mut state = ComputeState::<Linear>::default();
///
/// let digest = Linear::begin(&mut ctx, &mut state, &b"123456789"[..])?;
/// assert_eq!(digest, "0xcbf43926");
/// assert_eq!(state.offset(), 9);
/// # Ok::<(), csum::CsumError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Linear {
    data: Bytes,
    cursor: usize,
}

impl Linear {
    /// Creates a linear source over `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
        }
    }

    /// Returns the length of the bound buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the bound buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Binds `state` to `data` and runs a fresh computation over it.
    ///
    /// The offset and the accumulator are both reset before folding.
    pub fn begin(
        ctx: &mut Context,
        state: &mut ComputeState<Linear>,
        data: impl Into<Bytes>,
    ) -> Result<String, CsumError> {
        state.rebind(Linear::new(data));
        ctx.compute(state)
    }

    /// Re-runs the computation against the already bound buffer without
    /// resetting anything.
    ///
    /// Once the buffer is drained this folds nothing and returns the current
    /// digest again.
    pub fn resume(
        ctx: &mut Context,
        state: &mut ComputeState<Linear>,
    ) -> Result<String, CsumError> {
        ctx.resume(state)
    }

    /// Binds the next buffer of a longer input and continues the running
    /// checksum over it.
    ///
    /// Feeding the pieces of a partitioned input one after another yields the
    /// same digest as [`Linear::begin`] over the whole input.
    pub fn feed(
        ctx: &mut Context,
        state: &mut ComputeState<Linear>,
        data: impl Into<Bytes>,
    ) -> Result<String, CsumError> {
        state.rebind(Linear::new(data));
        ctx.resume(state)
    }
}

impl BlockSource for Linear {
    fn next_block(&mut self, consumed: u64) -> Result<&[u8], CsumError> {
        if self.cursor < self.data.len() {
            let block = &self.data[self.cursor..];
            self.cursor = self.data.len();
            tracing::trace!(consumed, len = block.len(), "linear block");
            return Ok(block);
        }

        Ok(&[])
    }
}
