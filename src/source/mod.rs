//! Pull-based block sources.
//!
//! A computation never reads input itself. It asks the bound [`BlockSource`]
//! for the next block, folds it, and asks again until the source answers with
//! an empty block. This keeps the algorithm code identical whether bytes come
//! from one contiguous buffer or from a stream read in bounded pieces.
//!
//! - [`BlockSource`] - The pull contract
//! - [`ComputeState`] - Progress of one computation plus its bound source
//! - [`Linear`] - One contiguous in-memory buffer
//! - [`Pipe`] - Bounded reads from any [`std::io::Read`]

mod linear;
mod pipe;

pub use linear::Linear;
pub use pipe::Pipe;

use crate::error::CsumError;

/// A supplier of successive input blocks.
///
/// Each call returns exactly one block. An empty block is the only end of
/// input signal, and a source must keep returning empty blocks once exhausted.
/// A failure is returned as `Err`; the computation stops and propagates it.
///
/// The returned slice is only valid until the next call. Sources that reuse a
/// transfer buffer overwrite it on every pull.
pub trait BlockSource {
    /// Pulls the next block.
    ///
    /// `consumed` is the number of bytes the running computation has folded
    /// so far, across resumptions.
    fn next_block(&mut self, consumed: u64) -> Result<&[u8], CsumError>;
}

impl<S: BlockSource + ?Sized> BlockSource for &mut S {
    fn next_block(&mut self, consumed: u64) -> Result<&[u8], CsumError> {
        (**self).next_block(consumed)
    }
}

impl<S: BlockSource + ?Sized> BlockSource for Box<S> {
    fn next_block(&mut self, consumed: u64) -> Result<&[u8], CsumError> {
        (**self).next_block(consumed)
    }
}

/// Progress of a computation and the block source bound to it.
///
/// The offset counts every byte folded since the last fresh
/// [`Context::compute`](crate::Context::compute). It only grows; resuming
/// with [`Context::resume`](crate::Context::resume) keeps it.
#[derive(Debug, Default)]
pub struct ComputeState<S: ?Sized> {
    pub(crate) offset: u64,
    pub(crate) source: S,
}

impl<S> ComputeState<S> {
    /// Creates a state bound to `source` with a zero offset.
    pub fn new(source: S) -> Self {
        Self { offset: 0, source }
    }

    /// Binds a different source, keeping the offset, and returns the old one.
    pub fn rebind(&mut self, source: S) -> S {
        std::mem::replace(&mut self.source, source)
    }

    /// Consumes the state and returns its source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: ?Sized> ComputeState<S> {
    /// Returns the total number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the bound source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the bound source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Creates a state bound to a source of another kind that carries this
    /// state's offset, so a running computation can continue over it.
    pub fn carry<T>(&self, source: T) -> ComputeState<T> {
        ComputeState {
            offset: self.offset,
            source,
        }
    }
}
