//! Block source over bounded reads from a stream.

use std::io::{self, Read};

use crate::buffer::Buffer;
use crate::config::ComputeConfig;
use crate::context::Context;
use crate::error::CsumError;
use crate::source::{BlockSource, ComputeState};

/// A block source that performs one bounded read per pull.
///
/// Every pull overwrites the same transfer buffer, so a block must be fully
/// folded before the next one is requested. A read of zero bytes ends the
/// input; a read error is returned to the computation, which stops.
///
/// Reads block the calling thread. There is no timeout: a peer that never
/// writes or closes stalls the computation.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use csum::{ComputeConfig, Pipe};
///
/// let mut ctx = csum::global().prepare("crc32", None, Default::default())?;
/// let (digest, size) = Pipe::compute(&mut ctx, Cursor::new(b"123456789"), &ComputeConfig::default())?;
/// assert_eq!(digest, "0xcbf43926");
/// assert_eq!(size, 9);
/// # Ok::<(), csum::CsumError>(())
/// ```
pub struct Pipe<R> {
    reader: R,
    buffer: Buffer,
}

impl<R: Read> Pipe<R> {
    /// Creates a pipe source reading from `reader` with the configured
    /// transfer buffer size.
    pub fn new(reader: R, config: &ComputeConfig) -> Result<Self, CsumError> {
        config.validate()?;
        Ok(Self {
            reader,
            buffer: Buffer::take(config.pipe_buffer_size()),
        })
    }

    /// Returns the transfer buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes the source and returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Runs a fresh computation over everything `reader` yields.
    ///
    /// Returns the digest and the number of bytes consumed.
    pub fn compute(
        ctx: &mut Context,
        reader: R,
        config: &ComputeConfig,
    ) -> Result<(String, u64), CsumError> {
        let mut state = ComputeState::new(Pipe::new(reader, config)?);
        let digest = ctx.compute(&mut state)?;
        Ok((digest, state.offset()))
    }

    /// Binds `reader` to `state`, keeping the transfer buffer and the offset,
    /// and continues the running computation over everything it yields.
    ///
    /// Returns the intermediate digest and the running total of bytes
    /// consumed since the last fresh computation.
    pub fn resume(
        ctx: &mut Context,
        state: &mut ComputeState<Pipe<R>>,
        reader: R,
    ) -> Result<(String, u64), CsumError> {
        state.source.reader = reader;
        let digest = ctx.resume(state)?;
        Ok((digest, state.offset()))
    }
}

impl<R: Read> BlockSource for Pipe<R> {
    fn next_block(&mut self, consumed: u64) -> Result<&[u8], CsumError> {
        let read = loop {
            match self.reader.read(self.buffer.as_mut_slice()) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(consumed, error = %e, "pipe read failed");
                    return Err(e.into());
                }
            }
        };

        tracing::trace!(consumed, len = read, "pipe block");
        Ok(self.buffer.filled(read))
    }
}

impl<R> std::fmt::Debug for Pipe<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe")
            .field("buffer_size", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that fails after yielding its data.
    struct Failing {
        data: Cursor<Vec<u8>>,
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer vanished")),
                n => Ok(n),
            }
        }
    }

    /// Reader that is interrupted before every successful read.
    struct Interrupting {
        data: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for Interrupting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            self.data.read(buf)
        }
    }

    fn small() -> ComputeConfig {
        ComputeConfig::default().with_pipe_buffer_size(4)
    }

    #[test]
    fn test_bounded_reads() {
        let mut pipe = Pipe::new(Cursor::new(b"abcdefghij".to_vec()), &small()).unwrap();
        assert_eq!(pipe.buffer_size(), 4);
        assert_eq!(pipe.next_block(0).unwrap(), b"abcd");
        assert_eq!(pipe.next_block(4).unwrap(), b"efgh");
        assert_eq!(pipe.next_block(8).unwrap(), b"ij");
        assert!(pipe.next_block(10).unwrap().is_empty());
        assert!(pipe.next_block(10).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let config = ComputeConfig::default().with_pipe_buffer_size(0);
        assert!(Pipe::new(Cursor::new(Vec::new()), &config).is_err());
    }

    #[test]
    fn test_read_error_surfaces() {
        let mut pipe = Pipe::new(
            Failing {
                data: Cursor::new(b"xyz".to_vec()),
            },
            &small(),
        )
        .unwrap();
        assert_eq!(pipe.next_block(0).unwrap(), b"xyz");
        let err = pipe.next_block(3).unwrap_err();
        assert!(matches!(err, CsumError::SourceRead(_)));
    }

    #[test]
    fn test_interrupted_is_retried() {
        let mut pipe = Pipe::new(
            Interrupting {
                data: Cursor::new(b"abc".to_vec()),
                interrupt: false,
            },
            &small(),
        )
        .unwrap();
        assert_eq!(pipe.next_block(0).unwrap(), b"abc");
        assert!(pipe.next_block(3).unwrap().is_empty());
    }

    #[test]
    fn test_compute_matches_linear() {
        let registry = crate::Registry::with_builtins();
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();

        let mut ctx = registry.prepare("crc64", None, Default::default()).unwrap();
        let (piped, size) = Pipe::compute(&mut ctx, Cursor::new(data.clone()), &small()).unwrap();
        assert_eq!(size, 1000);

        let mut state = ComputeState::<crate::Linear>::default();
        let linear = crate::Linear::begin(&mut ctx, &mut state, data).unwrap();
        assert_eq!(piped, linear);
    }

    #[test]
    fn test_resume_keeps_running_offset() {
        let registry = crate::Registry::with_builtins();
        let mut ctx = registry.prepare("crc32", None, Default::default()).unwrap();
        let pipe = Pipe::new(Cursor::new(b"12345".to_vec()), &small()).unwrap();
        let mut state = ComputeState::new(pipe);
        ctx.compute(&mut state).unwrap();
        assert_eq!(state.offset(), 5);

        let (digest, total) =
            Pipe::resume(&mut ctx, &mut state, Cursor::new(b"6789".to_vec())).unwrap();
        assert_eq!(digest, "0xcbf43926");
        assert_eq!(total, 9);
        assert_eq!(state.offset(), 9);
        assert_eq!(state.source().buffer_size(), 4);
    }

    #[test]
    fn test_compute_error_propagates() {
        let registry = crate::Registry::with_builtins();
        let mut ctx = registry.prepare("crc32", None, Default::default()).unwrap();
        let reader = Failing {
            data: Cursor::new(vec![1, 2, 3, 4, 5]),
        };
        let result = Pipe::compute(&mut ctx, reader, &small());
        assert!(matches!(result, Err(CsumError::SourceRead(_))));
    }
}
