//! Internal transfer buffer management.
//!
//! The pipe source reads into one fixed-size buffer per computation. Buffers
//! come from a thread-local pool so that checksumming many streams in a row
//! does not reallocate. It is an implementation detail and not part of the
//! public API.

mod pool;

pub(crate) use pool::Buffer;
