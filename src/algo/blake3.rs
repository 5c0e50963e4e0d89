//! BLAKE3 as a registered algorithm.

use crate::algo::{Accumulator, Algorithm};
use crate::config::Flags;
use crate::error::CsumError;

/// BLAKE3 with a 256-bit digest.
///
/// Takes no parameter. One is ignored with a warning, or rejected with
/// [`Flags::STRICT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Algorithm;

impl Blake3Algorithm {
    /// Creates the descriptor.
    pub const fn new() -> Self {
        Self
    }
}

impl Algorithm for Blake3Algorithm {
    fn name(&self) -> &str {
        "blake3"
    }

    fn description(&self) -> Option<&str> {
        Some("BLAKE3 (256-bit)")
    }

    fn prepare(
        &self,
        args: Option<&str>,
        flags: Flags,
    ) -> Result<Box<dyn Accumulator>, CsumError> {
        if let Some(args) = args {
            if flags.contains(Flags::STRICT) {
                return Err(CsumError::MalformedParameter {
                    input: args.to_owned(),
                });
            }
            tracing::warn!(parameter = args, "blake3 takes no parameter, ignoring");
        }

        Ok(Box::new(Blake3State {
            state: blake3::Hasher::new(),
        }))
    }
}

/// Incremental BLAKE3 state of one context.
#[derive(Debug, Clone)]
struct Blake3State {
    state: blake3::Hasher,
}

impl Accumulator for Blake3State {
    fn reset(&mut self) {
        self.state.reset();
    }

    fn update(&mut self, block: &[u8]) {
        self.state.update(block);
    }

    fn digest(&self) -> String {
        format!("0x{}", self.state.finalize().to_hex())
    }
}
