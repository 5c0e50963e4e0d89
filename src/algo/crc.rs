//! CRC algorithm family.
//!
//! The polynomial math comes from the `crc` crate. This module only adapts
//! each catalogue model to a fold step `(block, previous) -> next` over
//! finalized checksum values, so that an empty fold is the identity and a
//! checksum can be continued from any earlier result.

use ::crc::{Algorithm as Model, Crc};

use crate::algo::{Accumulator, Algorithm};
use crate::config::Flags;
use crate::error::CsumError;
use crate::util::parse_seed;

/// One fold step of a CRC: continues `previous` over `block`.
pub type FoldFn = fn(block: &[u8], previous: u64) -> u64;

// https://reveng.sourceforge.io/crc-catalogue/all.htm#crc.cat.crc-64-nvme
// Same polynomial as the Linux crc64_rocksoft.
const CRC_64_NVME: Model<u64> = Model {
    width: 64,
    poly: 0xad93d23594c93659,
    init: 0xFFFFFFFFFFFFFFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFFFFFFFFFFFFFF,
    check: 0xae8b14860a799888,
    residue: 0xf310303b2b6f6e42,
};

/// Generates a fold step for a catalogue model.
///
/// The previous value is turned back into the model's unreflected register
/// form and used as the initial value of a new digest. Only models with
/// `refin == refout` are supported.
macro_rules! crc_fold {
    ($fold:ident, $word:ty, $model:path) => {
        fn $fold(block: &[u8], previous: u64) -> u64 {
            static CRC: Crc<$word> = Crc::<$word>::new(&$model);

            let mut initial = (previous as $word) ^ $model.xorout;
            if $model.refin {
                initial = (initial << (<$word>::BITS - u32::from($model.width))).reverse_bits();
            }

            let mut digest = CRC.digest_with_initial(initial);
            digest.update(block);
            u64::from(digest.finalize())
        }
    };
}

crc_fold!(fold_crc4, u8, ::crc::CRC_4_G_704);
crc_fold!(fold_crc7, u8, ::crc::CRC_7_MMC);
crc_fold!(fold_crc8, u8, ::crc::CRC_8_SMBUS);
crc_fold!(fold_crc16, u16, ::crc::CRC_16_ARC);
crc_fold!(fold_ccitt, u16, ::crc::CRC_16_KERMIT);
crc_fold!(fold_ccittf, u16, ::crc::CRC_16_IBM_3740);
crc_fold!(fold_itut, u16, ::crc::CRC_16_XMODEM);
crc_fold!(fold_t10dif, u16, ::crc::CRC_16_T10_DIF);
crc_fold!(fold_crc32, u32, ::crc::CRC_32_ISO_HDLC);
crc_fold!(fold_crc64, u64, ::crc::CRC_64_ECMA_182);
crc_fold!(fold_rocksoft, u64, CRC_64_NVME);

/// A CRC descriptor: a name, a bit width, and a fold step.
///
/// The accumulator is held in the smallest of 8, 16, 32 or 64 bits that fits
/// the width, and the digest prints that many bits: `crc4` and `crc7` print
/// two hex digits like `crc8`.
#[derive(Debug, Clone, Copy)]
pub struct CrcAlgorithm {
    name: &'static str,
    description: &'static str,
    width: u8,
    fold: FoldFn,
}

impl CrcAlgorithm {
    /// Creates a descriptor from a fold step of the given bit width (1-64).
    pub const fn new(
        name: &'static str,
        description: &'static str,
        width: u8,
        fold: FoldFn,
    ) -> Self {
        Self {
            name,
            description,
            width,
            fold,
        }
    }

    /// Returns every built-in CRC, in help order.
    pub fn catalog() -> [CrcAlgorithm; 11] {
        [
            Self::new("crc4", "CRC-4/G-704", 4, fold_crc4),
            Self::new("crc7", "CRC-7/MMC", 7, fold_crc7),
            Self::new("crc8", "CRC-8/SMBUS", 8, fold_crc8),
            Self::new("crc16", "CRC-16/ARC", 16, fold_crc16),
            Self::new("crc-ccitt", "CRC-16/KERMIT", 16, fold_ccitt),
            Self::new("crc-ccittf", "CRC-16/IBM-3740 (CCITT-FALSE)", 16, fold_ccittf),
            Self::new("crc-itut", "CRC-16/XMODEM", 16, fold_itut),
            Self::new("crc-t10dif", "CRC-16/T10-DIF", 16, fold_t10dif),
            Self::new("crc32", "CRC-32/ISO-HDLC", 32, fold_crc32),
            Self::new("crc64", "CRC-64/ECMA-182", 64, fold_crc64),
            Self::new("crc-rocksoft", "CRC-64/NVME", 64, fold_rocksoft),
        ]
    }

    /// Returns the CRC width in bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Returns the mask of valid accumulator bits.
    pub fn mask(&self) -> u64 {
        match self.width {
            64.. => u64::MAX,
            width => (1u64 << width) - 1,
        }
    }

    /// Returns the number of hex digits in a formatted digest.
    pub fn digits(&self) -> usize {
        match self.width {
            0..=8 => 2,
            9..=16 => 4,
            17..=32 => 8,
            _ => 16,
        }
    }

    /// Continues `previous` over `block`.
    pub fn fold(&self, block: &[u8], previous: u64) -> u64 {
        (self.fold)(block, previous)
    }
}

impl Algorithm for CrcAlgorithm {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> Option<&str> {
        Some(self.description)
    }

    fn prepare(
        &self,
        args: Option<&str>,
        flags: Flags,
    ) -> Result<Box<dyn Accumulator>, CsumError> {
        let seed = parse_seed(args, flags)?;
        let masked = seed & self.mask();
        if masked != seed {
            if flags.contains(Flags::STRICT) {
                return Err(CsumError::MalformedParameter {
                    input: args.unwrap_or_default().to_owned(),
                });
            }
            tracing::warn!(algorithm = self.name, seed, masked, "seed truncated to width");
        }

        Ok(Box::new(CrcState {
            fold: self.fold,
            digits: self.digits(),
            seed: masked,
            value: masked,
        }))
    }
}

/// Running CRC value of one context.
#[derive(Debug)]
struct CrcState {
    fold: FoldFn,
    digits: usize,
    seed: u64,
    value: u64,
}

impl Accumulator for CrcState {
    fn reset(&mut self) {
        self.value = self.seed;
    }

    fn update(&mut self, block: &[u8]) {
        self.value = (self.fold)(block, self.value);
    }

    fn digest(&self) -> String {
        format!("{:#0width$x}", self.value, width = self.digits + 2)
    }
}
