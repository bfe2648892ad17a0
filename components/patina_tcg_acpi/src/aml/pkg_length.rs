//! AML Package Length Encoding
//!
//! ```text
//! PkgLeadByte := <bit 7-6: ByteData count that follows (0-3)>
//!                <bit 5-4: Only used if PkgLength <= 63>
//!                <bit 3-0: Least significant package length nybble>
//! ```
//!
//! A `PkgLength` is re-encoded in the form it was found in. A long encoding keeps its count of trailing bytes even
//! when fewer would do so that the bytes following the package length never move.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use crate::error::{Error, Result};

/// AML package length in either its single byte or multi-byte form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkgLength {
    /// Lead byte only. The value lives in bits 5-0.
    Short(u8),
    /// Lead byte holding the low nybble followed by `count` bytes of the remaining value, least significant first.
    Long { count: u8, nibble: u8, bytes: [u8; 3] },
}

impl PkgLength {
    /// Largest value of the single byte form.
    pub const SHORT_MAX: u32 = 0x3F;

    const COUNT_MASK: u8 = 0xC0;
    const COUNT_SHIFT: u8 = 6;
    const RESERVED_MASK: u8 = 0x30;
    const NIBBLE_MASK: u8 = 0x0F;

    /// Decodes a package length from the start of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let lead = *bytes.first().ok_or(Error::UnsupportedEncoding)?;
        let count = (lead & Self::COUNT_MASK) >> Self::COUNT_SHIFT;

        if count == 0 {
            return Ok(PkgLength::Short(lead));
        }

        // Bits 5-4 are reserved when trailing bytes are present.
        if lead & Self::RESERVED_MASK != 0 {
            return Err(Error::UnsupportedEncoding);
        }

        let trailing = bytes.get(1..=count as usize).ok_or(Error::UnsupportedEncoding)?;
        let mut extra = [0u8; 3];
        extra[..trailing.len()].copy_from_slice(trailing);

        Ok(PkgLength::Long { count, nibble: lead & Self::NIBBLE_MASK, bytes: extra })
    }

    /// Returns the decoded package length.
    pub fn value(&self) -> u32 {
        match *self {
            PkgLength::Short(lead) => lead as u32,
            PkgLength::Long { count, nibble, bytes } => bytes[..count as usize]
                .iter()
                .enumerate()
                .fold(nibble as u32, |value, (i, byte)| value | (*byte as u32) << (4 + 8 * i)),
        }
    }

    /// Number of bytes the encoding occupies.
    pub fn encoded_len(&self) -> usize {
        match self {
            PkgLength::Short(_) => 1,
            PkgLength::Long { count, .. } => 1 + *count as usize,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, PkgLength::Long { .. })
    }

    /// Largest value representable without changing the encoded length.
    pub fn max_value(&self) -> u32 {
        match self {
            PkgLength::Short(_) => Self::SHORT_MAX,
            PkgLength::Long { count, .. } => (1u32 << (4 + 8 * *count as u32)) - 1,
        }
    }

    /// Re-encodes `value` in the same form and with the same encoded length as `self`.
    pub fn with_value(&self, value: u32) -> Result<Self> {
        if value > self.max_value() {
            return Err(Error::InsufficientSpace);
        }

        match *self {
            PkgLength::Short(_) => Ok(PkgLength::Short(value as u8)),
            PkgLength::Long { count, .. } => {
                let mut bytes = [0u8; 3];
                for (i, byte) in bytes.iter_mut().take(count as usize).enumerate() {
                    *byte = (value >> (4 + 8 * i)) as u8;
                }
                Ok(PkgLength::Long { count, nibble: value as u8 & Self::NIBBLE_MASK, bytes })
            }
        }
    }

    /// Writes the encoding to the start of `out`, returning the number of bytes written.
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        let len = self.encoded_len();
        let out = out.get_mut(..len).ok_or(Error::InsufficientSpace)?;

        match *self {
            PkgLength::Short(lead) => out[0] = lead,
            PkgLength::Long { count, nibble, bytes } => {
                out[0] = (count << Self::COUNT_SHIFT) | (nibble & Self::NIBBLE_MASK);
                out[1..].copy_from_slice(&bytes[..count as usize]);
            }
        }

        Ok(len)
    }
}
