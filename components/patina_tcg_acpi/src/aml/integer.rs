//! AML Integer Constants
//!
//! Only the prefixed forms an ASL compiler emits for a `Buffer` size are recognized.
//!
//! ```text
//! ByteConst  := BytePrefix ByteData
//! WordConst  := WordPrefix WordData
//! DWordConst := DWordPrefix DWordData
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use super::{AML_BYTE_PREFIX, AML_DWORD_PREFIX, AML_WORD_PREFIX};
use crate::error::{Error, Result};

/// A prefixed AML integer constant of fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmlInteger {
    prefix: u8,
    width: usize,
    value: u32,
}

impl AmlInteger {
    /// Decodes an integer constant from the start of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let prefix = *bytes.first().ok_or(Error::UnsupportedEncoding)?;
        let width = Self::width_of(prefix)?;
        let data = bytes.get(1..1 + width).ok_or(Error::UnsupportedEncoding)?;

        let value = data.iter().rev().fold(0u32, |value, byte| (value << 8) | *byte as u32);
        Ok(Self { prefix, width, value })
    }

    fn width_of(prefix: u8) -> Result<usize> {
        match prefix {
            AML_BYTE_PREFIX => Ok(1),
            AML_WORD_PREFIX => Ok(2),
            AML_DWORD_PREFIX => Ok(4),
            _ => Err(Error::UnsupportedEncoding),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Width of the data following the prefix.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Prefix byte plus data.
    pub fn encoded_len(&self) -> usize {
        1 + self.width()
    }

    /// Returns the same width integer holding `value`.
    pub fn with_value(&self, value: u32) -> Result<Self> {
        let bits = 8 * self.width() as u32;
        if bits < u32::BITS && value >> bits != 0 {
            return Err(Error::InsufficientSpace);
        }
        Ok(Self { value, ..*self })
    }

    /// Writes the prefix and little-endian data to the start of `out`, returning the number of bytes written.
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        let len = self.encoded_len();
        let out = out.get_mut(..len).ok_or(Error::InsufficientSpace)?;
        out[0] = self.prefix;
        out[1..].copy_from_slice(&self.value.to_le_bytes()[..len - 1]);
        Ok(len)
    }
}
