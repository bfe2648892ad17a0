//! TPM Hardware ID
//!
//! The `_HID` of the TPM device is derived from the TPM itself:
//!
//! - `NNN####` (PNP ID) when the TCG vendor ID is three letters, padded with `0x00` or `0x20`.
//! - `NNNN####` (ACPI ID) when the TCG vendor ID is four letters.
//!
//! `####` is firmware version 1 printed as `%02d%02d` from its upper and lower 16 bits.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::format;
use core::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Field width of a PNP ID including its NUL terminator.
pub const TPM_HID_PNP_SIZE: usize = 8;
/// Field width of an ACPI ID including its NUL terminator.
pub const TPM_HID_ACPI_SIZE: usize = 9;

const VERSION_DIGITS: usize = 4;

/// A validated TPM `_HID` string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TpmHid {
    bytes: [u8; TPM_HID_ACPI_SIZE - 1],
    len: usize,
}

impl TpmHid {
    /// Builds the HID from `TPM_PT_MANUFACTURER` and `TPM_PT_FIRMWARE_VERSION_1`.
    pub fn from_capabilities(manufacturer_id: u32, firmware_version_1: u32) -> Result<Self> {
        let vendor = manufacturer_id.to_le_bytes();
        match manufacturer_id >> 24 {
            0x00 | 0x20 => Self::new(&vendor[..3], firmware_version_1),
            _ => Self::new(&vendor, firmware_version_1),
        }
    }

    /// Builds the HID from a three or four character vendor ID and `TPM_PT_FIRMWARE_VERSION_1`.
    pub fn new(vendor: &[u8], firmware_version_1: u32) -> Result<Self> {
        let version = format!("{:02}{:02}", firmware_version_1 >> 16, firmware_version_1 & 0xFFFF);
        Self::from_parts(vendor, &version.as_bytes()[..VERSION_DIGITS])
    }

    fn from_parts(vendor: &[u8], digits: &[u8]) -> Result<Self> {
        if !matches!(vendor.len(), 3 | 4) || !vendor.iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            log::error!("Invalid TPM vendor ID {:02X?}", vendor);
            return Err(Error::InvalidInput);
        }
        if digits.len() != VERSION_DIGITS || !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::InvalidInput);
        }

        let mut bytes = [0u8; TPM_HID_ACPI_SIZE - 1];
        bytes[..vendor.len()].copy_from_slice(vendor);
        bytes[vendor.len()..vendor.len() + VERSION_DIGITS].copy_from_slice(digits);
        Ok(Self { bytes, len: vendor.len() + VERSION_DIGITS })
    }

    /// True for a PNP ID, false for an ACPI ID.
    pub fn is_pnp(&self) -> bool {
        self.len == TPM_HID_PNP_SIZE - 1
    }

    /// Number of bytes the HID occupies in the table, NUL terminator included.
    pub fn field_width(&self) -> usize {
        self.len + 1
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII is accepted on construction.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

impl FromStr for TpmHid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s.len().checked_sub(VERSION_DIGITS).ok_or(Error::InvalidInput)?;
        if !s.is_char_boundary(split) {
            return Err(Error::InvalidInput);
        }
        let (vendor, digits) = s.as_bytes().split_at(split);
        Self::from_parts(vendor, digits)
    }
}

impl fmt::Display for TpmHid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TpmHid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TpmHid({})", self.as_str())
    }
}
