//! ACPI Table Buffers
//!
//! Provides the common ACPI description header and [`SsdtTable`], an owned, fixed length SSDT that is patched in
//! place before it is handed to the ACPI table installer.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;
use core::{mem::size_of, ops::Range};

use zerocopy::FromBytes;
use zerocopy_derive::*;

use crate::{
    error::{Error, Result},
    hid::TpmHid,
    patch,
};

/// EFI_ACPI_DESCRIPTION_HEADER
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Default, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct AcpiDescriptionHeader {
    pub signature: u32,
    pub length: u32,
    pub revision: u8,
    pub checksum: u8,
    pub oem_id: [u8; 6],
    pub oem_table_id: u64,
    pub oem_revision: u32,
    pub creator_id: u32,
    pub creator_revision: u32,
}

impl AcpiDescriptionHeader {
    pub const SIZE: usize = size_of::<Self>();

    /// Offset of the checksum byte within a table.
    pub const CHECKSUM_OFFSET: usize = 9;

    /// Reads the header from the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        Self::read_from_prefix(bytes).map(|(header, _)| header).map_err(|_| Error::InvalidTable)
    }

    pub fn signature(&self) -> [u8; 4] {
        self.signature.to_le_bytes()
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

/// Computes the byte that, stored in the checksum field, makes `table` sum to zero.
pub fn checksum(table: &[u8]) -> u8 {
    let sum = table
        .iter()
        .enumerate()
        .filter(|(offset, _)| *offset != AcpiDescriptionHeader::CHECKSUM_OFFSET)
        .fold(0u8, |sum, (_, byte)| sum.wrapping_add(*byte));
    0u8.wrapping_sub(sum)
}

/// A pre-compiled SSDT owned for the duration of a patch pass.
///
/// The length of the buffer never changes. Every patch is confined to [`SsdtTable::data_range`], the AML following
/// the header up to the length declared in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdtTable {
    bytes: Vec<u8>,
}

impl SsdtTable {
    /// Takes ownership of a compiled table.
    ///
    /// Fails with [`Error::InvalidTable`] if the buffer cannot hold an ACPI header or the declared length is shorter
    /// than the header or runs past the end of the buffer.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        data_range(&bytes)?;
        Ok(Self { bytes })
    }

    pub fn header(&self) -> Result<AcpiDescriptionHeader> {
        AcpiDescriptionHeader::read(&self.bytes)
    }

    /// Offsets of the AML definition block.
    pub fn data_range(&self) -> Range<usize> {
        // Validated on construction and the length never changes.
        data_range(&self.bytes).unwrap_or(AcpiDescriptionHeader::SIZE..AcpiDescriptionHeader::SIZE)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Replaces the `"$PV"` placeholder with `pp_version`.
    pub fn patch_pp_version(&mut self, pp_version: &str) -> Result<()> {
        patch::identifier::patch_pp_version(&mut self.bytes, pp_version)
    }

    /// Replaces the `"NNNN0000"` placeholder with `hid`.
    pub fn patch_hid(&mut self, hid: &TpmHid) -> Result<()> {
        patch::identifier::patch_hid(&mut self.bytes, hid)
    }

    /// Patches the Physical Presence interface version and the TPM `_HID`.
    pub fn patch_identifier_strings(&mut self, pp_version: &str, hid: &TpmHid) -> Result<()> {
        patch::identifier::patch_identifier_strings(&mut self.bytes, pp_version, hid)
    }

    /// Patches the interrupt list returned by `_PRS`, returning `true` if the long form template was used.
    pub fn patch_interrupt_resource(&mut self, irqs: &[u32], max_entries: usize) -> Result<bool> {
        patch::resource::patch_interrupt_resource(&mut self.bytes, irqs, max_entries)
    }

    /// Recomputes the header checksum over the declared length of the table.
    pub fn update_checksum(&mut self) {
        let end = self.data_range().end;
        let checksum = checksum(&self.bytes[..end]);
        self.bytes[AcpiDescriptionHeader::CHECKSUM_OFFSET] = checksum;
    }
}

/// Returns the offsets of the AML following the header of the table in `bytes`.
pub fn data_range(bytes: &[u8]) -> Result<Range<usize>> {
    let header = AcpiDescriptionHeader::read(bytes)?;
    let length = header.length() as usize;
    if length < AcpiDescriptionHeader::SIZE || length > bytes.len() {
        return Err(Error::InvalidTable);
    }
    Ok(AcpiDescriptionHeader::SIZE..length)
}
