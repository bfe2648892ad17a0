//! TPM2 Static ACPI Table
//!
//! Builds the `TPM2` table that tells the operating system where the TPM 2.0 control area lives and how commands are
//! started. Only the Command Response Buffer interface reached over FF-A is supported.
//!
//! See TCG ACPI Specification, section 8 "TPM2 ACPI Table".
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;
use core::mem::size_of;

use r_efi::efi;
use zerocopy::IntoBytes;
use zerocopy_derive::*;

use crate::{
    config::{TcgAcpiConfig, Tpm2InterfaceType},
    error::{Error, Result},
    table::AcpiDescriptionHeader,
};

/// `"TPM2"`
pub const TPM2_TABLE_SIGNATURE: u32 = u32::from_le_bytes(*b"TPM2");
pub const TPM2_TABLE_REVISION_3: u8 = 3;
pub const TPM2_TABLE_REVISION_4: u8 = 4;

pub const START_METHOD_TIS: u32 = 6;
pub const START_METHOD_CRB_WITH_FFA: u32 = 15;

/// Length of the table without the platform specific parameters, LAML and LASA.
pub const TPM2_TABLE_BASE_SIZE: usize = AcpiDescriptionHeader::SIZE + 16;

/// Offset of the CRB control area from the TPM base address.
pub const CONTROL_AREA_OFFSET: u64 = 0x40;
/// Offset of the shared command and response buffer from the TPM base address.
pub const CRB_BUFFER_OFFSET: u64 = 0x80;
pub const CRB_BUFFER_SIZE: u32 = 0xF80;

/// Notifications not supported, 4KiB CRB not cacheable, partition ID 0x8002.
pub const FFA_PLATFORM_PARAMETERS: [u8; 4] = [0x00, 0x00, 0x80, 0x02];

/// EFI_TPM2_ACPI_TABLE_V4
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct Tpm2AcpiTable {
    pub header: AcpiDescriptionHeader,
    /// Bits 15:0 hold the platform class for revision 4 and above.
    pub flags: u32,
    pub address_of_control_area: u64,
    pub start_method: u32,
    pub platform_specific_parameters: [u8; 12],
    /// Log Area Minimum Length.
    pub laml: u32,
    /// Log Area Start Address.
    pub lasa: u64,
}

impl Default for Tpm2AcpiTable {
    fn default() -> Self {
        Self {
            header: AcpiDescriptionHeader {
                signature: TPM2_TABLE_SIGNATURE,
                length: size_of::<Self>() as u32,
                revision: TPM2_TABLE_REVISION_4,
                ..Default::default()
            },
            flags: 0,
            address_of_control_area: 0,
            start_method: START_METHOD_TIS,
            platform_specific_parameters: [0; 12],
            laml: 0,
            lasa: 0,
        }
    }
}

/// EFI_TPM2_ACPI_CONTROL_AREA
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct Tpm2ControlArea {
    pub reserved: u32,
    pub error: u32,
    pub cancel: u32,
    pub start: u32,
    pub interrupt_control: u64,
    pub command_size: u32,
    pub command: u64,
    pub response_size: u32,
    pub response: u64,
}

impl Tpm2AcpiTable {
    pub const SIZE: usize = size_of::<Self>();

    /// Applies the platform configuration to the template.
    ///
    /// Returns the control area the CRB interface expects at [`Tpm2AcpiTable::address_of_control_area`].
    pub fn configure(&mut self, config: &TcgAcpiConfig) -> Result<Tpm2ControlArea> {
        let revision = config.tpm2_table_revision;
        self.header.revision = revision;
        log::info!("Tpm2 ACPI table revision is {}", revision);

        if revision >= TPM2_TABLE_REVISION_4 {
            self.flags = (self.flags & 0xFFFF_0000) | config.platform_class as u32;
            log::info!("Tpm2 ACPI table PlatformClass is {}", config.platform_class);
        }

        self.laml = config.laml;
        self.lasa = config.lasa;
        if revision < TPM2_TABLE_REVISION_4 || config.laml == 0 || config.lasa == 0 {
            self.header.length = TPM2_TABLE_BASE_SIZE as u32;
        }

        let interface_type = config.interface_type;
        log::info!("Tpm Active Interface Type {:?}", interface_type);
        let control_area = match interface_type {
            Tpm2InterfaceType::Crb => {
                let base = config.tpm_base_address;
                self.start_method = START_METHOD_CRB_WITH_FFA;
                self.address_of_control_area = base + CONTROL_AREA_OFFSET;
                self.platform_specific_parameters[..FFA_PLATFORM_PARAMETERS.len()]
                    .copy_from_slice(&FFA_PLATFORM_PARAMETERS);
                Tpm2ControlArea {
                    command_size: CRB_BUFFER_SIZE,
                    response_size: CRB_BUFFER_SIZE,
                    command: base + CRB_BUFFER_OFFSET,
                    response: base + CRB_BUFFER_OFFSET,
                    ..Default::default()
                }
            }
            _ => {
                log::error!("TPM2 InterfaceType get error! {:?}", interface_type);
                return Err(Error::Efi(efi::Status::UNSUPPORTED));
            }
        };

        let length = self.header.length;
        log::info!("Tpm2 ACPI table size {}", length);

        self.header.oem_id = config.oem_id;
        self.header.oem_table_id = config.oem_table_id;
        self.header.oem_revision = config.oem_revision;
        self.header.creator_id = config.creator_id;
        self.header.creator_revision = config.creator_revision;

        Ok(control_area)
    }

    /// The bytes of the table up to its declared length.
    pub fn table_bytes(&self) -> Vec<u8> {
        let length = (self.header.length as usize).min(Self::SIZE);
        self.as_bytes()[..length].to_vec()
    }
}
