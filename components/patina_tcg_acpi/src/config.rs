//! TCG ACPI Configuration
//!
//! Platform values consumed when the TPM ACPI tables are patched and published.
//!
//! ## Static Configuration Example
//!
//! ```rust
//! use patina_tcg_acpi::config::{TcgAcpiConfig, Tpm2InterfaceType};
//!
//! let config = TcgAcpiConfig {
//!     current_irq_num: 0x24,
//!     possible_irq_buffer: [0x24u32, 0x25].iter().flat_map(|irq| irq.to_le_bytes()).collect(),
//!     interface_type: Tpm2InterfaceType::Crb,
//!     tpm_base_address: 0x6000_0000,
//!     ..Default::default()
//! };
//!
//! assert_eq!(config.possible_irqs().unwrap(), vec![0x24, 0x25]);
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{string::String, vec::Vec};
use core::mem::size_of;

use r_efi::efi;

use crate::{
    error::{Error, Result},
    patch::MAX_PRS_INT_BUF_SIZE,
};

/// gEfiTpmDeviceInstanceTpm20DtpmGuid
pub const TPM_DEVICE_INSTANCE_TPM20_DTPM: efi::Guid =
    efi::Guid::from_fields(0x286bf25a, 0xc2c3, 0x408c, 0xb3, 0xb4, &[0x25, 0xe6, 0x75, 0x8b, 0x73, 0x17]);

/// TPM2_PTP_INTERFACE_TYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tpm2InterfaceType {
    Tis,
    Fifo,
    #[default]
    Crb,
}

impl TryFrom<u8> for Tpm2InterfaceType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Tpm2InterfaceType::Tis),
            1 => Ok(Tpm2InterfaceType::Fifo),
            2 => Ok(Tpm2InterfaceType::Crb),
            _ => Err(Error::InvalidInput),
        }
    }
}

/// The configuration for the TCG ACPI component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcgAcpiConfig {
    /// The active TPM instance. Only a discrete TPM 2.0 is supported.
    pub tpm_instance: efi::Guid,
    /// Skips measuring the tables before they are patched.
    pub skip_acpi_measurements: bool,
    /// Physical Presence interface version reported through `_DSM`.
    pub pp_interface_version: String,
    /// The interrupt currently used by the TPM. `0` leaves `_PRS` untouched.
    pub current_irq_num: u32,
    /// Little-endian `u32` interrupt numbers returned by `_PRS`.
    pub possible_irq_buffer: Vec<u8>,
    pub tpm2_table_revision: u8,
    pub platform_class: u8,
    /// Log Area Minimum Length.
    pub laml: u32,
    /// Log Area Start Address.
    pub lasa: u64,
    pub interface_type: Tpm2InterfaceType,
    pub tpm_base_address: u64,
    pub oem_id: [u8; 6],
    pub oem_table_id: u64,
    pub oem_revision: u32,
    pub creator_id: u32,
    pub creator_revision: u32,
}

impl Default for TcgAcpiConfig {
    fn default() -> Self {
        TcgAcpiConfig {
            tpm_instance: TPM_DEVICE_INSTANCE_TPM20_DTPM,
            skip_acpi_measurements: false,
            pp_interface_version: String::from("1.3"),
            current_irq_num: 0,
            possible_irq_buffer: Vec::new(),
            tpm2_table_revision: 4,
            platform_class: 0,
            laml: 0,
            lasa: 0,
            interface_type: Tpm2InterfaceType::Crb,
            tpm_base_address: 0,
            oem_id: *b"MSFTVM",
            oem_table_id: u64::from_le_bytes(*b"MSFTVM  "),
            oem_revision: 1,
            creator_id: u32::from_le_bytes(*b"MSFT"),
            creator_revision: 1,
        }
    }
}

impl TcgAcpiConfig {
    /// Decodes [`TcgAcpiConfig::possible_irq_buffer`].
    ///
    /// Fails with [`Error::InvalidInput`] if the buffer is not a whole number of `u32` or holds more than
    /// [`MAX_PRS_INT_BUF_SIZE`] bytes.
    pub fn possible_irqs(&self) -> Result<Vec<u32>> {
        decode_irq_buffer(&self.possible_irq_buffer)
    }

    /// True if the configured TPM instance is a discrete TPM 2.0.
    pub fn is_dtpm20(&self) -> bool {
        self.tpm_instance == TPM_DEVICE_INSTANCE_TPM20_DTPM
    }
}

/// Decodes a buffer of little-endian interrupt numbers.
pub fn decode_irq_buffer(buffer: &[u8]) -> Result<Vec<u32>> {
    if buffer.len() > MAX_PRS_INT_BUF_SIZE || buffer.len() % size_of::<u32>() != 0 {
        return Err(Error::InvalidInput);
    }
    Ok(buffer
        .chunks_exact(size_of::<u32>())
        .map(|irq| u32::from_le_bytes([irq[0], irq[1], irq[2], irq[3]]))
        .collect())
}
