//! TCG ACPI Collaborator Services
//!
//! Services the TCG ACPI component consumes to query the TPM, extend measurements, program the CRB control area and
//! install ACPI tables.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

use crate::{error::Result, tpm2::Tpm2ControlArea};

/// PCR the tables are measured into.
pub const ACPI_DATA_PCR_INDEX: u32 = 0;
/// EV_POST_CODE
pub const EV_POST_CODE: u32 = 0x0000_0001;
/// EV_POSTCODE_INFO_ACPI_DATA
pub const EV_POSTCODE_INFO_ACPI_DATA: &[u8] = b"ACPI DATA";

/// TPM 2.0 Capability Service
///
/// Reads `TPM2_GetCapability(TPM_CAP_TPM_PROPERTIES)` values from the TPM.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait Tpm2Capability {
    /// `TPM_PT_MANUFACTURER`
    fn manufacturer_id(&self) -> Result<u32>;

    /// `TPM_PT_FIRMWARE_VERSION_1` and `TPM_PT_FIRMWARE_VERSION_2`.
    fn firmware_version(&self) -> Result<(u32, u32)>;
}

/// TCG Measurement Service
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait TcgMeasurement {
    /// Extends `pcr_index` with the digest of `data` and logs `event_log` as the event data.
    fn measure_and_log_data(&self, pcr_index: u32, event_type: u32, event_log: &[u8], data: &[u8]) -> Result<()>;
}

/// ACPI Table Installation Service
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait AcpiTableInstaller {
    /// Installs a copy of `table`, returning the table key. The installer recomputes the checksum.
    fn install_acpi_table(&self, table: &[u8]) -> Result<usize>;
}

/// CRB Control Area Service
///
/// Programs the Command Response Buffer control area of the TPM.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait ControlAreaWriter {
    /// Writes `control_area` to the physical `address`.
    fn write_control_area(&self, address: u64, control_area: &Tpm2ControlArea) -> Result<()>;
}
