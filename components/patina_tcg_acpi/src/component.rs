//! TCG ACPI Component
//!
//! Patches and installs the TPM SSDT, then builds and installs the `TPM2` table.
//!
//! ## SSDT Flow
//!
//! 1. Measure the table as it was compiled into PCR 0. This happens before any patch so the measurement does not
//!    change with the TPM firmware or the platform configuration.
//! 2. Patch the Physical Presence interface version.
//! 3. Patch `_HID` from the TPM manufacturer and firmware version.
//! 4. When the TPM uses an interrupt, patch the `_PRS` interrupt list. Failure is logged but not fatal.
//! 5. Install the table.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;

use r_efi::efi;

use crate::{
    config::TcgAcpiConfig,
    error::{Error, Result},
    hid::TpmHid,
    patch::MAX_PRS_INT_ENTRIES,
    service::{
        AcpiTableInstaller, ControlAreaWriter, TcgMeasurement, Tpm2Capability, ACPI_DATA_PCR_INDEX, EV_POST_CODE,
        EV_POSTCODE_INFO_ACPI_DATA,
    },
    table::SsdtTable,
    tpm2::Tpm2AcpiTable,
};

/// A component that publishes the TPM 2.0 ACPI tables.
#[derive(Debug, Default)]
pub struct TcgAcpi {
    config: TcgAcpiConfig,
}

impl TcgAcpi {
    pub fn new(config: TcgAcpiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TcgAcpiConfig {
        &self.config
    }

    /// Publishes the SSDT in `ssdt` and the `TPM2` table.
    ///
    /// Fails with `Efi(UNSUPPORTED)` without touching any service if the configured TPM is not a discrete TPM 2.0.
    /// Otherwise both tables are attempted and the first failure is returned.
    pub fn entry_point(
        &self,
        ssdt: Vec<u8>,
        tpm: &dyn Tpm2Capability,
        measurement: &dyn TcgMeasurement,
        acpi: &dyn AcpiTableInstaller,
        control_area: &dyn ControlAreaWriter,
    ) -> Result<()> {
        log::info!("TCG ACPI FFA Entry Point!");

        if !self.config.is_dtpm20() {
            log::error!("No TPM2 DTPM instance required!");
            return Err(Error::Efi(efi::Status::UNSUPPORTED));
        }

        // The TPM2 table does not depend on the SSDT, so it is published either way.
        let ssdt_status = self.publish_ssdt(ssdt, tpm, measurement, acpi);
        if let Err(err) = &ssdt_status {
            log::error!("Failed to publish TPM SSDT: {}", err);
        }

        let tpm2_status = self.publish_tpm2(measurement, acpi, control_area);
        if let Err(err) = &tpm2_status {
            log::error!("Failed to publish TPM2 table: {}", err);
        }

        ssdt_status.and(tpm2_status).map(|_| ())
    }

    /// Patches and installs the TPM SSDT, returning the table key.
    pub fn publish_ssdt(
        &self,
        ssdt: Vec<u8>,
        tpm: &dyn Tpm2Capability,
        measurement: &dyn TcgMeasurement,
        acpi: &dyn AcpiTableInstaller,
    ) -> Result<usize> {
        let mut table = SsdtTable::new(ssdt)?;

        self.measure(measurement, table.as_bytes());

        let pp_version = self.config.pp_interface_version.as_str();
        table.patch_pp_version(pp_version)?;
        log::info!("Current physical presence interface version - {}", pp_version);

        let manufacturer_id = tpm.manufacturer_id()?;
        let (firmware_version_1, firmware_version_2) = tpm.firmware_version()?;
        log::debug!(
            target: "tcg_acpi",
            "TPM manufacturer {:#010x}, firmware version {:#010x} {:#010x}",
            manufacturer_id,
            firmware_version_1,
            firmware_version_2
        );
        let hid = TpmHid::from_capabilities(manufacturer_id, firmware_version_1)?;
        table.patch_hid(&hid)?;

        if self.config.current_irq_num != 0 {
            match self.config.possible_irqs() {
                Ok(irqs) => {
                    let status = match table.patch_interrupt_resource(&irqs, MAX_PRS_INT_ENTRIES) {
                        Ok(_) => efi::Status::SUCCESS,
                        Err(err) => err.into(),
                    };
                    log::info!("UpdatePossibleResource status - {:?}. TPM2 service may not ready in OS.", status);
                }
                Err(_) => log::info!(
                    "Possible IRQ buffer size {:#x} is not correct. TPM2 service may not ready in OS.",
                    self.config.possible_irq_buffer.len()
                ),
            }
        }

        let key = acpi.install_acpi_table(table.as_bytes())?;
        log::debug!(target: "tcg_acpi", "TPM SSDT installed with key {:#x}", key);
        Ok(key)
    }

    /// Builds, measures and installs the `TPM2` table, returning the table key.
    pub fn publish_tpm2(
        &self,
        measurement: &dyn TcgMeasurement,
        acpi: &dyn AcpiTableInstaller,
        control_area: &dyn ControlAreaWriter,
    ) -> Result<usize> {
        let mut table = Tpm2AcpiTable::default();

        self.measure(measurement, &table.table_bytes());

        let area = table.configure(&self.config)?;
        let address = table.address_of_control_area;
        control_area.write_control_area(address, &area)?;

        acpi.install_acpi_table(&table.table_bytes())
    }

    fn measure(&self, measurement: &dyn TcgMeasurement, data: &[u8]) {
        if self.config.skip_acpi_measurements {
            return;
        }
        if let Err(err) =
            measurement.measure_and_log_data(ACPI_DATA_PCR_INDEX, EV_POST_CODE, EV_POSTCODE_INFO_ACPI_DATA, data)
        {
            log::error!("Failed to measure ACPI data: {}", err);
        }
    }
}
