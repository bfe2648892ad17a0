//! TCG ACPI Support
//!
//! This crate patches and publishes the ACPI tables an operating system uses to discover a TPM 2.0 device. Two
//! tables are produced:
//!
//! - A pre-compiled SSDT containing the TPM device object. The SSDT is patched in place before it is installed: the
//!   Physical Presence interface version string, the `_HID` of the device, and the interrupt resources returned by
//!   `_PRS`. The SSDT never changes size; space freed by a patch is filled with AML `NoopOp` bytes.
//! - The static `TPM2` table describing the start method and control area of the TPM.
//!
//! ## `_PRS` Resource Templates
//!
//! The SSDT carries two named resource templates. `RESS` is small enough for its AML `PkgLength` to use the single
//! byte (short) encoding while `RESL` uses the multi-byte (long) encoding. The template that is patched is chosen by
//! the size of the interrupt list:
//!
//! ```text
//! Name (RESS, ResourceTemplate () {            // PkgLength <= 63
//!     Memory32Fixed (ReadWrite, 0xFED40000, 0x5000)
//!     Interrupt (ResourceConsumer, Level, ActiveLow, Shared) {1, 2, 3, 4, 5, 6, 7, 8, 9, 10}
//! })
//! Name (RESL, ResourceTemplate () {            // PkgLength > 63
//!     Memory32Fixed (ReadWrite, 0xFED40000, 0x5000)
//!     Interrupt (ResourceConsumer, Level, ActiveLow, Shared) {1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15}
//! })
//! ```
//!
//! ## Examples and Usage
//!
//! ```rust
//! use patina_tcg_acpi::{hid::TpmHid, table::SsdtTable};
//!
//! fn patch(template: Vec<u8>) -> patina_tcg_acpi::error::Result<Vec<u8>> {
//!     let mut table = SsdtTable::new(template)?;
//!     let hid: TpmHid = "MSFT0001".parse()?;
//!     table.patch_identifier_strings("1.3", &hid)?;
//!     let long_form = table.patch_interrupt_resource(&[0x24, 0x25], 15)?;
//!     log::info!("_PRS uses the {} form resource template", if long_form { "long" } else { "short" });
//!     table.update_checksum();
//!     Ok(table.into_bytes())
//! }
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![cfg_attr(all(not(feature = "std"), not(test), not(feature = "mockall")), no_std)]

extern crate alloc;

pub mod aml;
pub mod anchor;
pub mod component;
pub mod config;
pub mod error;
pub mod hid;
pub mod patch;
pub mod service;
pub mod table;
pub mod tpm2;
