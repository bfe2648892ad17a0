//! Identifier String Patches
//!
//! The SSDT carries two placeholder strings that are replaced with platform values:
//!
//! - `"$PV"`: the Physical Presence interface version reported by `_DSM`.
//! - `"NNNN0000"`: the `_HID` of the TPM device.
//!
//! A replacement is written with its NUL terminator. Any bytes of the placeholder left over are overwritten with
//! `NoopOp` so the AML following the string is unchanged.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use crate::{
    aml::AML_NOOP_OP,
    anchor::Anchor,
    error::{Error, Result},
    hid::TpmHid,
    table,
};

/// Field width of the version string including its NUL terminator.
pub const PHYSICAL_PRESENCE_VERSION_SIZE: usize = 4;

/// Patches the Physical Presence interface version and then the `_HID` of the TPM.
///
/// All inputs are validated before the first byte of the table is written.
pub fn patch_identifier_strings(table: &mut [u8], pp_version: &str, hid: &TpmHid) -> Result<()> {
    validate_pp_version(pp_version)?;
    patch_pp_version(table, pp_version)?;
    patch_hid(table, hid)
}

/// Replaces the `"$PV"` placeholder with `pp_version`.
pub fn patch_pp_version(table: &mut [u8], pp_version: &str) -> Result<()> {
    validate_pp_version(pp_version)?;
    let offset = patch_string_tag(table, &Anchor::PP_VERSION, pp_version.as_bytes())?;
    log::debug!(target: "tcg_acpi", "TPM2 Physical Presence Interface Version patched at {:#x}", offset);
    Ok(())
}

/// Replaces the `"NNNN0000"` placeholder with `hid`.
///
/// A PNP ID is one character shorter than the placeholder, the final byte becomes `NoopOp`.
pub fn patch_hid(table: &mut [u8], hid: &TpmHid) -> Result<()> {
    match patch_string_tag(table, &Anchor::HID, hid.as_bytes()) {
        Ok(offset) => {
            log::info!("TPM2 ACPI _HID is patched to {}", hid);
            log::debug!(target: "tcg_acpi", "_HID placeholder at {:#x}, field width {}", offset, hid.field_width());
            Ok(())
        }
        Err(err) => {
            log::error!("TPM2 ACPI HID TAG for patch not found!");
            Err(err)
        }
    }
}

fn validate_pp_version(pp_version: &str) -> Result<()> {
    let bytes = pp_version.as_bytes();
    if bytes.len() >= PHYSICAL_PRESENCE_VERSION_SIZE || !bytes.iter().all(|c| c.is_ascii_graphic()) {
        log::error!("Physical Presence interface version {:?} does not fit the table", pp_version);
        return Err(Error::InvalidInput);
    }
    Ok(())
}

/// Overwrites the first match of `anchor` with `replacement`, a NUL and `NoopOp` filler.
///
/// Returns the offset of the anchor.
fn patch_string_tag(table: &mut [u8], anchor: &Anchor, replacement: &[u8]) -> Result<usize> {
    if replacement.len() >= anchor.pattern.len() {
        return Err(Error::InvalidInput);
    }

    let window = table::data_range(table)?;
    let offset = anchor.locate(table, window)?;

    let field = &mut table[offset..offset + anchor.pattern.len()];
    let (string, rest) = field.split_at_mut(replacement.len());
    string.copy_from_slice(replacement);
    rest[0] = 0;
    rest[1..].fill(AML_NOOP_OP);

    Ok(offset)
}
