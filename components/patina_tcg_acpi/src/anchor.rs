//! Patch Anchors
//!
//! An anchor is a fixed byte pattern compiled into the SSDT that marks the region to be patched. Anchors are found
//! by a bounded forward scan of the AML following the ACPI header.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::ops::Range;

use crate::aml::NAME_SEG_SIZE;
use crate::error::{Error, Result};

/// Minimum `_PRS` resource template size.
///
/// - 1 byte for BufferOp
/// - 1 byte for PkgLength
/// - 2 bytes for BufferSize
/// - 12 bytes for the Memory32Fixed descriptor
/// - 5 bytes for the Extended Interrupt descriptor
/// - 2 bytes for the End Tag
pub const TPM_PRS_RES_TEMPLATE_MIN_SIZE: usize = 1 + 1 + 2 + 12 + 5 + 2;

/// A byte pattern and the number of bytes that must remain in the table from the start of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub pattern: &'static [u8],
    pub reserve: usize,
}

impl Anchor {
    /// Physical Presence interface version string `"$PV"`, matched with its NUL terminator.
    pub const PP_VERSION: Anchor = Anchor { pattern: b"$PV\0", reserve: 4 };
    /// Placeholder `_HID` string, matched with its NUL terminator.
    pub const HID: Anchor = Anchor { pattern: b"NNNN0000\0", reserve: 9 };
    /// Resource template with a single byte `PkgLength`.
    pub const PRS_SHORT: Anchor =
        Anchor { pattern: b"RESS", reserve: NAME_SEG_SIZE + TPM_PRS_RES_TEMPLATE_MIN_SIZE };
    /// Resource template with a multi-byte `PkgLength`.
    pub const PRS_LONG: Anchor = Anchor { pattern: b"RESL", reserve: NAME_SEG_SIZE + TPM_PRS_RES_TEMPLATE_MIN_SIZE };

    /// Returns the offset of the first match of this anchor within `window`.
    ///
    /// A match at offset `o` is only considered when `o + reserve` does not pass `window.end`. The window is clamped
    /// to `data`, so nothing past the end of the buffer is ever read.
    pub fn locate(&self, data: &[u8], window: Range<usize>) -> Result<usize> {
        locate(data, window, self.pattern, self.reserve)
    }
}

/// Scans `data[window]` byte by byte for `pattern`.
pub fn locate(data: &[u8], window: Range<usize>, pattern: &[u8], reserve: usize) -> Result<usize> {
    if pattern.is_empty() {
        return Err(Error::InvalidInput);
    }

    let reserve = reserve.max(pattern.len());
    let end = window.end.min(data.len());
    let last = end.checked_sub(reserve).ok_or(Error::AnchorNotFound)?;
    if window.start > last {
        return Err(Error::AnchorNotFound);
    }

    data[window.start..last + pattern.len()]
        .windows(pattern.len())
        .position(|candidate| candidate == pattern)
        .map(|position| window.start + position)
        .ok_or(Error::AnchorNotFound)
}
