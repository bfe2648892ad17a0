//! TCG ACPI Error Types
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt::Display;

use r_efi::efi;

/// A specialized [`Result`](core::result::Result) type for table patching and publication.
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The byte pattern marking the region to patch is not present in the table.
    AnchorNotFound,
    /// A `PkgLength`, integer or resource descriptor is not in one of the recognized shapes.
    UnsupportedEncoding,
    /// The patched content does not fit in the space of the original encoding.
    InsufficientSpace,
    /// A caller-supplied value is malformed or out of range.
    InvalidInput,
    /// The buffer is too short for an ACPI header or its declared length runs past the buffer.
    InvalidTable,
    /// A collaborating service failed.
    Efi(efi::Status),
}

impl From<efi::Status> for Error {
    fn from(value: efi::Status) -> Self {
        Error::Efi(value)
    }
}

impl From<Error> for efi::Status {
    fn from(value: Error) -> Self {
        match value {
            Error::AnchorNotFound => efi::Status::NOT_FOUND,
            Error::UnsupportedEncoding => efi::Status::UNSUPPORTED,
            Error::InsufficientSpace => efi::Status::INVALID_PARAMETER,
            Error::InvalidInput => efi::Status::INVALID_PARAMETER,
            Error::InvalidTable => efi::Status::BAD_BUFFER_SIZE,
            Error::Efi(status) => status,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::AnchorNotFound => write!(f, "Patch anchor not found in table."),
            Error::UnsupportedEncoding => write!(f, "Unsupported AML encoding."),
            Error::InsufficientSpace => write!(f, "Patched content exceeds the original encoded size."),
            Error::InvalidInput => write!(f, "Invalid patch input."),
            Error::InvalidTable => write!(f, "Invalid ACPI table buffer."),
            Error::Efi(status) => write!(f, "{status:?}"),
        }
    }
}

impl core::error::Error for Error {}
