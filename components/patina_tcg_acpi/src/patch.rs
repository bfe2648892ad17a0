//! SSDT Patching
//!
//! In-place patches applied to the compiled TPM SSDT. Every patch works on the raw table bytes, only rewrites bytes
//! inside the definition block, and never changes the length of the table.
//!
//! A patch that fails may leave the table partially modified. Such a table must not be installed.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
pub mod identifier;
pub mod resource;

pub use identifier::{patch_hid, patch_identifier_strings, patch_pp_version};
pub use resource::{patch_interrupt_resource, MAX_PRS_INT_BUF_SIZE, MAX_PRS_INT_ENTRIES};
