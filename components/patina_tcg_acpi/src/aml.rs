//! AML Encoding Support
//!
//! The small subset of the ACPI Machine Language (ACPI Specification, section 20) and resource descriptor (section 6.4)
//! encodings needed to patch a pre-compiled resource template in place. This is not an AML parser.
//!
//! ```text
//! DefBuffer   := BufferOp PkgLength BufferSize ByteList
//! BufferOp    := 0x11
//! PkgLength   := PkgLeadByte | <PkgLeadByte ByteData> | <PkgLeadByte ByteData ByteData> | ...
//! BufferSize  := ByteConst | WordConst | DWordConst
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
pub mod integer;
pub mod pkg_length;

pub use integer::AmlInteger;
pub use pkg_length::PkgLength;

pub const AML_BUFFER_OP: u8 = 0x11;
pub const AML_BYTE_PREFIX: u8 = 0x0A;
pub const AML_WORD_PREFIX: u8 = 0x0B;
pub const AML_DWORD_PREFIX: u8 = 0x0C;
pub const AML_STRING_PREFIX: u8 = 0x0D;
pub const AML_NAME_OP: u8 = 0x08;

/// Filler written over bytes released by a patch. The interpreter skips it.
pub const AML_NOOP_OP: u8 = 0xA3;

/// Large resource item `Memory32Fixed`.
pub const ACPI_MEMORY32_FIXED_DESCRIPTOR: u8 = 0x86;
/// Large resource item `Extended Interrupt`.
pub const ACPI_EXTENDED_INTERRUPT_DESCRIPTOR: u8 = 0x89;
/// Small resource item `End Tag` with a length of 1.
pub const ACPI_END_TAG_DESCRIPTOR: u8 = 0x79;

/// Full size of a `Memory32Fixed` descriptor.
pub const MEMORY32_FIXED_DESCRIPTOR_SIZE: usize = 12;
/// Size of the Extended Interrupt descriptor up to and including the interrupt table length.
pub const EXTENDED_INTERRUPT_HEADER_SIZE: usize = 5;
/// `End Tag` followed by its checksum byte.
pub const END_TAG_SIZE: usize = 2;

/// Bytes of a resource template that do not depend on the number of interrupts.
pub const RESOURCE_TEMPLATE_FIXED_SIZE: usize =
    MEMORY32_FIXED_DESCRIPTOR_SIZE + EXTENDED_INTERRUPT_HEADER_SIZE + END_TAG_SIZE;

/// Name segments are always four characters.
pub const NAME_SEG_SIZE: usize = 4;
