//! Common utilities for TCG ACPI integration tests
//!
//! Builds SSDT images shaped like the output of the ASL compiler for the TPM device object.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use patina_tcg_acpi::table::AcpiDescriptionHeader;
use std::sync::Once;
use zerocopy::IntoBytes;

/// Interrupt slots compiled into `RESS`. `PkgLength` is 62, the largest single byte encoding that fits.
pub const RESS_SLOTS: usize = 10;
/// Interrupt slots compiled into `RESL`. `PkgLength` is 83, a two byte encoding.
pub const RESL_SLOTS: usize = 15;

pub const NAME_OP: u8 = 0x08;
pub const BUFFER_OP: u8 = 0x11;
pub const STRING_PREFIX: u8 = 0x0D;
pub const BYTE_PREFIX: u8 = 0x0A;
pub const METHOD_OP: u8 = 0x14;
pub const RETURN_OP: u8 = 0xA4;
pub const NOOP_OP: u8 = 0xA3;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        // Default to no logging unless RUST_LOG environment variable is set
        let mut builder = env_logger::Builder::from_default_env();

        if std::env::var("RUST_LOG").is_err() {
            builder.filter_level(log::LevelFilter::Off);
        }

        builder.is_test(true).init();
    });
}

/// Builder for the AML following the SSDT header.
#[derive(Default)]
pub struct SsdtBuilder {
    oem_table_id: u64,
    body: Vec<u8>,
}

impl SsdtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Name (PPIV, "$PV")`
    pub fn pp_version_tag(mut self) -> Self {
        self.body.push(NAME_OP);
        self.body.extend_from_slice(b"PPIV");
        self.body.push(STRING_PREFIX);
        self.body.extend_from_slice(b"$PV\0");
        self
    }

    /// `Name (_HID, "NNNN0000")`
    pub fn hid_tag(mut self) -> Self {
        self.body.push(NAME_OP);
        self.body.extend_from_slice(b"_HID");
        self.body.push(STRING_PREFIX);
        self.body.extend_from_slice(b"NNNN0000\0");
        self
    }

    /// `Name (<name>, ResourceTemplate () { Memory32Fixed (...) Interrupt (...) {1, 2, ...} })`
    pub fn resource_template(mut self, name: &[u8; 4], slots: usize, long_form: bool) -> Self {
        let mut template = vec![0x86, 0x09, 0x00, 0x01, 0x00, 0x00, 0xD4, 0xFE, 0x00, 0x50, 0x00, 0x00];
        template.extend_from_slice(&[0x89, (2 + 4 * slots) as u8, 0x00, 0x0D, slots as u8]);
        for irq in 1..=slots as u32 {
            template.extend_from_slice(&irq.to_le_bytes());
        }
        template.extend_from_slice(&[0x79, 0x00]);

        self.body.push(NAME_OP);
        self.body.extend_from_slice(name);
        self.body.push(BUFFER_OP);
        if long_form {
            let length = 2 + 2 + template.len();
            self.body.extend_from_slice(&[0x40 | (length & 0x0F) as u8, (length >> 4) as u8]);
        } else {
            self.body.push((1 + 2 + template.len()) as u8);
        }
        self.body.extend_from_slice(&[BYTE_PREFIX, template.len() as u8]);
        self.body.extend_from_slice(&template);
        self
    }

    /// `Method (_PRS, 0, NotSerialized) { Return (<name>) }`
    pub fn prs_method(mut self, name: &[u8; 4]) -> Self {
        self.body.extend_from_slice(&[METHOD_OP, 0x0B]);
        self.body.extend_from_slice(b"_PRS");
        self.body.extend_from_slice(&[0x00, RETURN_OP]);
        self.body.extend_from_slice(name);
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn oem_table_id(mut self, oem_table_id: &[u8; 8]) -> Self {
        self.oem_table_id = u64::from_le_bytes(*oem_table_id);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header = AcpiDescriptionHeader {
            signature: u32::from_le_bytes(*b"SSDT"),
            length: (AcpiDescriptionHeader::SIZE + self.body.len()) as u32,
            revision: 2,
            oem_id: *b"MSFT  ",
            oem_table_id: self.oem_table_id,
            oem_revision: 0,
            creator_id: u32::from_le_bytes(*b"INTL"),
            creator_revision: 0x2023_0628,
            ..Default::default()
        };
        let mut table = header.as_bytes().to_vec();
        table.extend_from_slice(&self.body);
        table
    }
}

/// The TPM SSDT with every placeholder and both resource templates.
pub fn tpm_ssdt() -> Vec<u8> {
    SsdtBuilder::new()
        .pp_version_tag()
        .hid_tag()
        .resource_template(b"RESS", RESS_SLOTS, false)
        .resource_template(b"RESL", RESL_SLOTS, true)
        .prs_method(b"RESS")
        .build()
}

/// Offset of the first `pattern` after the header.
pub fn offset_of(table: &[u8], pattern: &[u8]) -> usize {
    AcpiDescriptionHeader::SIZE
        + table[AcpiDescriptionHeader::SIZE..]
            .windows(pattern.len())
            .position(|window| window == pattern)
            .expect("pattern present in table")
}

/// Offset of the `PkgLength` of the resource template `name`.
pub fn pkg_length_offset(table: &[u8], name: &[u8; 4]) -> usize {
    offset_of(table, name) + 5
}

pub fn irqs(count: usize) -> Vec<u32> {
    (0..count as u32).map(|i| 0x20 + i).collect()
}
