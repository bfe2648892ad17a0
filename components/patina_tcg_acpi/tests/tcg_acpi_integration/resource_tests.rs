//! `_PRS` resource template patch tests
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use crate::common::{
    init_logger, irqs, pkg_length_offset, tpm_ssdt, SsdtBuilder, NOOP_OP, RESL_SLOTS, RESS_SLOTS,
};
use patina_tcg_acpi::{
    aml::{AmlInteger, PkgLength},
    error::Error,
    patch::MAX_PRS_INT_ENTRIES,
    table::{checksum, AcpiDescriptionHeader, SsdtTable},
};

/// Decoded view of a patched resource template.
struct Template {
    pkg_offset: usize,
    pkg_length: PkgLength,
    buffer_size: AmlInteger,
}

impl Template {
    fn read(table: &[u8], name: &[u8; 4]) -> Self {
        let pkg_offset = pkg_length_offset(table, name);
        let pkg_length = PkgLength::decode(&table[pkg_offset..]).unwrap();
        let buffer_size = AmlInteger::decode(&table[pkg_offset + pkg_length.encoded_len()..]).unwrap();
        Self { pkg_offset, pkg_length, buffer_size }
    }

    fn end(&self) -> usize {
        self.pkg_offset + self.pkg_length.value() as usize
    }

    fn interrupt_offset(&self) -> usize {
        self.pkg_offset + self.pkg_length.encoded_len() + self.buffer_size.encoded_len() + 12
    }
}

#[test]
fn test_compiled_templates() {
    let table = tpm_ssdt();
    let ress = Template::read(&table, b"RESS");
    assert_eq!(ress.pkg_length, PkgLength::Short(62));
    let resl = Template::read(&table, b"RESL");
    assert!(resl.pkg_length.is_long());
    assert_eq!(resl.pkg_length.value(), 83);
    assert_eq!(&table[resl.pkg_offset..resl.pkg_offset + 2], &[0x43, 0x05]);
}

#[test]
fn test_length_invariant_for_every_count() {
    init_logger();
    for count in 0..=MAX_PRS_INT_ENTRIES {
        let original = tpm_ssdt();
        let mut table = SsdtTable::new(original.clone()).unwrap();
        let long_form = table.patch_interrupt_resource(&irqs(count), MAX_PRS_INT_ENTRIES).unwrap();
        assert_eq!(long_form, count > RESS_SLOTS, "count {count}");

        let bytes = table.as_bytes();
        assert_eq!(bytes.len(), original.len());
        assert_eq!(AcpiDescriptionHeader::read(bytes).unwrap().length() as usize, original.len());

        let name: &[u8; 4] = if long_form { b"RESL" } else { b"RESS" };
        let template = Template::read(bytes, name);
        let original_template = Template::read(&original, name);
        assert_eq!(template.pkg_length.encoded_len(), original_template.pkg_length.encoded_len());
        assert_eq!(template.buffer_size.encoded_len(), original_template.buffer_size.encoded_len());
        assert_eq!(
            template.pkg_length.value() as usize,
            template.pkg_length.encoded_len() + template.buffer_size.encoded_len() + 19 + 4 * count
        );
        assert_eq!(template.buffer_size.value() as usize, 19 + 4 * count);

        // Everything after the template region is unchanged.
        let region_end = original_template.end();
        assert_eq!(&bytes[region_end..], &original[region_end..]);
    }
}

#[test]
fn test_interrupts_and_filler_after_terminator() {
    init_logger();
    let original = tpm_ssdt();
    let mut table = SsdtTable::new(original.clone()).unwrap();
    assert_eq!(table.patch_interrupt_resource(&[0x24, 0x25, 0x26], MAX_PRS_INT_ENTRIES), Ok(false));

    let bytes = table.as_bytes();
    let template = Template::read(bytes, b"RESS");
    let interrupt = template.interrupt_offset();
    assert_eq!(&bytes[interrupt..interrupt + 5], &[0x89, 14, 0x00, 0x0D, 3]);
    assert_eq!(&bytes[interrupt + 5..interrupt + 17], &[0x24, 0, 0, 0, 0x25, 0, 0, 0, 0x26, 0, 0, 0]);
    assert_eq!(&bytes[interrupt + 17..interrupt + 19], &[0x79, 0x00]);
    assert_eq!(template.end(), interrupt + 19);

    let original_end = Template::read(&original, b"RESS").end();
    assert!(bytes[template.end()..original_end].iter().all(|byte| *byte == NOOP_OP));
    assert_eq!(original_end - template.end(), 4 * (RESS_SLOTS - 3));

    // RESL untouched.
    let resl = pkg_length_offset(&original, b"RESL") - 5;
    assert_eq!(&bytes[resl..], &original[resl..]);
}

#[test]
fn test_long_form_full_template() {
    init_logger();
    let original = tpm_ssdt();
    let mut table = SsdtTable::new(original.clone()).unwrap();
    assert_eq!(table.patch_interrupt_resource(&irqs(RESL_SLOTS), MAX_PRS_INT_ENTRIES), Ok(true));

    let bytes = table.as_bytes();
    let template = Template::read(bytes, b"RESL");
    assert_eq!(template.pkg_length.value(), 83);
    let interrupt = template.interrupt_offset();
    assert_eq!(bytes[interrupt + 4] as usize, RESL_SLOTS);
    assert_eq!(&bytes[interrupt + 5..interrupt + 9], &0x20u32.to_le_bytes());
    assert_eq!(&bytes[interrupt + 61..interrupt + 65], &0x2Eu32.to_le_bytes());

    // RESS untouched.
    let ress = pkg_length_offset(&original, b"RESS");
    assert_eq!(bytes[ress], 62);
    assert_eq!(&bytes[..pkg_length_offset(&original, b"RESL")], &original[..pkg_length_offset(&original, b"RESL")]);
}

#[test]
fn test_checksum_after_patch() {
    init_logger();
    let mut table = SsdtTable::new(tpm_ssdt()).unwrap();
    table.patch_identifier_strings("1.3", &"MSFT0101".parse().unwrap()).unwrap();
    table.patch_interrupt_resource(&irqs(12), MAX_PRS_INT_ENTRIES).unwrap();
    table.update_checksum();

    let bytes = table.as_bytes();
    assert_eq!(bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte)), 0);
    assert_eq!(checksum(bytes), bytes[AcpiDescriptionHeader::CHECKSUM_OFFSET]);
}

#[test]
fn test_insufficient_space() {
    init_logger();
    // RESS compiled with 4 slots has a PkgLength of 38.
    let original = SsdtBuilder::new()
        .resource_template(b"RESS", 4, false)
        .resource_template(b"RESL", RESL_SLOTS, true)
        .build();
    let mut table = SsdtTable::new(original.clone()).unwrap();

    assert_eq!(table.patch_interrupt_resource(&irqs(5), MAX_PRS_INT_ENTRIES), Err(Error::InsufficientSpace));
    assert_eq!(table.as_bytes(), original.as_slice());
}

#[test]
fn test_too_many_interrupts() {
    init_logger();
    let original = tpm_ssdt();
    let mut table = SsdtTable::new(original.clone()).unwrap();

    assert_eq!(table.patch_interrupt_resource(&irqs(16), 16), Err(Error::InvalidInput));
    assert_eq!(table.patch_interrupt_resource(&irqs(3), 2), Err(Error::InvalidInput));
    assert_eq!(table.as_bytes(), original.as_slice());
}

#[test]
fn test_missing_short_template_with_long_present() {
    init_logger();
    let original = SsdtBuilder::new().resource_template(b"RESL", RESL_SLOTS, true).build();
    let mut table = SsdtTable::new(original).unwrap();
    assert_eq!(table.patch_interrupt_resource(&irqs(12), MAX_PRS_INT_ENTRIES), Err(Error::AnchorNotFound));
}

#[test]
fn test_long_template_missing() {
    init_logger();
    let original = SsdtBuilder::new().resource_template(b"RESS", RESS_SLOTS, false).prs_method(b"RESS").build();
    let mut table = SsdtTable::new(original.clone()).unwrap();

    assert_eq!(table.patch_interrupt_resource(&irqs(11), MAX_PRS_INT_ENTRIES), Err(Error::AnchorNotFound));
    assert_eq!(table.as_bytes(), original.as_slice());
    assert_eq!(table.patch_interrupt_resource(&irqs(10), MAX_PRS_INT_ENTRIES), Ok(false));
}

#[test]
fn test_short_template_with_long_encoding() {
    init_logger();
    let original = SsdtBuilder::new()
        .resource_template(b"RESS", RESS_SLOTS, true)
        .resource_template(b"RESL", RESL_SLOTS, true)
        .build();
    let mut table = SsdtTable::new(original).unwrap();
    assert_eq!(table.patch_interrupt_resource(&irqs(1), MAX_PRS_INT_ENTRIES), Err(Error::UnsupportedEncoding));
}

#[test]
fn test_repatch_with_fewer_interrupts() {
    init_logger();
    let mut table = SsdtTable::new(tpm_ssdt()).unwrap();
    table.patch_interrupt_resource(&irqs(8), MAX_PRS_INT_ENTRIES).unwrap();
    let first = Template::read(table.as_bytes(), b"RESS").end();

    // The region covered by the new PkgLength is all that is left to patch.
    assert_eq!(table.patch_interrupt_resource(&irqs(9), MAX_PRS_INT_ENTRIES), Err(Error::InsufficientSpace));
    assert_eq!(table.patch_interrupt_resource(&irqs(2), MAX_PRS_INT_ENTRIES), Ok(false));

    let bytes = table.as_bytes();
    let second = Template::read(bytes, b"RESS");
    assert_eq!(second.pkg_length.value(), 30);
    assert!(bytes[second.end()..first].iter().all(|byte| *byte == NOOP_OP));
}
