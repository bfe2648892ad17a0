//! `_PRS` Interrupt Resource Patch
//!
//! Follows ACPI Specification
//!
//! - 6.4.3 Extended Interrupt Descriptor
//! - 19.3.3 ASL Resource Template
//! - 20 AML Specification
//!
//! to patch the `ResourceTemplate()` returned by the TPM `_PRS` method. The template holds a `Memory32Fixed`
//! descriptor, an Extended Interrupt descriptor and the End Tag appended by the compiler:
//!
//! ```text
//! NameSeg  BufferOp  PkgLength  BufferSize  Memory32Fixed  Interrupt header  Interrupts  EndTag  (NoopOp...)
//! "RESS"   0x11      1-4 bytes  2-5 bytes   12 bytes       5 bytes           4 * N       2
//! ```
//!
//! `PkgLength` and `BufferSize` are re-encoded for the new interrupt count without changing their encoded length.
//! The region originally covered by `PkgLength` keeps its size; whatever the new template no longer uses is filled
//! with `NoopOp`.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::{mem::size_of, ops::Range};

use crate::{
    aml::{
        AmlInteger, PkgLength, ACPI_END_TAG_DESCRIPTOR, ACPI_EXTENDED_INTERRUPT_DESCRIPTOR, AML_BUFFER_OP,
        AML_NOOP_OP, END_TAG_SIZE, EXTENDED_INTERRUPT_HEADER_SIZE, NAME_SEG_SIZE, RESOURCE_TEMPLATE_FIXED_SIZE,
    },
    anchor::Anchor,
    error::{Error, Result},
    table,
};

/// Maximum number of interrupts a resource template can be patched with.
pub const MAX_PRS_INT_ENTRIES: usize = 15;
/// Maximum interrupt buffer size for the `_PRS` interrupt resource.
pub const MAX_PRS_INT_BUF_SIZE: usize = MAX_PRS_INT_ENTRIES * size_of::<u32>();

/// A resource template found in the table, decoded but not yet modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResourceTemplate {
    /// Offset of the `PkgLength` lead byte.
    pkg_offset: usize,
    pkg_length: PkgLength,
    buffer_size: AmlInteger,
}

impl ResourceTemplate {
    /// Finds `anchor` and decodes the buffer object that follows the name.
    fn locate(table: &[u8], window: Range<usize>, anchor: &Anchor) -> Result<Self> {
        let boundary = window.end;
        let name = anchor.locate(table, window)?;

        let op_offset = name + NAME_SEG_SIZE;
        if table.get(op_offset) != Some(&AML_BUFFER_OP) {
            log::error!("Resource template {:?} is not a Buffer object.", anchor.pattern);
            return Err(Error::UnsupportedEncoding);
        }

        let pkg_offset = op_offset + 1;
        let pkg_length = PkgLength::decode(&table[pkg_offset..boundary])?;
        let buffer_size = AmlInteger::decode(&table[pkg_offset + pkg_length.encoded_len()..boundary])?;

        let template = Self { pkg_offset, pkg_length, buffer_size };
        if template.region_end() > boundary {
            log::error!("Resource template {:?} runs past the end of the table.", anchor.pattern);
            return Err(Error::UnsupportedEncoding);
        }

        Ok(template)
    }

    /// End of the region covered by the original `PkgLength`. `PkgLength` counts from its own lead byte.
    fn region_end(&self) -> usize {
        self.pkg_offset + self.pkg_length.value() as usize
    }

    /// `PkgLength` value needed to describe a template with `irq_size` bytes of interrupts.
    fn required_length(&self, irq_size: usize) -> usize {
        self.pkg_length.encoded_len() + self.buffer_size.encoded_len() + RESOURCE_TEMPLATE_FIXED_SIZE + irq_size
    }

    /// Computes the re-encoded fields for `irq_size` bytes of interrupts, failing if they do not fit.
    fn resize(&self, table: &[u8], irq_size: usize) -> Result<ResourcePatch> {
        let new_length = self.required_length(irq_size);
        let original_length = self.pkg_length.value() as usize;
        if new_length > original_length {
            log::error!(
                "Resource template needs {:#x} bytes but only {:#x} are available.",
                new_length,
                original_length
            );
            return Err(Error::InsufficientSpace);
        }

        let pkg_length = self.pkg_length.with_value(new_length as u32)?;
        let buffer_size = self.buffer_size.with_value((RESOURCE_TEMPLATE_FIXED_SIZE + irq_size) as u32)?;

        // 5 bytes for the interrupt descriptor header, 2 bytes for the End Tag.
        let interrupt_offset =
            self.pkg_offset + new_length - (EXTENDED_INTERRUPT_HEADER_SIZE + irq_size + END_TAG_SIZE);

        if table.get(interrupt_offset) != Some(&ACPI_EXTENDED_INTERRUPT_DESCRIPTOR) {
            log::error!("No Extended Interrupt descriptor at {:#x}.", interrupt_offset);
            return Err(Error::UnsupportedEncoding);
        }

        Ok(ResourcePatch {
            pkg_offset: self.pkg_offset,
            pkg_length,
            buffer_size,
            interrupt_offset,
            region_end: self.region_end(),
        })
    }
}

/// The validated new encoding of a resource template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResourcePatch {
    pkg_offset: usize,
    pkg_length: PkgLength,
    buffer_size: AmlInteger,
    interrupt_offset: usize,
    region_end: usize,
}

impl ResourcePatch {
    fn apply(&self, table: &mut [u8], irqs: &[u32]) -> Result<()> {
        let irq_size = irqs.len() * size_of::<u32>();

        // 1. PkgLength and BufferSize.
        let written = self.pkg_length.encode_into(&mut table[self.pkg_offset..self.region_end])?;
        self.buffer_size.encode_into(&mut table[self.pkg_offset + written..self.region_end])?;

        // 2. Extended Interrupt descriptor: length bits [7:0], interrupt table length and the interrupts.
        let descriptor = &mut table[self.interrupt_offset..self.region_end];
        descriptor[1] = (2 + irq_size) as u8;
        descriptor[4] = irqs.len() as u8;
        for (slot, irq) in descriptor[EXTENDED_INTERRUPT_HEADER_SIZE..].chunks_exact_mut(size_of::<u32>()).zip(irqs) {
            slot.copy_from_slice(&irq.to_le_bytes());
        }

        // 3. End Tag with a zero checksum.
        let end_tag = EXTENDED_INTERRUPT_HEADER_SIZE + irq_size;
        descriptor[end_tag] = ACPI_END_TAG_DESCRIPTOR;
        descriptor[end_tag + 1] = 0;

        // 4. Everything left of the original region becomes NoopOp.
        descriptor[end_tag + END_TAG_SIZE..].fill(AML_NOOP_OP);

        Ok(())
    }
}

/// Patches the interrupt list of the `_PRS` resource template.
///
/// `RESS`, whose `PkgLength` uses the single byte form, is patched when the new template fits in 63 bytes.
/// Otherwise `RESL`, whose `PkgLength` uses the multi-byte form, is patched. Returns `true` when `RESL` was used.
///
/// Every check happens before the first byte is written:
///
/// - [`Error::InvalidInput`]: more than `max_entries` (at most [`MAX_PRS_INT_ENTRIES`]) interrupts.
/// - [`Error::AnchorNotFound`]: the resource template needed is not in the table.
/// - [`Error::UnsupportedEncoding`]: the template is not a buffer of the expected shape.
/// - [`Error::InsufficientSpace`]: the new template is larger than the compiled one.
pub fn patch_interrupt_resource(table: &mut [u8], irqs: &[u32], max_entries: usize) -> Result<bool> {
    if irqs.len() > max_entries.min(MAX_PRS_INT_ENTRIES) {
        log::error!("{} interrupts exceed the supported maximum of {}.", irqs.len(), max_entries);
        return Err(Error::InvalidInput);
    }
    let irq_size = irqs.len() * size_of::<u32>();
    let window = table::data_range(table)?;

    // 1. Check the short form template can hold the interrupt buffer.
    let short = ResourceTemplate::locate(table, window.clone(), &Anchor::PRS_SHORT)?;
    if short.pkg_length.is_long() {
        log::error!("RESS does not use a single byte PkgLength.");
        return Err(Error::UnsupportedEncoding);
    }

    let (patch, long_form) = if short.required_length(irq_size) <= PkgLength::SHORT_MAX as usize {
        (short.resize(table, irq_size)?, false)
    } else {
        // 2. Use the long form template to hold a longer interrupt buffer.
        let long = ResourceTemplate::locate(table, window, &Anchor::PRS_LONG)?;
        if !long.pkg_length.is_long() {
            log::error!("RESL does not use a multi-byte PkgLength.");
            return Err(Error::UnsupportedEncoding);
        }
        (long.resize(table, irq_size)?, true)
    };

    log::debug!(
        target: "tcg_acpi",
        "Patching {} form resource template at {:#x}: PkgLength {:#x} -> {:#x}, {} interrupts.",
        if long_form { "long" } else { "short" },
        patch.pkg_offset,
        patch.region_end - patch.pkg_offset,
        patch.pkg_length.value(),
        irqs.len()
    );

    patch.apply(table, irqs)?;
    Ok(long_form)
}
