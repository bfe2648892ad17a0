//! Executable for patching a compiled TPM SSDT on the host.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use clap::Parser;
use patina_tcg_acpi::{hid::TpmHid, patch::MAX_PRS_INT_ENTRIES, table::SsdtTable};
use std::{
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
struct Args {
    /// Path for the input file containing the compiled SSDT.
    input_path: PathBuf,
    /// Optional path for the output file. If not specified, the input file is overwritten.
    #[arg(short, long)]
    output_path: Option<PathBuf>,
    /// Physical Presence interface version replacing "$PV".
    #[arg(long)]
    pp_version: Option<String>,
    /// TPM hardware ID replacing "NNNN0000", e.g. MSFT0101 or IFX0785.
    #[arg(long)]
    hid: Option<TpmHid>,
    /// Interrupt number reported by _PRS. May be repeated up to 15 times.
    #[arg(long = "irq", value_parser = parse_irq)]
    irqs: Vec<u32>,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Open the input file
    let mut file = File::open(Path::new(&args.input_path))?;

    // Read the file contents into a buffer
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let mut table = SsdtTable::new(buffer).map_err(to_io_error)?;

    if let Some(pp_version) = &args.pp_version {
        table.patch_pp_version(pp_version).map_err(to_io_error)?;
        println!("Physical Presence interface version patched to {}", pp_version);
    }

    if let Some(hid) = &args.hid {
        table.patch_hid(hid).map_err(to_io_error)?;
        println!("_HID patched to {}", hid);
    }

    if !args.irqs.is_empty() {
        let long_form = table.patch_interrupt_resource(&args.irqs, MAX_PRS_INT_ENTRIES).map_err(to_io_error)?;
        println!(
            "_PRS patched with {} interrupts using the {} resource template",
            args.irqs.len(),
            if long_form { "long form (RESL)" } else { "short form (RESS)" }
        );
    }

    table.update_checksum();

    let path = args.output_path.unwrap_or(args.input_path);
    let mut out = File::create(path)?;
    out.write_all(table.as_bytes())?;

    Ok(())
}

fn parse_irq(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("Invalid interrupt number {}: {}", value, e))
}

fn to_io_error(e: patina_tcg_acpi::error::Error) -> io::Error {
    eprintln!("Error patching table: {}", e);
    io::Error::new(io::ErrorKind::Other, e)
}
