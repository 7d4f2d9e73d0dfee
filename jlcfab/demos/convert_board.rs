//! Convert a KiCad board and print the generated BOM and placement list.

use jlcfab::prelude::*;
use std::path::Path;

fn main() -> Result<(), JlcFabError> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/sensor_board.kicad_pcb".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example convert_board [board.kicad_pcb] [rotations.cf]");
        std::process::exit(1);
    }

    let rotations = match args.next() {
        Some(table) => RotationTable::load(Path::new(&table))?,
        None => RotationTable::default(),
    };

    let content = std::fs::read_to_string(path)?;
    let conversion = JlcFabCore::convert_str(&content, &ExtractOptions::default(), &rotations)?;

    println!("BOM ({} lines):", conversion.bom_lines);
    print!("{}", conversion.bom_csv);
    println!();
    println!("Placement ({} components):", conversion.components.len());
    print!("{}", conversion.placement_csv);

    if !conversion.skipped.is_empty() {
        println!();
        println!("Skipped (no part number): {}", conversion.skipped.join(", "));
    }

    Ok(())
}
