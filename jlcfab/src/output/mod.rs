//! JLCPCB assembly outputs: BOM and component placement (CPL) CSV files.

pub mod bom;
pub mod cpl;

pub use bom::{group_bom, write_bom, BomLine};
pub use cpl::{placement_rows, write_placement, PlacementRow};

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Render a writer function into a string.
pub fn render<F>(write: F) -> Result<String, OutputError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), OutputError>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    String::from_utf8(buf).map_err(|e| OutputError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Shortest decimal form of a coordinate. Never prints `-0`.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
