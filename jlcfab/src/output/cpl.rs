//! Component placement list for pick-and-place.
//!
//! KiCad's Y axis points down, the assembly house expects it pointing up, so
//! Y is negated. Rotation is the footprint's own angle plus the correction
//! from the rotation table, emitted as-is (not wrapped to 0..360).

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use super::{format_number, OutputError};
use crate::parser::pcb_schema::ComponentRecord;
use crate::rotation::RotationTable;

pub const CPL_HEADER: [&str; 5] = ["Designator", "Mid X", "Mid Y", "Layer", "Rotation"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRow {
    pub designator: String,
    pub x: f64,
    pub y: f64,
    pub layer: &'static str,
    pub rotation: f64,
}

impl PlacementRow {
    pub fn from_record(record: &ComponentRecord, rotations: &RotationTable) -> Self {
        let offset = rotations.resolve(&record.footprint);
        Self {
            designator: record.unique_reference.clone(),
            x: record.position.x,
            y: -record.position.y,
            layer: record.side().as_str(),
            rotation: record.position.rotation.unwrap_or(0.0) + f64::from(offset),
        }
    }
}

/// Placement rows in record order.
pub fn placement_rows(records: &[ComponentRecord], rotations: &RotationTable) -> Vec<PlacementRow> {
    records
        .iter()
        .map(|record| PlacementRow::from_record(record, rotations))
        .collect()
}

pub fn write_placement<W: Write>(
    records: &[ComponentRecord],
    rotations: &RotationTable,
    writer: W,
) -> Result<(), OutputError> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CPL_HEADER)?;
    for row in placement_rows(records, rotations) {
        let (x, y, rotation) = (
            format_number(row.x),
            format_number(row.y),
            format_number(row.rotation),
        );
        csv_writer.write_record([
            row.designator.as_str(),
            x.as_str(),
            y.as_str(),
            row.layer,
            rotation.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
