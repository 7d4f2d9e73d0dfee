//! Bill of materials grouped by supplier part number.
//!
//! Columns: `Comment,Designator,Footprint,LCSC`. The designator list is
//! always quoted; other fields only when they contain a delimiter, quote or
//! line break.

use std::collections::HashMap;
use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use super::OutputError;
use crate::parser::pcb_schema::ComponentRecord;

pub const BOM_HEADER: [&str; 4] = ["Comment", "Designator", "Footprint", "LCSC"];

/// One BOM row: every component sharing a part number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomLine {
    /// Value of the first component seen with this part number.
    pub comment: String,
    pub designators: Vec<String>,
    pub footprint: String,
    pub part_number: String,
}

/// Group records by part number, in order of first appearance.
pub fn group_bom(records: &[ComponentRecord]) -> Vec<BomLine> {
    let mut lines: Vec<BomLine> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.part_number.as_str()) {
            Some(&i) => lines[i].designators.push(record.unique_reference.clone()),
            None => {
                index.insert(&record.part_number, lines.len());
                lines.push(BomLine {
                    comment: record.value.clone(),
                    designators: vec![record.unique_reference.clone()],
                    footprint: record.footprint.clone(),
                    part_number: record.part_number.clone(),
                });
            }
        }
    }

    lines
}

pub fn write_bom<W: Write>(records: &[ComponentRecord], mut writer: W) -> Result<(), OutputError> {
    let header: Vec<_> = BOM_HEADER.iter().map(|h| (*h, QuoteStyle::Necessary)).collect();
    write_row(&mut writer, &header)?;

    for line in group_bom(records) {
        let designators = line.designators.join(",");
        write_row(
            &mut writer,
            &[
                (line.comment.as_str(), QuoteStyle::Necessary),
                (designators.as_str(), QuoteStyle::Always),
                (line.footprint.as_str(), QuoteStyle::Necessary),
                (line.part_number.as_str(), QuoteStyle::Necessary),
            ],
        )?;
    }

    writer.flush()?;
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[(&str, QuoteStyle)]) -> Result<(), OutputError> {
    let encoded = fields
        .iter()
        .map(|(field, style)| encode_field(field, *style))
        .collect::<Result<Vec<_>, _>>()?;
    writeln!(writer, "{}", encoded.join(","))?;
    Ok(())
}

/// CSV-encode a single field with the given quoting.
fn encode_field(field: &str, style: QuoteStyle) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    {
        let mut csv_writer = WriterBuilder::new()
            .quote_style(style)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        csv_writer.write_record([field])?;
        csv_writer.flush()?;
    }

    let mut encoded = String::from_utf8_lossy(&buf).into_owned();
    if encoded.ends_with('\n') {
        encoded.pop();
    }
    Ok(encoded)
}
