//! Board-to-assembly-files conversion shared by the CLI and library users.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::output::{self, OutputError};
use crate::parser::pcb::{ExtractOptions, PcbParseError, PcbParser};
use crate::parser::pcb_schema::ComponentRecord;
use crate::rotation::{RotationError, RotationTable};

#[derive(Debug, thiserror::Error)]
pub enum JlcFabError {
    #[error("Parse error: {0}")]
    Parse(#[from] PcbParseError),
    #[error("Rotation table error: {0}")]
    Rotation(#[from] RotationError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Options for a conversion run.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Rotation table file; no corrections when unset.
    pub rotations: Option<PathBuf>,
    /// Where the CSV files go.
    pub output_dir: PathBuf,
    pub extract: ExtractOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            rotations: None,
            output_dir: PathBuf::from("."),
            extract: ExtractOptions::default(),
        }
    }
}

/// In-memory conversion result.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub components: Vec<ComponentRecord>,
    /// References without a part number, in board order.
    pub skipped: Vec<String>,
    pub bom_csv: String,
    pub placement_csv: String,
    pub bom_lines: usize,
}

/// Files written for one board.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub board: PathBuf,
    pub bom_file: PathBuf,
    pub placement_file: PathBuf,
    pub placed: usize,
    pub bom_lines: usize,
    pub skipped: Vec<String>,
}

/// Output file paths for `board` inside `output_dir`.
pub fn output_paths(board: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = board
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("board");
    (
        output_dir.join(format!("{}-bom.csv", stem)),
        output_dir.join(format!("{}-cpl.csv", stem)),
    )
}

pub struct JlcFabCore;

impl JlcFabCore {
    /// Convert board text into BOM and placement CSV bodies.
    pub fn convert_str(
        content: &str,
        extract: &ExtractOptions,
        rotations: &RotationTable,
    ) -> Result<Conversion, JlcFabError> {
        let document = PcbParser::parse_str(content)?;
        let outcome = PcbParser::walk(&document, extract)?;

        let bom_csv = output::render(|buf| output::write_bom(&outcome.components, buf))?;
        let placement_csv =
            output::render(|buf| output::write_placement(&outcome.components, rotations, buf))?;
        let bom_lines = output::group_bom(&outcome.components).len();

        Ok(Conversion {
            components: outcome.components,
            skipped: outcome.skipped,
            bom_csv,
            placement_csv,
            bom_lines,
        })
    }

    /// Convert a `.kicad_pcb` file and write `<stem>-bom.csv` and
    /// `<stem>-cpl.csv` into the output directory.
    pub fn generate(board: &Path, options: &GenerateOptions) -> Result<GenerateResult, JlcFabError> {
        let rotations = match &options.rotations {
            Some(path) => RotationTable::load(path)?,
            None => RotationTable::default(),
        };

        let content = std::fs::read_to_string(board)?;
        let conversion = Self::convert_str(&content, &options.extract, &rotations)?;

        if !options.output_dir.is_dir() {
            return Err(JlcFabError::Other(format!(
                "Output directory {} does not exist",
                options.output_dir.display()
            )));
        }

        let (bom_file, placement_file) = output_paths(board, &options.output_dir);
        std::fs::write(&bom_file, &conversion.bom_csv)?;
        std::fs::write(&placement_file, &conversion.placement_csv)?;
        tracing::info!(
            "Wrote {} and {}",
            bom_file.display(),
            placement_file.display()
        );

        Ok(GenerateResult {
            board: board.to_path_buf(),
            bom_file,
            placement_file,
            placed: conversion.components.len(),
            bom_lines: conversion.bom_lines,
            skipped: conversion.skipped,
        })
    }
}
