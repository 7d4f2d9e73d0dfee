//! jlcfab - JLCPCB assembly files from KiCad boards
//!
//! This library reads a KiCad `.kicad_pcb` file and produces the two files an
//! assembly order needs: a bill of materials grouped by supplier part number
//! and a component placement list with assembly-house rotations.
//!
//! # Quick Start
//!
//! ```no_run
//! use jlcfab::{GenerateOptions, JlcFabCore};
//! use std::path::Path;
//!
//! let result = JlcFabCore::generate(
//!     Path::new("design.kicad_pcb"),
//!     &GenerateOptions::default(),
//! ).unwrap();
//!
//! println!("{} parts placed, BOM in {}", result.placed, result.bom_file.display());
//! ```
//!
//! # Pipeline
//!
//! - **Parsing**: KiCad S-expressions into [`parser::SExp`]
//! - **Extraction**: one [`ComponentRecord`] per footprint with a part number,
//!   designators made unique by a [`DesignatorRegistry`]
//! - **Rotation**: per-footprint corrections from a [`RotationTable`]
//! - **Output**: grouped BOM and placement CSV files

pub mod core;
pub mod designator;
pub mod output;
pub mod parser;
pub mod rotation;

// Re-export main types
pub use crate::core::{output_paths, Conversion, GenerateOptions, GenerateResult, JlcFabCore, JlcFabError};
pub use designator::{DesignatorError, DesignatorRegistry};
pub use output::{BomLine, OutputError, PlacementRow};
pub use parser::pcb::{ExtractOptions, PcbParser, PcbParseError};
pub use parser::pcb_schema::{ComponentRecord, Placement, Side};
pub use rotation::{RotationError, RotationRule, RotationTable};

/// Parse a board file and extract its components (convenience wrapper).
pub fn extract_components(
    path: &std::path::Path,
    options: &ExtractOptions,
) -> Result<Vec<ComponentRecord>, JlcFabError> {
    let document = PcbParser::parse_file(path)?;
    Ok(PcbParser::walk(&document, options)?.components)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ComponentRecord, ExtractOptions, GenerateOptions, GenerateResult, JlcFabCore, JlcFabError,
        RotationTable,
    };
}
