//! KiCad PCB footprint extraction
//!
//! Walks the top level of a `.kicad_pcb` document and turns every footprint
//! into a [`ComponentRecord`].
//!
//! Format details relied on:
//! - Footprints are `(footprint "Lib:Name" ...)` (KiCad 6+) or
//!   `(module Lib:Name ...)` (KiCad 5) directly under `(kicad_pcb ...)`
//! - `(layer "F.Cu")` and `(at x y [rotation])` are immediate children
//! - Reference and value live in `(fp_text reference "R1" ...)` and
//!   `(fp_text value "10k" ...)`; KiCad 7+ moved them to
//!   `(property "Reference" "R1")` / `(property "Value" "10k")`
//! - Supplier part numbers are user properties such as `(property "LCSC" "C25804")`

use std::collections::HashMap;
use std::path::Path;

use crate::designator::{DesignatorError, DesignatorRegistry};
use crate::parser::pcb_schema::*;
use crate::parser::sexp::{ParseError, SExp, SExpParser};
use thiserror::Error;

/// Placeholder for a missing reference or value.
pub const MISSING_TEXT: &str = "?";

const FOOTPRINT_TAGS: [&str; 2] = ["footprint", "module"];

#[derive(Debug, Error)]
pub enum PcbParseError {
    #[error("S-expression parse error: {0}")]
    SExpParse(#[from] ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid PCB format: {0}")]
    InvalidFormat(String),
    #[error("Malformed footprint '{footprint}': {reason}")]
    MalformedFootprint { footprint: String, reason: String },
    #[error(transparent)]
    Designator(#[from] DesignatorError),
}

/// Knobs for footprint extraction.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Property holding the supplier part number.
    pub part_number_field: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            part_number_field: "LCSC".to_string(),
        }
    }
}

/// Result of extracting a single footprint.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Component(ComponentRecord),
    /// No supplier part number; the designator was still reserved.
    Skipped { reference: String },
}

/// Records in document order plus the references left out of the output.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub components: Vec<ComponentRecord>,
    pub skipped: Vec<String>,
}

pub struct PcbParser;

impl PcbParser {
    /// Read and parse a `.kicad_pcb` file.
    pub fn parse_file(path: &Path) -> Result<SExp, PcbParseError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse board text and check that the root is `(kicad_pcb ...)`.
    pub fn parse_str(content: &str) -> Result<SExp, PcbParseError> {
        let root = SExpParser::new(content).parse()?;

        match root.tag() {
            Some("kicad_pcb") => Ok(root),
            Some(other) => Err(PcbParseError::InvalidFormat(format!(
                "Expected kicad_pcb, found {}",
                other
            ))),
            None => Err(PcbParseError::InvalidFormat(
                "Expected kicad_pcb root".to_string(),
            )),
        }
    }

    /// Extract every footprint with a fresh designator registry.
    pub fn walk(document: &SExp, options: &ExtractOptions) -> Result<WalkOutcome, PcbParseError> {
        let mut registry = DesignatorRegistry::new();
        Self::walk_with(document, &mut registry, options)
    }

    /// Extract every footprint, issuing designators from `registry`.
    pub fn walk_with(
        document: &SExp,
        registry: &mut DesignatorRegistry,
        options: &ExtractOptions,
    ) -> Result<WalkOutcome, PcbParseError> {
        let mut outcome = WalkOutcome::default();

        for node in document
            .children()
            .iter()
            .filter(|child| child.tag().is_some_and(|tag| FOOTPRINT_TAGS.contains(&tag)))
        {
            match Self::extract(node, registry, options)? {
                Extracted::Component(record) => outcome.components.push(record),
                Extracted::Skipped { reference } => outcome.skipped.push(reference),
            }
        }

        tracing::info!(
            "Extracted {} components ({} without {} part number)",
            outcome.components.len(),
            outcome.skipped.len(),
            options.part_number_field
        );
        Ok(outcome)
    }

    /// Extract one footprint sub-tree.
    ///
    /// The designator is reserved before the part number is checked, so
    /// skipped components still occupy their reference.
    pub fn extract(
        footprint: &SExp,
        registry: &mut DesignatorRegistry,
        options: &ExtractOptions,
    ) -> Result<Extracted, PcbParseError> {
        let name = footprint
            .children()
            .first()
            .and_then(|n| n.as_atom())
            .ok_or_else(|| PcbParseError::InvalidFormat("Footprint without a name".to_string()))?
            .to_string();

        let layer = Self::parse_layer(footprint, &name)?;
        let position = Self::parse_at(footprint, &name)?;
        let texts = Self::collect_fields(footprint, "fp_text", &name)?;
        let properties = Self::collect_fields(footprint, "property", &name)?;

        let reference = Self::text_or_property(&texts, &properties, "reference", "Reference");
        let value = Self::text_or_property(&texts, &properties, "value", "Value");
        let part_number = properties
            .get(options.part_number_field.as_str())
            .cloned()
            .unwrap_or_default();

        let unique_reference = registry.make_unique(&reference)?;

        if part_number.is_empty() {
            tracing::debug!(
                "Skipping {} ({}): no {} property",
                reference,
                name,
                options.part_number_field
            );
            return Ok(Extracted::Skipped { reference });
        }

        Ok(Extracted::Component(ComponentRecord {
            footprint: name,
            layer,
            position,
            reference,
            unique_reference,
            value,
            part_number,
        }))
    }

    fn parse_layer(footprint: &SExp, name: &str) -> Result<String, PcbParseError> {
        let mut layers = footprint.children_tagged("layer");
        let layer = layers
            .next()
            .ok_or_else(|| Self::malformed(name, "missing layer"))?;
        if layers.next().is_some() {
            tracing::warn!("Footprint {} declares more than one layer, using the first", name);
        }

        layer
            .children()
            .first()
            .and_then(|l| l.as_atom())
            .map(|l| l.to_string())
            .ok_or_else(|| Self::malformed(name, "empty layer declaration"))
    }

    fn parse_at(footprint: &SExp, name: &str) -> Result<Placement, PcbParseError> {
        let at = footprint
            .first_tagged("at")
            .ok_or_else(|| Self::malformed(name, "missing position"))?;

        let numbers: Vec<Option<f64>> = at
            .children()
            .iter()
            .take(3)
            .map(|n| n.as_atom().and_then(|s| s.parse().ok()))
            .collect();

        match numbers.as_slice() {
            [Some(x), Some(y), Some(rotation)] => Ok(Placement::with_rotation(*x, *y, *rotation)),
            [Some(x), Some(y), ..] => Ok(Placement::new(*x, *y)),
            _ => Err(Self::malformed(name, &format!("invalid position {}", at))),
        }
    }

    /// Map `(tag key value ...)` children by key. Later duplicates win.
    fn collect_fields(
        footprint: &SExp,
        tag: &str,
        name: &str,
    ) -> Result<HashMap<String, String>, PcbParseError> {
        let mut fields = HashMap::new();

        for item in footprint.children_tagged(tag) {
            match item.children() {
                [key, value, ..] => {
                    let (Some(key), Some(value)) = (key.as_atom(), value.as_atom()) else {
                        return Err(Self::malformed(name, &format!("invalid {} {}", tag, item)));
                    };
                    fields.insert(key.to_string(), value.to_string());
                }
                _ => return Err(Self::malformed(name, &format!("incomplete {} {}", tag, item))),
            }
        }

        Ok(fields)
    }

    fn text_or_property(
        texts: &HashMap<String, String>,
        properties: &HashMap<String, String>,
        text_key: &str,
        property_key: &str,
    ) -> String {
        texts
            .get(text_key)
            .or_else(|| properties.get(property_key))
            .cloned()
            .unwrap_or_else(|| MISSING_TEXT.to_string())
    }

    fn malformed(name: &str, reason: &str) -> PcbParseError {
        PcbParseError::MalformedFootprint {
            footprint: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
