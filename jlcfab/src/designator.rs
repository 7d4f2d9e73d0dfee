//! Run-scoped designator disambiguation.
//!
//! Board files can contain the same reference more than once (panelised
//! sub-sheets, copy-pasted blocks). Assembly houses reject duplicate
//! designators, so every reference handed out during a run goes through a
//! [`DesignatorRegistry`]. The first occurrence keeps its name; later ones get
//! the numeric suffix bumped by 100, 200, ... until a free name is found.

use std::collections::HashSet;
use thiserror::Error;

/// Offsets tried on collision: 100, 200, ..., 4900.
const OFFSET_STEP: u64 = 100;
const OFFSET_LIMIT: u64 = 5000;

#[derive(Debug, Error, PartialEq)]
pub enum DesignatorError {
    #[error("No free designator left for '{reference}' (offsets 100 to 4900 all taken)")]
    Exhausted { reference: String },
}

#[derive(Debug, Default, Clone)]
pub struct DesignatorRegistry {
    issued: HashSet<String>,
}

impl DesignatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a designator for `reference`, unique within this registry.
    pub fn make_unique(&mut self, reference: &str) -> Result<String, DesignatorError> {
        if self.issued.insert(reference.to_string()) {
            return Ok(reference.to_string());
        }

        let (prefix, base) = split_reference(reference);
        let candidate = (1..OFFSET_LIMIT / OFFSET_STEP)
            .map(|step| format!("{}{}", prefix, base.saturating_add(step * OFFSET_STEP)))
            .find(|candidate| !self.issued.contains(candidate))
            .ok_or_else(|| DesignatorError::Exhausted {
                reference: reference.to_string(),
            })?;

        tracing::debug!("Duplicate designator {} renamed to {}", reference, candidate);
        self.issued.insert(candidate.clone());
        Ok(candidate)
    }

    pub fn is_issued(&self, reference: &str) -> bool {
        self.issued.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// Split `R12` into `("R", 12)`. A missing or oversized suffix counts as 1.
fn split_reference(reference: &str) -> (&str, u64) {
    let digits_start = reference
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(reference.len());

    let (prefix, digits) = reference.split_at(digits_start);
    (prefix, digits.parse().unwrap_or(1))
}
