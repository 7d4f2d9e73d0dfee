//! Component records extracted from a KiCad board.

use serde::Serialize;

/// Board side a component is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    /// Layers whose name starts with `B` (`B.Cu`, `B.SilkS`, ...) are bottom side.
    pub fn from_layer(layer: &str) -> Self {
        if layer.starts_with('B') {
            Side::Bottom
        } else {
            Side::Top
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "Top",
            Side::Bottom => "Bottom",
        }
    }
}

/// Footprint anchor as declared by `(at x y [rotation])`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: Option<f64>,
}

impl Placement {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, rotation: None }
    }

    pub fn with_rotation(x: f64, y: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            rotation: Some(rotation),
        }
    }
}

/// One placed component with a supplier part number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRecord {
    /// Library-qualified footprint, e.g. `Package_TO_SOT_SMD:SOT-23`
    pub footprint: String,
    pub layer: String,
    pub position: Placement,
    /// Designator as written in the board file; may repeat across components.
    pub reference: String,
    /// Designator unique across the run.
    pub unique_reference: String,
    pub value: String,
    pub part_number: String,
}

impl ComponentRecord {
    pub fn side(&self) -> Side {
        Side::from_layer(&self.layer)
    }
}
