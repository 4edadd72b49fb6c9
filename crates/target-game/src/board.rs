//! Board layout and the radial hit-test.
//!
//! The board is a circle centred on the origin with coordinates normalised to
//! `[-0.5, 0.5]` on both axes (Y pointing up). It is cut into `S` equal
//! angular slices, counter-clockwise from the positive X axis, and into rings
//! by a list of radius thresholds. Every (slice, ring) cell names a segment,
//! or an ordered list of segments sharing the cell as equal sub-wedges.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::TAU;

use crate::segments::MIN_ENABLED_SEGMENTS;

// ============================================================================
// Configuration
// ============================================================================

/// Contents of one (slice, ring) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Whole cell belongs to one segment
    Single(String),
    /// Cell split into equal sub-wedges, ordered counter-clockwise
    Split(Vec<String>),
}

impl Cell {
    /// All labels referenced by this cell.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Cell::Single(label) => vec![label.as_str()],
            Cell::Split(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

/// A named segment with its word list, as written in the board file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub name: String,
    /// Human-readable rule name shown next to the segment
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub words: Vec<String>,
}

/// Static board configuration (`content/board.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Ring thresholds, inspected in the given order
    pub ring_radii: Vec<f64>,
    /// `cells[slice][ring]`
    pub cells: Vec<Vec<Cell>>,
    pub segments: Vec<SegmentSpec>,
}

/// Error in a board configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    NoSlices,
    NoRings,
    InvalidRadius { ring: usize, radius: f64 },
    RingCountMismatch { slice: usize, expected: usize, found: usize },
    EmptySplit { slice: usize, ring: usize },
    UnknownLabel { slice: usize, ring: usize, label: String },
    DuplicateSegment(String),
    TooFewSegments(usize),
    ZeroCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::NoSlices => write!(f, "Board has no slices"),
            ConfigError::NoRings => write!(f, "Board has no rings"),
            ConfigError::InvalidRadius { ring, radius } => {
                write!(f, "Ring {} has invalid radius {}", ring, radius)
            }
            ConfigError::RingCountMismatch { slice, expected, found } => write!(
                f,
                "Slice {} has {} cells, expected one per ring ({})",
                slice, found, expected
            ),
            ConfigError::EmptySplit { slice, ring } => {
                write!(f, "Cell at slice {} ring {} has an empty sub-wedge list", slice, ring)
            }
            ConfigError::UnknownLabel { slice, ring, label } => write!(
                f,
                "Cell at slice {} ring {} references unknown segment \"{}\"",
                slice, ring, label
            ),
            ConfigError::DuplicateSegment(name) => write!(f, "Duplicate segment \"{}\"", name),
            ConfigError::TooFewSegments(n) => write!(
                f,
                "Board needs at least {} segments, found {}",
                MIN_ENABLED_SEGMENTS, n
            ),
            ConfigError::ZeroCapacity => write!(f, "Score tally capacity must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl BoardConfig {
    /// Parse and validate a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn slice_count(&self) -> usize {
        self.cells.len()
    }

    /// Check the layout is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cells.is_empty() {
            return Err(ConfigError::NoSlices);
        }
        if self.ring_radii.is_empty() {
            return Err(ConfigError::NoRings);
        }
        for (ring, &radius) in self.ring_radii.iter().enumerate() {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::InvalidRadius { ring, radius });
            }
        }

        let mut names = HashSet::new();
        for segment in &self.segments {
            if !names.insert(segment.name.as_str()) {
                return Err(ConfigError::DuplicateSegment(segment.name.clone()));
            }
        }
        if names.len() < MIN_ENABLED_SEGMENTS {
            return Err(ConfigError::TooFewSegments(names.len()));
        }

        for (slice, row) in self.cells.iter().enumerate() {
            if row.len() != self.ring_radii.len() {
                return Err(ConfigError::RingCountMismatch {
                    slice,
                    expected: self.ring_radii.len(),
                    found: row.len(),
                });
            }
            for (ring, cell) in row.iter().enumerate() {
                if matches!(cell, Cell::Split(labels) if labels.is_empty()) {
                    return Err(ConfigError::EmptySplit { slice, ring });
                }
                if let Some(label) = cell.labels().into_iter().find(|l| !names.contains(l)) {
                    return Err(ConfigError::UnknownLabel {
                        slice,
                        ring,
                        label: label.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Hit-test
// ============================================================================

/// Maps board points to segment labels.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    ring_radii: Vec<f64>,
    cells: Vec<Vec<Cell>>,
}

impl TargetResolver {
    pub fn new(ring_radii: Vec<f64>, cells: Vec<Vec<Cell>>) -> Self {
        Self { ring_radii, cells }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.ring_radii.clone(), config.cells.clone())
    }

    pub fn slice_count(&self) -> usize {
        self.cells.len()
    }

    /// Label of the segment under `(x, y)`, or `None` for a miss.
    ///
    /// The origin resolves through slice 0 (`atan2(0, 0) == 0`). Non-finite
    /// coordinates are always a miss. A point lying exactly on a ring
    /// threshold belongs to the next ring out.
    pub fn resolve(&self, x: f64, y: f64) -> Option<&str> {
        if !x.is_finite() || !y.is_finite() {
            tracing::debug!("Ignoring non-finite board point ({}, {})", x, y);
            return None;
        }

        let slice_count = self.cells.len();
        if slice_count == 0 {
            tracing::error!("Board has no slices configured");
            return None;
        }

        let angle = normalize_angle(y.atan2(x));
        let distance = x.hypot(y);
        let slice = slice_index(angle, slice_count);
        let ring = self.ring_index(distance)?;

        let cell = match self.cells[slice].get(ring) {
            Some(cell) => cell,
            None => {
                tracing::error!("No cell configured for slice {} ring {}", slice, ring);
                return None;
            }
        };

        match cell {
            Cell::Single(label) => Some(label.as_str()),
            Cell::Split(labels) => {
                if labels.is_empty() {
                    tracing::error!("Empty sub-wedge list at slice {} ring {}", slice, ring);
                    return None;
                }
                let slice_arc = TAU / slice_count as f64;
                let slice_start = slice as f64 / slice_count as f64 * TAU;
                let sub_arc = slice_arc / labels.len() as f64;
                let sub = clamp_index(((angle - slice_start) / sub_arc).floor(), labels.len());
                Some(labels[sub].as_str())
            }
        }
    }

    /// First ring whose threshold is strictly greater than `distance`.
    fn ring_index(&self, distance: f64) -> Option<usize> {
        self.ring_radii.iter().position(|&radius| radius > distance)
    }
}

/// Bring an `atan2` result into `[0, 2π)`.
fn normalize_angle(angle: f64) -> f64 {
    let angle = if angle < 0.0 { angle + TAU } else { angle };
    // -ε + 2π can round up to exactly 2π
    if angle >= TAU { 0.0 } else { angle }
}

fn slice_index(angle: f64, slice_count: usize) -> usize {
    clamp_index((angle / TAU * slice_count as f64).floor(), slice_count)
}

fn clamp_index(value: f64, len: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        (value as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(label: &str) -> Cell {
        Cell::Single(label.to_string())
    }

    fn split(labels: &[&str]) -> Cell {
        Cell::Split(labels.iter().map(|l| l.to_string()).collect())
    }

    fn segment(name: &str) -> SegmentSpec {
        SegmentSpec {
            name: name.to_string(),
            title: None,
            words: vec![],
        }
    }

    /// 8 slices, one ring; slice 3 is "ja", the rest "s0".."s7".
    fn eight_slice_resolver() -> TargetResolver {
        let cells = (0..8)
            .map(|i| {
                if i == 3 {
                    vec![single("ja")]
                } else {
                    vec![single(&format!("s{}", i))]
                }
            })
            .collect();
        TargetResolver::new(vec![1.0], cells)
    }

    fn point(angle: f64, distance: f64) -> (f64, f64) {
        (distance * angle.cos(), distance * angle.sin())
    }

    #[test]
    fn test_concrete_slice_scenario() {
        let resolver = eight_slice_resolver();
        let theta = 3.5 * TAU / 8.0;
        let (x, y) = point(theta, 0.5);
        assert_eq!(resolver.resolve(x, y), Some("ja"));
    }

    #[test]
    fn test_outside_all_rings_is_miss() {
        let resolver = TargetResolver::new(
            vec![0.2, 0.45],
            (0..4).map(|i| vec![single(&format!("in{}", i)), single(&format!("out{}", i))]).collect(),
        );
        for step in 0..72 {
            let angle = step as f64 * TAU / 72.0;
            for distance in [0.4501, 0.5, 0.7, 10.0] {
                let (x, y) = point(angle, distance);
                assert_eq!(resolver.resolve(x, y), None, "angle {} distance {}", angle, distance);
            }
        }
    }

    #[test]
    fn test_inner_ring_matches_cell_mapping() {
        let cells: Vec<Vec<Cell>> = vec![
            vec![single("a"), single("x")],
            vec![split(&["b1", "b2"]), single("x")],
            vec![single("c"), single("x")],
            vec![split(&["d1", "d2", "d3"]), single("x")],
        ];
        let resolver = TargetResolver::new(vec![0.3, 0.5], cells.clone());

        for (slice, row) in cells.iter().enumerate() {
            for step in 1..20 {
                let angle = (slice as f64 + step as f64 / 20.0) * TAU / 4.0;
                let (x, y) = point(angle, 0.1);
                let label = resolver.resolve(x, y).expect("inner ring should hit");
                assert!(row[0].labels().contains(&label), "slice {} got {}", slice, label);
            }
        }
    }

    #[test]
    fn test_sub_wedge_selection() {
        let resolver = TargetResolver::new(
            vec![0.5],
            vec![
                vec![split(&["first", "second"])],
                vec![single("other")],
            ],
        );
        // Slice 0 spans [0, π); sub-wedges split at π/2
        let (x, y) = point(0.25 * std::f64::consts::PI, 0.3);
        assert_eq!(resolver.resolve(x, y), Some("first"));
        let (x, y) = point(0.75 * std::f64::consts::PI, 0.3);
        assert_eq!(resolver.resolve(x, y), Some("second"));
        let (x, y) = point(1.5 * std::f64::consts::PI, 0.3);
        assert_eq!(resolver.resolve(x, y), Some("other"));
    }

    #[test]
    fn test_angle_wrap_invariance() {
        let resolver = TargetResolver::new(
            vec![0.6],
            (0..6).map(|i| vec![split(&[&format!("a{}", i), &format!("b{}", i)])]).collect(),
        );
        for step in 0..50 {
            let theta = step as f64 * TAU / 50.0 + 0.01;
            let (x1, y1) = point(theta, 0.5);
            let (x2, y2) = point(theta + TAU, 0.5);
            assert_eq!(resolver.resolve(x1, y1), resolver.resolve(x2, y2), "theta {}", theta);
        }
    }

    #[test]
    fn test_origin_resolves_to_slice_zero() {
        let resolver = eight_slice_resolver();
        assert_eq!(resolver.resolve(0.0, 0.0), Some("s0"));
    }

    #[test]
    fn test_non_finite_is_miss() {
        let resolver = eight_slice_resolver();
        assert_eq!(resolver.resolve(f64::NAN, 0.1), None);
        assert_eq!(resolver.resolve(0.1, f64::INFINITY), None);
    }

    #[test]
    fn test_negative_zero_angle_wraps_to_first_slice() {
        let resolver = eight_slice_resolver();
        // atan2(-0.0, x) is -0.0, and tiny negative angles must not land on slice S
        assert_eq!(resolver.resolve(0.3, -0.0), Some("s0"));
        assert_eq!(resolver.resolve(0.3, -1e-18), Some("s0"));
    }

    #[test]
    fn test_boundary_distance_belongs_to_next_ring() {
        let resolver = TargetResolver::new(vec![0.2, 0.4], vec![vec![single("in"), single("out")]]);
        assert_eq!(resolver.resolve(0.2, 0.0), Some("out"));
        assert_eq!(resolver.resolve(0.4, 0.0), None);
    }

    #[test]
    fn test_missing_cell_is_miss() {
        let resolver = TargetResolver::new(vec![0.2, 0.4], vec![vec![single("in")]]);
        assert_eq!(resolver.resolve(0.3, 0.0), None);
        assert_eq!(TargetResolver::new(vec![0.5], vec![]).resolve(0.1, 0.1), None);
    }

    #[test]
    fn test_validate_rejects_unknown_label() {
        let config = BoardConfig {
            ring_radii: vec![0.5],
            cells: vec![vec![single("a")], vec![single("nope")]],
            segments: vec![segment("a"), segment("b")],
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownLabel {
                slice: 1,
                ring: 0,
                label: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_ring_mismatch_and_too_few_segments() {
        let config = BoardConfig {
            ring_radii: vec![0.2, 0.5],
            cells: vec![vec![single("a")]],
            segments: vec![segment("a"), segment("b")],
        };
        assert!(matches!(config.validate(), Err(ConfigError::RingCountMismatch { .. })));

        let config = BoardConfig {
            ring_radii: vec![0.5],
            cells: vec![vec![single("a")]],
            segments: vec![segment("a")],
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewSegments(1)));
    }

    #[test]
    fn test_parse_board_json() {
        let json = r#"{
            "ring_radii": [0.25, 0.5],
            "cells": [
                ["pril", ["n", "nn"]],
                ["pril", "prich"]
            ],
            "segments": [
                {"name": "pril", "title": "Прилагательные", "words": ["ветреный"]},
                {"name": "n", "words": ["кожаный"]},
                {"name": "nn", "words": ["деревянный"]},
                {"name": "prich", "words": ["кошенный"]}
            ]
        }"#;
        let config = BoardConfig::from_json(json).unwrap();
        assert_eq!(config.slice_count(), 2);
        assert_eq!(config.cells[0][1], split(&["n", "nn"]));
        assert_eq!(config.segments[0].title.as_deref(), Some("Прилагательные"));
    }
}
