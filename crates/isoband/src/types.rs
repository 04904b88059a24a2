use std::path::Path;

use geo::Area;
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, IsobandError, Result};

/// Closed 2D polyline. The closing segment from the last point back to the
/// first is implicit and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Ring {
    points: Vec<Coord<f64>>,
}

impl Ring {
    /// Create a ring, dropping a trailing point that repeats the first one.
    pub fn new(mut points: Vec<Coord<f64>>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rings with fewer than three points enclose nothing and are filtered
    /// out before classification.
    pub fn has_enough_points(&self) -> bool {
        self.points.len() >= 3
    }

    /// First vertex, used as the containment witness for holes.
    pub fn first(&self) -> Option<Coord<f64>> {
        self.points.first().copied()
    }

    /// Signed area of the enclosed region. Positive = CCW, negative = CW.
    pub fn signed_area(&self) -> f64 {
        if !self.has_enough_points() {
            return 0.0;
        }
        Polygon::new(self.to_line_string(), vec![]).signed_area()
    }

    pub fn unsigned_area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// New ring with the point order flipped, which flips its orientation.
    pub fn reverse(&self) -> Ring {
        Ring {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Explicitly closed line string, as geo expects for polygon rings.
    pub fn to_line_string(&self) -> LineString<f64> {
        let mut coords = self.points.clone();
        if let Some(&first) = self.points.first() {
            coords.push(first);
        }
        LineString::new(coords)
    }

    pub fn from_line_string(line: &LineString<f64>) -> Self {
        Self::new(line.0.clone())
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::new(points.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}

impl From<Ring> for Vec<[f64; 2]> {
    fn from(ring: Ring) -> Self {
        ring.points.into_iter().map(|c| [c.x, c.y]).collect()
    }
}

/// Field value interval covered by one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueRange {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }
}

/// A band's rings after orientation classification. Each list keeps the
/// relative order of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedRings {
    pub outers: Vec<Ring>,
    pub holes: Vec<Ring>,
    /// Zero-area rings the classifier refused to label.
    pub degenerate: Vec<Ring>,
}

/// An outer ring together with the holes it claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGroup {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedRings {
    /// One group per outer ring, in outer-ring order.
    pub groups: Vec<RingGroup>,
    /// Holes no outer claimed, in hole-ring order.
    pub orphans: Vec<Ring>,
}

/// Final output unit: one valid polygon and the value range of its band.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub polygon: Polygon<f64>,
    pub range: ValueRange,
    /// Index of the band the polygon was extracted from.
    pub band: usize,
}

impl GeometryRecord {
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    pub fn hole_count(&self) -> usize {
        self.polygon.interiors().len()
    }
}

/// A record that could not be produced, with the band it belonged to.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub band: usize,
    pub range: ValueRange,
    pub error: GeometryError,
}

/// Result of running the band extractor over a contour set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<GeometryRecord>,
    pub failures: Vec<RecordFailure>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn records_in_band(&self, band: usize) -> impl Iterator<Item = &GeometryRecord> {
        self.records.iter().filter(move |r| r.band == band)
    }
}

/// Raw output of a filled-contour computation: one ring list per band,
/// bands ordered by ascending level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    pub field_min: f64,
    pub field_max: f64,
    pub levels: Vec<f64>,
    pub bands: Vec<Vec<Ring>>,
}

impl ContourSet {
    pub fn new(field_min: f64, field_max: f64, levels: Vec<f64>, bands: Vec<Vec<Ring>>) -> Self {
        Self {
            field_min,
            field_max,
            levels,
            bands,
        }
    }

    /// Check that there is one band below, between and above the levels and
    /// that the levels ascend.
    pub fn validate(&self) -> Result<()> {
        if self.bands.len() != self.levels.len() + 1 {
            return Err(IsobandError::LevelBandMismatch {
                levels: self.levels.len(),
                bands: self.bands.len(),
            });
        }
        if self.levels.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(IsobandError::UnsortedLevels);
        }
        Ok(())
    }

    /// Value range of band `index`. The outermost bands are bounded by the
    /// field extremes rather than by a level.
    pub fn value_range(&self, index: usize) -> Option<ValueRange> {
        let last = self.bands.len().checked_sub(1)?;
        if index > last {
            return None;
        }
        let vmin = if index == 0 {
            self.field_min
        } else {
            *self.levels.get(index - 1)?
        };
        let vmax = if index == last {
            self.field_max
        } else {
            *self.levels.get(index)?
        };
        Some(ValueRange::new(vmin, vmax))
    }

    /// Value range of every band, in band order.
    pub fn value_ranges(&self) -> Result<Vec<ValueRange>> {
        self.validate()?;
        Ok((0..self.bands.len()).filter_map(|i| self.value_range(i)).collect())
    }

    pub fn ring_count(&self) -> usize {
        self.bands.iter().map(Vec::len).sum()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
