use geo_types::Polygon;
use crate::{
    error::{GeometryError, Result},
    mesh::{ScalarField, TriangleMesh},
    types::{ClassifiedRings, MatchedRings, Ring},
};

/// Trait for ring orientation classifiers
pub trait RingClassifier: Send + Sync {
    /// Split a band's rings into outers and holes, keeping input order
    fn classify(&self, rings: Vec<Ring>) -> ClassifiedRings;
}

/// Trait for assigning holes to the outer rings that enclose them
pub trait ContainmentMatcher: Send + Sync {
    /// Group holes with their outers; unclaimed holes become orphans
    fn match_holes(&self, outers: Vec<Ring>, holes: Vec<Ring>) -> MatchedRings;
}

/// Trait for turning a possibly self-intersecting polygon into valid parts
pub trait GeometryRepairer: Send + Sync {
    /// Return the polygon unchanged if valid, otherwise its repaired parts.
    /// A part that is still invalid is returned as an error on its own.
    fn repair(&self, polygon: Polygon<f64>) -> Vec<std::result::Result<Polygon<f64>, GeometryError>>;
}

/// Trait for the filled-contour routine that produces raw bands
pub trait ContourBuilder: Send + Sync {
    /// Return one ring list per band: below `levels[0]`, between each pair
    /// of levels, and above the last level
    fn build(&self, mesh: &TriangleMesh, field: &ScalarField, levels: &[f64]) -> Result<Vec<Vec<Ring>>>;
}
