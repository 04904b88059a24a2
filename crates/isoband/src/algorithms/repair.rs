use geo::algorithm::line_intersection::LineIntersection;
use geo::sweep::{Cross, Intersections, LineOrPoint};
use geo::{Area, BooleanOps, BoundingRect, CoordsIter, Intersects};
use geo_types::{Line, LineString, MultiPolygon, Polygon, Rect};

use crate::{error::GeometryError, traits::GeometryRepairer};

fn invalid(reason: impl Into<String>) -> GeometryError {
    GeometryError::InvalidGeometry {
        reason: reason.into(),
    }
}

/// Check that a polygon is simple: closed rings of at least four
/// coordinates, finite coordinates, a non-empty exterior, no ring crossing
/// itself, no two rings crossing or overlapping and no hole nested in
/// another hole. Rings may touch at isolated points.
pub fn validate_polygon(polygon: &Polygon<f64>) -> Result<(), GeometryError> {
    if polygon.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(invalid("non-finite coordinate"));
    }

    let rings: Vec<&LineString<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();

    for ring in &rings {
        if ring.0.len() < 4 || !ring.is_closed() {
            return Err(invalid(format!("ring with {} coordinates", ring.0.len())));
        }
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    if shell.unsigned_area() == 0.0 {
        return Err(invalid("exterior encloses no area"));
    }

    check_segments(&rings)?;

    for (index, hole) in polygon.interiors().iter().enumerate() {
        if !hole.0.iter().any(|c| shell.intersects(c)) {
            return Err(invalid(format!("hole {index} lies outside the exterior")));
        }
    }

    check_nested_holes(polygon.interiors())
}

/// One edge of one ring, tagged so that sweep results can be traced back.
#[derive(Debug, Clone)]
struct RingSegment {
    ring: usize,
    index: usize,
    count: usize,
    line: Line<f64>,
}

impl RingSegment {
    fn is_adjacent(&self, other: &RingSegment) -> bool {
        let (i, j) = (self.index.min(other.index), self.index.max(other.index));
        j == i + 1 || (i == 0 && j + 1 == self.count)
    }
}

impl Cross for RingSegment {
    type Scalar = f64;

    fn line(&self) -> LineOrPoint<f64> {
        self.line.into()
    }
}

/// Zero-length edges from repeated vertices are skipped, which makes their
/// neighbours adjacent.
fn ring_segments(rings: &[&LineString<f64>]) -> Vec<RingSegment> {
    rings
        .iter()
        .enumerate()
        .flat_map(|(ring, line_string)| {
            let lines: Vec<Line<f64>> = line_string.lines().filter(|l| l.start != l.end).collect();
            let count = lines.len();
            lines
                .into_iter()
                .enumerate()
                .map(move |(index, line)| RingSegment { ring, index, count, line })
        })
        .collect()
}

fn is_overlap(intersection: &Line<f64>) -> bool {
    intersection.start != intersection.end
}

/// Sweep all edges of all rings once and reject the first intersection
/// that is not a shared vertex of neighbouring edges or an isolated touch
/// between two rings.
fn check_segments(rings: &[&LineString<f64>]) -> Result<(), GeometryError> {
    let segments = ring_segments(rings);

    for (a, b, intersection) in Intersections::from_iter(segments.iter()) {
        if a.ring == b.ring {
            let adjacent = a.is_adjacent(b);
            let hit = match intersection {
                LineIntersection::Collinear { intersection } => !adjacent || is_overlap(&intersection),
                LineIntersection::SinglePoint { .. } => !adjacent,
            };
            if hit {
                return Err(invalid(format!(
                    "ring {} crosses itself at segments {} and {}",
                    a.ring,
                    a.index.min(b.index),
                    a.index.max(b.index)
                )));
            }
        } else {
            let hit = match intersection {
                LineIntersection::Collinear { intersection } => is_overlap(&intersection),
                LineIntersection::SinglePoint { is_proper, .. } => is_proper,
            };
            if hit {
                return Err(invalid(format!(
                    "rings {} and {} cross",
                    a.ring.min(b.ring),
                    a.ring.max(b.ring)
                )));
            }
        }
    }

    Ok(())
}

fn rect_within(inner: &Rect<f64>, outer: &Rect<f64>) -> bool {
    inner.min().x >= outer.min().x
        && inner.min().y >= outer.min().y
        && inner.max().x <= outer.max().x
        && inner.max().y <= outer.max().y
}

/// Holes do not cross at this point, so a hole is nested when all of its
/// vertices lie inside or on another hole.
fn check_nested_holes(holes: &[LineString<f64>]) -> Result<(), GeometryError> {
    let bounds: Vec<Option<Rect<f64>>> = holes.iter().map(|h| h.bounding_rect()).collect();
    let areas: Vec<Polygon<f64>> = holes.iter().map(|h| Polygon::new(h.clone(), vec![])).collect();

    for (inner, hole) in holes.iter().enumerate() {
        for (outer, area) in areas.iter().enumerate() {
            let candidate = inner != outer
                && matches!((&bounds[inner], &bounds[outer]), (Some(i), Some(o)) if rect_within(i, o));
            if candidate && hole.0.iter().all(|c| area.intersects(c)) {
                return Err(invalid(format!("hole {inner} lies inside hole {outer}")));
            }
        }
    }

    Ok(())
}

/// Repairs invalid polygons with the zero-distance buffer contract: the
/// filled region is re-derived as the area enclosed by the exterior minus
/// the area enclosed by any hole. Crossing boundaries split into valid,
/// possibly multiple, parts and nested holes collapse into their container.
#[derive(Debug, Clone, Default)]
pub struct ZeroBufferRepairer;

impl GeometryRepairer for ZeroBufferRepairer {
    fn repair(&self, polygon: Polygon<f64>) -> Vec<Result<Polygon<f64>, GeometryError>> {
        let reason = match validate_polygon(&polygon) {
            Ok(()) => return vec![Ok(polygon)],
            Err(err) => err,
        };

        if polygon.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            tracing::warn!(%reason, "Polygon with non-finite coordinates cannot be repaired");
            return vec![Err(reason)];
        }

        let (exterior, interiors) = polygon.into_inner();
        let empty = MultiPolygon::new(Vec::new());
        let shell = MultiPolygon::new(vec![Polygon::new(exterior, vec![])]).union(&empty);
        let holes = interiors.into_iter().fold(empty, |acc, hole| {
            acc.union(&MultiPolygon::new(vec![Polygon::new(hole, vec![])]))
        });
        let rebuilt = shell.difference(&holes);
        tracing::warn!(%reason, parts = rebuilt.0.len(), "Repaired invalid polygon");

        rebuilt
            .0
            .into_iter()
            .map(|part| validate_polygon(&part).map(|()| part))
            .collect()
    }
}

/// Passes valid polygons through and rejects everything else.
#[derive(Debug, Clone, Default)]
pub struct StrictValidator;

impl GeometryRepairer for StrictValidator {
    fn repair(&self, polygon: Polygon<f64>) -> Vec<Result<Polygon<f64>, GeometryError>> {
        vec![validate_polygon(&polygon).map(|()| polygon)]
    }
}
