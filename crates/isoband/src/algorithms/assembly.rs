use geo_types::Polygon;
use crate::{error::GeometryError, traits::GeometryRepairer, types::MatchedRings};

/// Build polygons from matched rings.
///
/// Outer-derived polygons come first in outer-ring order, followed by one
/// polygon per orphan hole in hole order. An orphan hole is reversed so that
/// it carries outer orientation. Every polygon goes through `repairer`, which
/// may split it into several parts.
pub fn assemble_polygons(
    matched: MatchedRings,
    repairer: &dyn GeometryRepairer,
) -> Vec<Result<Polygon<f64>, GeometryError>> {
    let from_groups = matched.groups.into_iter().map(|group| {
        let interiors = group.holes.iter().map(|h| h.to_line_string()).collect();
        Polygon::new(group.outer.to_line_string(), interiors)
    });

    let from_orphans = matched
        .orphans
        .into_iter()
        .map(|hole| Polygon::new(hole.reverse().to_line_string(), vec![]));

    from_groups
        .chain(from_orphans)
        .flat_map(|polygon| repairer.repair(polygon))
        .collect()
}
