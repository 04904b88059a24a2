//! # Contour Band Polygon Extraction Library
//!
//! Recovers valid polygons with holes from the raw rings of a filled-contour
//! computation over an unstructured triangular mesh. Each polygon carries
//! the value range of the band it came from.
//!
//! ## Core Features
//!
//! - **Orientation Classification**: Rings are split into outers and holes by signed area
//! - **Hole Matching**: Holes are assigned to enclosing outers regardless of ring order
//! - **Geometry Repair**: Self-intersecting results are rebuilt into valid parts
//! - **Partial Failure**: Unrepairable records are reported without aborting the run
//! - **GeoJSON Support**: Export records with `vmin`/`vmax` properties
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use isoband::{BandExtractor, ContourSet};
//!
//! let contours = ContourSet::from_json_file("contours.json")?;
//! let extraction = BandExtractor::builder().build().extract(&contours)?;
//!
//! for failure in &extraction.failures {
//!     eprintln!("band {}: {}", failure.band, failure.error);
//! }
//! extraction.save_geojson("bands.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Extractor
//!
//! ```rust,no_run
//! use isoband::{BandExtractor, algorithms::*};
//!
//! let extractor = BandExtractor::builder()
//!     .with_zero_area_policy(ZeroAreaPolicy::Outer)
//!     .with_shared_hole_policy(SharedHolePolicy::SmallestEnclosing)
//!     .parallel(true)
//!     .build();
//! ```

pub mod error;
pub mod types;
pub mod mesh;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod typed_geojson;

pub use error::{GeometryError, IsobandError, Result};
pub use types::{ContourSet, Extraction, GeometryRecord, RecordFailure, Ring, ValueRange};
pub use mesh::{linspace_levels, ScalarField, TriangleMesh, DEFAULT_FILL_VALUE};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{BandExtractor, builder::BandExtractorBuilder};
pub use io::records_from_geojson_str;

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::from(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    /// Two outers with one hole inside the second, the hole listed first.
    fn two_outer_band() -> Vec<Ring> {
        vec![
            rect(11.0, 1.0, 12.0, 2.0).reverse(),
            rect(0.0, 0.0, 4.0, 4.0),
            rect(10.0, 0.0, 14.0, 4.0),
        ]
    }

    fn contour_set(bands: Vec<Vec<Ring>>) -> ContourSet {
        let levels = (1..bands.len()).map(|l| l as f64).collect();
        ContourSet::new(0.0, bands.len() as f64, levels, bands)
    }

    #[test]
    fn test_two_outers_one_hole() {
        let set = contour_set(vec![Vec::new(), two_outer_band()]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        assert!(extraction.is_complete());
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].hole_count(), 0);
        assert_eq!(extraction.records[1].hole_count(), 1);
        assert!((extraction.records[0].area() - 16.0).abs() < 1e-12);
        assert!((extraction.records[1].area() - 15.0).abs() < 1e-12);
        for record in &extraction.records {
            assert_eq!(record.band, 1);
            assert_eq!(record.range, ValueRange::new(1.0, 2.0));
        }
    }

    #[test]
    fn test_short_rings_dropped() {
        let band = vec![Ring::from(vec![[0.0, 0.0], [1.0, 1.0]]), rect(0.0, 0.0, 1.0, 1.0)];
        let set = contour_set(vec![band]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        assert_eq!(extraction.records.len(), 1);
        assert!(extraction.is_complete());
    }

    #[test]
    fn test_orphan_hole_emitted_after_outers() {
        let stray = rect(20.0, 20.0, 21.0, 21.0).reverse();
        let set = contour_set(vec![vec![stray.clone(), rect(0.0, 0.0, 1.0, 1.0)]]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        assert_eq!(extraction.records.len(), 2);
        let orphan = &extraction.records[1].polygon;
        assert!(orphan.interiors().is_empty());
        assert_eq!(Ring::from_line_string(orphan.exterior()), stray.reverse());
        assert!((orphan.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_order_and_ranges() {
        let bands: Vec<Vec<Ring>> = (0..5)
            .map(|i| vec![rect(i as f64 * 10.0, 0.0, i as f64 * 10.0 + 1.0, 1.0)])
            .collect();
        let set = ContourSet::new(0.0, 10.0, vec![2.0, 4.0, 6.0, 8.0], bands);

        let sequential = BandExtractor::builder().build().extract(&set).expect("Should extract");
        let parallel = BandExtractor::builder().parallel(true).build().extract(&set).expect("Should extract");

        assert_eq!(sequential, parallel);
        let bands: Vec<usize> = sequential.records.iter().map(|r| r.band).collect();
        assert_eq!(bands, vec![0, 1, 2, 3, 4]);
        assert_eq!(sequential.records[0].range, ValueRange::new(0.0, 2.0));
        assert_eq!(sequential.records[2].range, ValueRange::new(4.0, 6.0));
        assert_eq!(sequential.records[4].range, ValueRange::new(8.0, 10.0));
    }

    #[test]
    fn test_degenerate_ring_flagged() {
        let collapsed = Ring::from(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        let set = contour_set(vec![vec![collapsed, rect(5.0, 5.0, 6.0, 6.0)]]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(
            extraction.failures[0].error,
            GeometryError::DegenerateOrientation { points: 3 }
        );
    }

    #[test]
    fn test_strict_mode_reports_invalid_record() {
        // Positive signed area, but the last edge crosses the first.
        let crossed = Ring::from(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [3.0, 4.0], [3.0, -1.0]]);
        assert!(crossed.signed_area() > 0.0);

        let set = contour_set(vec![vec![crossed.clone(), rect(10.0, 10.0, 11.0, 11.0)]]);
        let strict = BandExtractor::builder().strict().build().extract(&set).expect("Should extract");
        assert_eq!(strict.records.len(), 1);
        assert_eq!(strict.failures.len(), 1);
        assert!(matches!(strict.failures[0].error, GeometryError::InvalidGeometry { .. }));

        let repaired = BandExtractor::builder().build().extract(&set).expect("Should extract");
        assert!(repaired.is_complete());
        assert!(repaired.records.len() >= 2);
        for record in &repaired.records {
            assert_eq!(validate_polygon(&record.polygon), Ok(()));
        }
    }

    #[test]
    fn test_island_pond_inside_lake() {
        let band = vec![
            rect(0.0, 0.0, 10.0, 10.0),
            rect(1.0, 1.0, 9.0, 9.0).reverse(),
            rect(3.0, 3.0, 7.0, 7.0),
            rect(4.0, 4.0, 5.0, 5.0).reverse(),
        ];
        let set = contour_set(vec![band]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        assert!(extraction.is_complete());
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].hole_count(), 1);
        assert!((extraction.records[0].area() - 36.0).abs() < 1e-9);
        assert!((extraction.records[1].area() - 15.0).abs() < 1e-9);
        for record in &extraction.records {
            assert_eq!(validate_polygon(&record.polygon), Ok(()));
        }
    }

    #[test]
    fn test_unrepairable_record_reported() {
        let broken = Ring::from(vec![[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0]]);
        let set = contour_set(vec![vec![broken, rect(5.0, 5.0, 6.0, 6.0)]]);
        let extraction = BandExtractor::builder()
            .with_zero_area_policy(ZeroAreaPolicy::Outer)
            .build()
            .extract(&set)
            .expect("Should extract");

        assert_eq!(extraction.records.len(), 1);
        assert!((extraction.records[0].area() - 1.0).abs() < 1e-12);
        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].band, 0);
        assert_eq!(
            extraction.failures[0].error,
            GeometryError::InvalidGeometry { reason: "non-finite coordinate".to_string() }
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let set = contour_set(vec![two_outer_band()]);
        let extractor = BandExtractor::builder().build();
        let first = extractor.extract(&set).expect("Should extract");

        let rings: Vec<Ring> = first
            .records
            .iter()
            .flat_map(|r| {
                std::iter::once(r.polygon.exterior())
                    .chain(r.polygon.interiors())
                    .map(Ring::from_line_string)
            })
            .collect();
        let second = extractor.extract(&contour_set(vec![rings])).expect("Should extract");

        assert_eq!(first, second);
    }

    #[test]
    fn test_geojson_export() {
        let set = contour_set(vec![Vec::new(), two_outer_band()]);
        let extraction = BandExtractor::builder().build().extract(&set).expect("Should extract");

        let geojson = extraction.to_geojson().expect("Should create GeoJSON");
        assert_eq!(geojson.features.len(), 2);
        let props = geojson.features[1].properties.as_ref().expect("Has properties");
        assert_eq!(props.get("vmin").and_then(|v| v.as_f64()), Some(1.0));
        assert_eq!(props.get("vmax").and_then(|v| v.as_f64()), Some(2.0));
        assert_eq!(props.get("hole_count").and_then(|v| v.as_u64()), Some(1));

        let restored = records_from_geojson_str(&extraction.to_geojson_string().expect("Should serialize"))
            .expect("Should parse");
        assert_eq!(restored, extraction.records);

        let typed = extraction.to_typed_geojson();
        assert_eq!(typed.band_histogram(), vec![0, 2]);
        assert_eq!(typed.failure_count(), Some(0));
        assert_eq!(typed.features_in_range(1.5, 1.6).len(), 2);
        assert!(typed.features_in_range(5.0, 6.0).is_empty());
    }

    struct FixedBuilder(Vec<Vec<Ring>>);

    impl ContourBuilder for FixedBuilder {
        fn build(&self, mesh: &TriangleMesh, _field: &ScalarField, levels: &[f64]) -> Result<Vec<Vec<Ring>>> {
            if mesh.triangles.is_empty() {
                return Err(IsobandError::ContourBuilder("no triangles".to_string()));
            }
            assert_eq!(levels.len() + 1, self.0.len());
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_process_field_uses_valid_range() {
        let mesh = TriangleMesh::from_one_based(
            vec![0.0, 4.0, 4.0, 0.0],
            vec![0.0, 0.0, 4.0, 4.0],
            &[[1, 2, 3], [1, 3, 4]],
        )
        .expect("Should build mesh");
        let field = ScalarField::with_fill_value(vec![0.5, 1.5, 2.5, DEFAULT_FILL_VALUE], DEFAULT_FILL_VALUE);
        let builder = FixedBuilder(vec![vec![rect(0.0, 0.0, 1.0, 1.0)], vec![rect(2.0, 2.0, 3.0, 3.0)]]);

        let extraction = BandExtractor::builder()
            .build()
            .process_field(&builder, &mesh, &field, &[1.0])
            .expect("Should extract");

        assert_eq!(extraction.records[0].range, ValueRange::new(0.5, 1.0));
        assert_eq!(extraction.records[1].range, ValueRange::new(1.0, 2.5));
    }

    #[test]
    fn test_process_field_rejects_empty_field() {
        let mesh = TriangleMesh::new(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![[0, 1, 2]])
            .expect("Should build mesh");
        let field = ScalarField::new(vec![f64::NAN; 3]);
        let result = BandExtractor::builder()
            .build()
            .process_field(&FixedBuilder(vec![Vec::new()]), &mesh, &field, &[]);
        assert!(matches!(result, Err(IsobandError::EmptyField)));
    }
}
