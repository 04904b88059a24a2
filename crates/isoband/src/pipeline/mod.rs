pub mod builder;

use rayon::prelude::*;
use crate::{
    algorithms::assemble_polygons,
    error::{GeometryError, IsobandError, Result},
    mesh::{ScalarField, TriangleMesh},
    traits::{ContainmentMatcher, ContourBuilder, GeometryRepairer, RingClassifier},
    types::{ContourSet, Extraction, GeometryRecord, RecordFailure, Ring, ValueRange},
};

/// Turns the raw bands of a filled-contour computation into valid polygons
/// tagged with their band's value range.
///
/// Each band runs classification, hole matching and polygon assembly in
/// that order. Bands are independent, so with `parallel` enabled they are
/// processed on the rayon pool; output always follows band order.
pub struct BandExtractor {
    classifier: Box<dyn RingClassifier>,
    matcher: Box<dyn ContainmentMatcher>,
    repairer: Box<dyn GeometryRepairer>,
    parallel: bool,
}

impl BandExtractor {
    /// Create a new extractor builder
    pub fn builder() -> builder::BandExtractorBuilder {
        builder::BandExtractorBuilder::new()
    }

    pub fn new(
        classifier: Box<dyn RingClassifier>,
        matcher: Box<dyn ContainmentMatcher>,
        repairer: Box<dyn GeometryRepairer>,
        parallel: bool,
    ) -> Self {
        Self {
            classifier,
            matcher,
            repairer,
            parallel,
        }
    }

    /// Extract every band of `contours`.
    pub fn extract(&self, contours: &ContourSet) -> Result<Extraction> {
        let ranges = contours.value_ranges()?;

        let per_band: Vec<Extraction> = if self.parallel {
            contours
                .bands
                .par_iter()
                .zip(ranges.par_iter())
                .enumerate()
                .map(|(i, (rings, &range))| self.extract_band(i, range, rings.clone()))
                .collect()
        } else {
            contours
                .bands
                .iter()
                .zip(&ranges)
                .enumerate()
                .map(|(i, (rings, &range))| self.extract_band(i, range, rings.clone()))
                .collect()
        };

        let mut extraction = Extraction::default();
        for band in per_band {
            extraction.records.extend(band.records);
            extraction.failures.extend(band.failures);
        }

        tracing::info!(
            bands = contours.bands.len(),
            records = extraction.records.len(),
            failures = extraction.failures.len(),
            "Extracted contour geometries"
        );

        Ok(extraction)
    }

    /// Run one band through the classify, match and assemble stages.
    pub fn extract_band(&self, band: usize, range: ValueRange, rings: Vec<Ring>) -> Extraction {
        let total = rings.len();
        let rings: Vec<Ring> = rings.into_iter().filter(Ring::has_enough_points).collect();
        let short = total - rings.len();

        let classified = self.classifier.classify(rings);
        let mut failures: Vec<RecordFailure> = classified
            .degenerate
            .iter()
            .map(|ring| {
                tracing::warn!(band, points = ring.len(), "Zero-area ring cannot be classified");
                RecordFailure {
                    band,
                    range,
                    error: GeometryError::DegenerateOrientation { points: ring.len() },
                }
            })
            .collect();

        let outers = classified.outers.len();
        let holes = classified.holes.len();
        let matched = self.matcher.match_holes(classified.outers, classified.holes);

        tracing::debug!(
            band,
            short,
            outers,
            holes,
            orphans = matched.orphans.len(),
            "Matched band rings"
        );

        let mut records = Vec::new();
        for polygon in assemble_polygons(matched, self.repairer.as_ref()) {
            match polygon {
                Ok(polygon) => records.push(GeometryRecord { polygon, range, band }),
                Err(error) => {
                    tracing::warn!(band, %error, "Dropping unrepairable polygon");
                    failures.push(RecordFailure { band, range, error });
                }
            }
        }

        Extraction { records, failures }
    }

    /// Mask `mesh` by `field`, contour it with `builder` at `levels` and
    /// extract the resulting bands.
    pub fn process_field(
        &self,
        builder: &dyn ContourBuilder,
        mesh: &TriangleMesh,
        field: &ScalarField,
        levels: &[f64],
    ) -> Result<Extraction> {
        let masked = mesh.masked(field)?;
        let (field_min, field_max) = field.range().ok_or(IsobandError::EmptyField)?;

        let bands = builder.build(&masked, field, levels)?;
        let contours = ContourSet::new(field_min, field_max, levels.to_vec(), bands);
        self.extract(&contours)
    }

    /// Get information about the extractor configuration
    pub fn info(&self) -> String {
        format!(
            "BandExtractor: 1 classifier, 1 matcher, 1 repairer, {}",
            if self.parallel { "parallel" } else { "sequential" }
        )
    }
}
