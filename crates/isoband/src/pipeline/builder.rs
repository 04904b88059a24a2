use crate::{
    pipeline::BandExtractor,
    traits::{RingClassifier, ContainmentMatcher, GeometryRepairer},
    algorithms::{
        SignedAreaClassifier,
        WitnessPointMatcher,
        ZeroBufferRepairer,
        StrictValidator,
        ZeroAreaPolicy,
        SharedHolePolicy,
    },
};

/// Builder for creating band extractors with a fluent API
pub struct BandExtractorBuilder {
    classifier: Option<Box<dyn RingClassifier>>,
    matcher: Option<Box<dyn ContainmentMatcher>>,
    repairer: Option<Box<dyn GeometryRepairer>>,
    parallel: bool,
}

impl BandExtractorBuilder {
    /// Create a new extractor builder
    pub fn new() -> Self {
        Self {
            classifier: None,
            matcher: None,
            repairer: None,
            parallel: false,
        }
    }

    /// Set the ring classifier (replaces any existing one)
    pub fn set_classifier<C>(mut self, classifier: C) -> Self
    where
        C: RingClassifier + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Set the containment matcher (replaces any existing one)
    pub fn set_matcher<M>(mut self, matcher: M) -> Self
    where
        M: ContainmentMatcher + 'static,
    {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// Set the geometry repairer (replaces any existing one)
    pub fn set_repairer<R>(mut self, repairer: R) -> Self
    where
        R: GeometryRepairer + 'static,
    {
        self.repairer = Some(Box::new(repairer));
        self
    }

    /// Classify zero-area rings according to `policy`
    pub fn with_zero_area_policy(self, policy: ZeroAreaPolicy) -> Self {
        self.set_classifier(SignedAreaClassifier::new(policy))
    }

    /// Resolve holes claimed by several outers according to `policy`
    pub fn with_shared_hole_policy(self, policy: SharedHolePolicy) -> Self {
        self.set_matcher(WitnessPointMatcher::new(policy))
    }

    /// Report invalid polygons instead of repairing them
    pub fn strict(self) -> Self {
        self.set_repairer(StrictValidator)
    }

    /// Process bands on the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the extractor with default components if not specified
    pub fn build(self) -> BandExtractor {
        let classifier = self.classifier
            .unwrap_or_else(|| Box::new(SignedAreaClassifier::default()));

        let matcher = self.matcher
            .unwrap_or_else(|| Box::new(WitnessPointMatcher::default()));

        let repairer = self.repairer
            .unwrap_or_else(|| Box::new(ZeroBufferRepairer));

        BandExtractor::new(classifier, matcher, repairer, self.parallel)
    }
}

impl Default for BandExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
