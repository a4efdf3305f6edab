//! Traffic disruption classification ("törmäystarkastelu").
//!
//! The collector fans one overlap query per spatial layer out to a
//! [`SpatialLayerSource`] and joins the per-geometry results; the classifier
//! turns those results into severity buckets and keeps the worst value per
//! dimension across a Hanke's geometries.

pub mod categories;
pub mod classifier;
pub mod collector;
pub mod csv_source;
pub mod layers;
pub mod router;

#[cfg(test)]
mod tests;

pub use categories::{BusRoute, CycleRouteClass, StreetClass, TramLaneType, TrunkLine};
pub use classifier::{
    ClassificationConfig, DisruptionClassifier, DisruptionDimension, DisruptionProfile,
    HankeDisruption, Severity,
};
pub use collector::{LayerResults, SpatialFeatureCollector};
pub use csv_source::{CsvLayerSource, CsvSourceError};
pub use layers::{
    GeometryId, GeometrySetId, LayerAttribute, LayerError, LayerQuery, LayerRow, SpatialLayer,
    SpatialLayerSource, VolumeRadius,
};
pub use router::disruption_router;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

/// Collects layer overlaps for a geometry set and classifies them.
pub struct DisruptionAssessor<S> {
    collector: SpatialFeatureCollector<S>,
    classifier: DisruptionClassifier,
}

impl<S> DisruptionAssessor<S>
where
    S: SpatialLayerSource,
{
    pub fn new(source: Arc<S>, config: ClassificationConfig) -> Self {
        let collector = SpatialFeatureCollector::new(source, config.volume_radii.clone());
        Self {
            collector,
            classifier: DisruptionClassifier::new(config),
        }
    }

    /// Classifies every geometry of the set that overlaps any layer.
    pub fn assess(&self, geometry_set: GeometrySetId) -> Result<HankeDisruption, LayerError> {
        let results = self.collector.collect(geometry_set)?;
        let geometries = results.geometry_ids();
        Ok(self.finish(geometry_set, &results, &geometries))
    }

    /// Classifies the given geometries; those without overlaps get the
    /// all-lowest profile.
    pub fn assess_geometries(
        &self,
        geometry_set: GeometrySetId,
        geometries: &BTreeSet<GeometryId>,
    ) -> Result<HankeDisruption, LayerError> {
        let results = self.collector.collect(geometry_set)?;
        Ok(self.finish(geometry_set, &results, geometries))
    }

    fn finish(
        &self,
        geometry_set: GeometrySetId,
        results: &LayerResults,
        geometries: &BTreeSet<GeometryId>,
    ) -> HankeDisruption {
        let disruption = self.classifier.classify_hanke(results, geometries);
        debug!(
            %geometry_set,
            geometries = geometries.len(),
            worst = %disruption.worst,
            "classified geometry set"
        );
        disruption
    }
}
