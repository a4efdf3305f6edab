mod config;
mod rules;

pub use config::{ClassificationConfig, DEFAULT_VOLUME_RADII, DEFAULT_VOLUME_THRESHOLDS};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::collector::LayerResults;
use super::layers::GeometryId;

/// Severity bucket of one disruption dimension, 0 (none) to 5 (severe).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(pub u8);

impl Severity {
    pub const LOWEST: Severity = Severity(0);
    pub const HIGHEST: Severity = Severity(5);
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionDimension {
    StreetClass,
    TrafficVolume,
    Bus,
    Tram,
    CycleRoute,
}

impl DisruptionDimension {
    pub const ALL: [DisruptionDimension; 5] = [
        DisruptionDimension::StreetClass,
        DisruptionDimension::TrafficVolume,
        DisruptionDimension::Bus,
        DisruptionDimension::Tram,
        DisruptionDimension::CycleRoute,
    ];
}

/// Composite severity across all dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionProfile {
    pub street_class: Severity,
    pub traffic_volume: Severity,
    pub bus: Severity,
    pub tram: Severity,
    pub cycle_route: Severity,
}

impl DisruptionProfile {
    pub fn get(&self, dimension: DisruptionDimension) -> Severity {
        match dimension {
            DisruptionDimension::StreetClass => self.street_class,
            DisruptionDimension::TrafficVolume => self.traffic_volume,
            DisruptionDimension::Bus => self.bus,
            DisruptionDimension::Tram => self.tram,
            DisruptionDimension::CycleRoute => self.cycle_route,
        }
    }

    pub fn worst(&self) -> Severity {
        DisruptionDimension::ALL
            .into_iter()
            .map(|dimension| self.get(dimension))
            .max()
            .unwrap_or(Severity::LOWEST)
    }

    /// Keeps the higher severity of each dimension.
    pub fn merge_worst(&mut self, other: &DisruptionProfile) {
        self.street_class = self.street_class.max(other.street_class);
        self.traffic_volume = self.traffic_volume.max(other.traffic_volume);
        self.bus = self.bus.max(other.bus);
        self.tram = self.tram.max(other.tram);
        self.cycle_route = self.cycle_route.max(other.cycle_route);
    }
}

/// Classification of a whole geometry set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HankeDisruption {
    pub geometries: BTreeMap<GeometryId, DisruptionProfile>,
    pub profile: DisruptionProfile,
    pub worst: Severity,
}

/// Stateless classifier applying [`ClassificationConfig`] to collected layers.
#[derive(Debug, Clone, Default)]
pub struct DisruptionClassifier {
    config: ClassificationConfig,
}

impl DisruptionClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn classify(&self, geometry: GeometryId, results: &LayerResults) -> DisruptionProfile {
        let street_class = rules::street_class(geometry, results);

        DisruptionProfile {
            street_class: rules::street_class_severity(street_class),
            traffic_volume: rules::traffic_volume_severity(
                geometry,
                street_class,
                results,
                &self.config,
            ),
            bus: rules::bus_severity(geometry, results),
            tram: rules::tram_severity(geometry, results),
            cycle_route: rules::cycle_route_severity(geometry, results),
        }
    }

    /// Classifies each geometry and keeps the worst value per dimension.
    /// An empty geometry set yields the all-lowest profile.
    pub fn classify_hanke(
        &self,
        results: &LayerResults,
        geometries: &BTreeSet<GeometryId>,
    ) -> HankeDisruption {
        let mut profile = DisruptionProfile::default();
        let mut per_geometry = BTreeMap::new();

        for geometry in geometries {
            let classified = self.classify(*geometry, results);
            profile.merge_worst(&classified);
            per_geometry.insert(*geometry, classified);
        }

        HankeDisruption {
            geometries: per_geometry,
            worst: profile.worst(),
            profile,
        }
    }
}
