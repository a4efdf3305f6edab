use serde::{Deserialize, Serialize};

use super::super::categories::StreetClass;
use super::super::layers::VolumeRadius;

pub const DEFAULT_VOLUME_RADII: [VolumeRadius; 2] = [VolumeRadius(15), VolumeRadius(30)];
pub const DEFAULT_VOLUME_THRESHOLDS: [u32; 5] = [1, 500, 1500, 5000, 10000];

/// Tunables for the disruption classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Traffic volume radii to query, ascending. The smallest is used for
    /// minor streets and the largest from `wide_radius_from` upwards.
    pub volume_radii: Vec<VolumeRadius>,
    pub wide_radius_from: StreetClass,
    /// Lower bounds of severity buckets 1..=5, ascending.
    pub volume_thresholds: [u32; 5],
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            volume_radii: DEFAULT_VOLUME_RADII.to_vec(),
            wide_radius_from: StreetClass::LocalCollector,
            volume_thresholds: DEFAULT_VOLUME_THRESHOLDS,
        }
    }
}

impl ClassificationConfig {
    /// Sorts and deduplicates the radii; an empty list falls back to the defaults.
    pub fn with_radii(mut self, radii: impl IntoIterator<Item = VolumeRadius>) -> Self {
        let mut radii: Vec<VolumeRadius> = radii.into_iter().collect();
        radii.sort();
        radii.dedup();
        if radii.is_empty() {
            radii = DEFAULT_VOLUME_RADII.to_vec();
        }
        self.volume_radii = radii;
        self
    }

    pub fn narrow_radius(&self) -> VolumeRadius {
        self.volume_radii
            .first()
            .copied()
            .unwrap_or(DEFAULT_VOLUME_RADII[0])
    }

    pub fn wide_radius(&self) -> VolumeRadius {
        self.volume_radii
            .last()
            .copied()
            .unwrap_or(DEFAULT_VOLUME_RADII[1])
    }

    /// Radius whose volumes count for a geometry of the given street class.
    pub fn radius_for(&self, street_class: Option<StreetClass>) -> VolumeRadius {
        match street_class {
            Some(class) if class >= self.wide_radius_from => self.wide_radius(),
            _ => self.narrow_radius(),
        }
    }
}
