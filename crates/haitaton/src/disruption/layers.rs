use std::fmt;

use serde::{Deserialize, Serialize};

/// Groups the work-area geometries of one Hanke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometrySetId(pub i64);

impl fmt::Display for GeometrySetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque id of a single work-area geometry; only used as a join key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryId(pub i64);

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buffer radius in metres of a traffic volume layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeRadius(pub u32);

impl fmt::Display for VolumeRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// Municipal spatial layers consulted by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialLayer {
    PublicStreetAreas,
    GeneralStreetClasses,
    StreetClasses,
    CentralBusinessDistrict,
    TrafficVolumes,
    BusCriticalArea,
    BusRoutes,
    TramLanes,
    CycleRoutes,
}

impl SpatialLayer {
    pub const ALL: [SpatialLayer; 9] = [
        SpatialLayer::PublicStreetAreas,
        SpatialLayer::GeneralStreetClasses,
        SpatialLayer::StreetClasses,
        SpatialLayer::CentralBusinessDistrict,
        SpatialLayer::TrafficVolumes,
        SpatialLayer::BusCriticalArea,
        SpatialLayer::BusRoutes,
        SpatialLayer::TramLanes,
        SpatialLayer::CycleRoutes,
    ];

    /// Name of the layer as published by the city's map service.
    pub const fn label(self) -> &'static str {
        match self {
            SpatialLayer::PublicStreetAreas => "ylre_parts",
            SpatialLayer::GeneralStreetClasses => "ylre_classes",
            SpatialLayer::StreetClasses => "street_classes",
            SpatialLayer::CentralBusinessDistrict => "central_business_area",
            SpatialLayer::TrafficVolumes => "volumes",
            SpatialLayer::BusCriticalArea => "critical_area",
            SpatialLayer::BusRoutes => "buses",
            SpatialLayer::TramLanes => "trams",
            SpatialLayer::CycleRoutes => "cycleways",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for SpatialLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed overlap query. Only traffic volume queries carry a radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerQuery {
    pub layer: SpatialLayer,
    pub radius: Option<VolumeRadius>,
}

impl LayerQuery {
    pub const fn layer(layer: SpatialLayer) -> Self {
        Self {
            layer,
            radius: None,
        }
    }

    pub const fn traffic_volumes(radius: VolumeRadius) -> Self {
        Self {
            layer: SpatialLayer::TrafficVolumes,
            radius: Some(radius),
        }
    }
}

impl fmt::Display for LayerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radius {
            Some(radius) => write!(f, "{}@{}", self.layer, radius),
            None => write!(f, "{}", self.layer),
        }
    }
}

/// Raw attribute of an overlapping layer feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum LayerAttribute {
    /// Presence column of area layers; `1` marks a hit.
    Flag(i64),
    /// Categorical code, e.g. a street class or tram lane type.
    Code(String),
    Volume(u32),
    BusRoute {
        route_id: String,
        direction_id: i32,
        rush_hour: u32,
        trunk: String,
    },
}

impl LayerAttribute {
    pub const fn kind(&self) -> &'static str {
        match self {
            LayerAttribute::Flag(_) => "flag",
            LayerAttribute::Code(_) => "code",
            LayerAttribute::Volume(_) => "volume",
            LayerAttribute::BusRoute { .. } => "bus_route",
        }
    }
}

/// One feature of a layer overlapping one work geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRow {
    pub feature_id: i64,
    pub geometry_id: GeometryId,
    pub attribute: LayerAttribute,
}

/// Source of spatial overlap rows. Implementations must run a true-overlap
/// test between each geometry of the set and the layer's features.
pub trait SpatialLayerSource: Send + Sync {
    fn overlapping(
        &self,
        query: &LayerQuery,
        geometry_set: GeometrySetId,
    ) -> Result<Vec<LayerRow>, LayerError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("illegal {layer} category `{code}`")]
    IllegalCategory { layer: SpatialLayer, code: String },
    #[error("{layer} returned a {found} attribute where {expected} was expected")]
    UnexpectedAttribute {
        layer: SpatialLayer,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{layer} query failed: {reason}")]
    Query { layer: SpatialLayer, reason: String },
    #[error("traffic volume query issued without a radius")]
    MissingRadius,
}
