use serde::{Deserialize, Serialize};

/// Street classification, ordered from least to most significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetClass {
    PlotStreetOrAccess,
    CentralPlotStreet,
    LocalCollector,
    RegionalCollector,
    MainStreetOrMotorway,
}

impl StreetClass {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "Tonttikatu tai ajoyhteys" => Some(StreetClass::PlotStreetOrAccess),
            "Kantakaupungin tonttikatu" => Some(StreetClass::CentralPlotStreet),
            "Paikallinen kokoojakatu" => Some(StreetClass::LocalCollector),
            "Alueellinen kokoojakatu" => Some(StreetClass::RegionalCollector),
            "Pääkatu tai moottoriväylä" => Some(StreetClass::MainStreetOrMotorway),
            _ => None,
        }
    }

    /// Numeric class 1..=5 used in configuration and severity buckets.
    pub const fn value(self) -> u8 {
        match self {
            StreetClass::PlotStreetOrAccess => 1,
            StreetClass::CentralPlotStreet => 2,
            StreetClass::LocalCollector => 3,
            StreetClass::RegionalCollector => 4,
            StreetClass::MainStreetOrMotorway => 5,
        }
    }

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(StreetClass::PlotStreetOrAccess),
            2 => Some(StreetClass::CentralPlotStreet),
            3 => Some(StreetClass::LocalCollector),
            4 => Some(StreetClass::RegionalCollector),
            5 => Some(StreetClass::MainStreetOrMotorway),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TramLaneType {
    Shared,
    Dedicated,
}

impl TramLaneType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "shared" => Some(TramLaneType::Shared),
            "dedicated" => Some(TramLaneType::Dedicated),
            _ => None,
        }
    }
}

/// Cycle route class. The layer is a union of two sources, so anything
/// unmapped falls back to [`CycleRouteClass::NoRoute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleRouteClass {
    #[default]
    NoRoute,
    Main,
    Priority,
}

impl CycleRouteClass {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "priority" => CycleRouteClass::Priority,
            "main" => CycleRouteClass::Main,
            _ => CycleRouteClass::NoRoute,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrunkLine {
    No,
    Almost,
    Yes,
}

impl TrunkLine {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "no" => Some(TrunkLine::No),
            "almost" => Some(TrunkLine::Almost),
            "yes" => Some(TrunkLine::Yes),
            _ => None,
        }
    }
}

/// Bus route passing through a geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusRoute {
    pub route_id: String,
    pub direction_id: i32,
    /// Departures during the busiest rush hour.
    pub rush_hour: u32,
    pub trunk: TrunkLine,
}
