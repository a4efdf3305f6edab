use std::collections::BTreeMap;

use super::super::categories::{CycleRouteClass, StreetClass, TramLaneType, TrunkLine};
use super::super::collector::LayerResults;
use super::super::layers::GeometryId;
use super::config::ClassificationConfig;
use super::Severity;

pub(crate) fn street_class(geometry: GeometryId, results: &LayerResults) -> Option<StreetClass> {
    let general = results
        .general_street_classes
        .get(&geometry)
        .and_then(|classes| classes.iter().max().copied());

    let class = general.or_else(|| {
        if flag(&results.public_street_areas, geometry) {
            results
                .street_classes
                .get(&geometry)
                .and_then(|classes| classes.iter().max().copied())
        } else {
            None
        }
    })?;

    if class == StreetClass::PlotStreetOrAccess
        && flag(&results.central_business_district, geometry)
    {
        Some(StreetClass::CentralPlotStreet)
    } else {
        Some(class)
    }
}

pub(crate) fn street_class_severity(class: Option<StreetClass>) -> Severity {
    class.map_or(Severity::LOWEST, |class| Severity(class.value()))
}

pub(crate) fn traffic_volume_severity(
    geometry: GeometryId,
    class: Option<StreetClass>,
    results: &LayerResults,
    config: &ClassificationConfig,
) -> Severity {
    let radius = config.radius_for(class);
    let peak = results
        .traffic_volumes
        .get(&radius)
        .and_then(|per_geometry| per_geometry.get(&geometry))
        .and_then(|volumes| volumes.iter().max().copied());

    match peak {
        Some(volume) => {
            let reached = config
                .volume_thresholds
                .iter()
                .filter(|threshold| volume >= **threshold)
                .count();
            Severity(reached as u8)
        }
        None => Severity::LOWEST,
    }
}

pub(crate) fn bus_severity(geometry: GeometryId, results: &LayerResults) -> Severity {
    if flag(&results.bus_critical_area, geometry) {
        return Severity::HIGHEST;
    }
    let Some(routes) = results.bus_routes.get(&geometry).filter(|routes| !routes.is_empty())
    else {
        return Severity::LOWEST;
    };

    let departures = routes
        .iter()
        .fold(0u32, |total, route| total.saturating_add(route.rush_hour));
    let trunk = routes.iter().map(|route| route.trunk).max();

    if trunk == Some(TrunkLine::Yes) {
        Severity(5)
    } else if trunk == Some(TrunkLine::Almost) || departures >= 21 {
        Severity(4)
    } else if departures >= 11 {
        Severity(3)
    } else if departures >= 5 {
        Severity(2)
    } else {
        Severity(1)
    }
}

pub(crate) fn tram_severity(geometry: GeometryId, results: &LayerResults) -> Severity {
    match results
        .tram_lanes
        .get(&geometry)
        .and_then(|lanes| lanes.iter().max())
    {
        Some(TramLaneType::Dedicated) => Severity(5),
        Some(TramLaneType::Shared) => Severity(4),
        None => Severity::LOWEST,
    }
}

pub(crate) fn cycle_route_severity(geometry: GeometryId, results: &LayerResults) -> Severity {
    match results
        .cycle_routes
        .get(&geometry)
        .and_then(|classes| classes.iter().max())
    {
        Some(CycleRouteClass::Priority) => Severity(5),
        Some(CycleRouteClass::Main) => Severity(4),
        Some(CycleRouteClass::NoRoute) | None => Severity::LOWEST,
    }
}

fn flag(layer: &BTreeMap<GeometryId, bool>, geometry: GeometryId) -> bool {
    layer.get(&geometry).copied().unwrap_or(false)
}
