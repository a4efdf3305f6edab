use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::categories::{BusRoute, CycleRouteClass, StreetClass, TramLaneType, TrunkLine};
use super::layers::{
    GeometryId, GeometrySetId, LayerAttribute, LayerError, LayerQuery, LayerRow, SpatialLayer,
    SpatialLayerSource, VolumeRadius,
};

/// Per-layer overlap results keyed by geometry id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerResults {
    pub public_street_areas: BTreeMap<GeometryId, bool>,
    pub general_street_classes: BTreeMap<GeometryId, BTreeSet<StreetClass>>,
    pub street_classes: BTreeMap<GeometryId, BTreeSet<StreetClass>>,
    pub central_business_district: BTreeMap<GeometryId, bool>,
    pub traffic_volumes: BTreeMap<VolumeRadius, BTreeMap<GeometryId, BTreeSet<u32>>>,
    pub bus_critical_area: BTreeMap<GeometryId, bool>,
    pub bus_routes: BTreeMap<GeometryId, BTreeSet<BusRoute>>,
    pub tram_lanes: BTreeMap<GeometryId, BTreeSet<TramLaneType>>,
    pub cycle_routes: BTreeMap<GeometryId, BTreeSet<CycleRouteClass>>,
}

impl LayerResults {
    /// Every geometry that overlapped at least one layer feature.
    pub fn geometry_ids(&self) -> BTreeSet<GeometryId> {
        let mut ids = BTreeSet::new();
        ids.extend(self.public_street_areas.keys());
        ids.extend(self.general_street_classes.keys());
        ids.extend(self.street_classes.keys());
        ids.extend(self.central_business_district.keys());
        for per_geometry in self.traffic_volumes.values() {
            ids.extend(per_geometry.keys());
        }
        ids.extend(self.bus_critical_area.keys());
        ids.extend(self.bus_routes.keys());
        ids.extend(self.tram_lanes.keys());
        ids.extend(self.cycle_routes.keys());
        ids
    }

    /// Volume sets of one geometry for every radius it overlapped.
    pub fn traffic_volumes_for(&self, geometry: GeometryId) -> BTreeMap<VolumeRadius, BTreeSet<u32>> {
        self.traffic_volumes
            .iter()
            .filter_map(|(radius, per_geometry)| {
                per_geometry
                    .get(&geometry)
                    .map(|volumes| (*radius, volumes.clone()))
            })
            .collect()
    }

    fn absorb(&mut self, query: &LayerQuery, rows: Vec<LayerRow>) -> Result<(), LayerError> {
        let layer = query.layer;
        match layer {
            SpatialLayer::PublicStreetAreas => merge_flags(&mut self.public_street_areas, layer, rows),
            SpatialLayer::CentralBusinessDistrict => {
                merge_flags(&mut self.central_business_district, layer, rows)
            }
            SpatialLayer::BusCriticalArea => merge_flags(&mut self.bus_critical_area, layer, rows),
            SpatialLayer::GeneralStreetClasses => {
                merge_codes(&mut self.general_street_classes, layer, rows, StreetClass::from_code)
            }
            SpatialLayer::StreetClasses => {
                merge_codes(&mut self.street_classes, layer, rows, StreetClass::from_code)
            }
            SpatialLayer::TramLanes => {
                merge_codes(&mut self.tram_lanes, layer, rows, TramLaneType::from_code)
            }
            SpatialLayer::CycleRoutes => merge_codes(&mut self.cycle_routes, layer, rows, |code| {
                Some(CycleRouteClass::from_code(code))
            }),
            SpatialLayer::TrafficVolumes => {
                let radius = query.radius.ok_or(LayerError::MissingRadius)?;
                let per_geometry = self.traffic_volumes.entry(radius).or_default();
                for row in rows {
                    match row.attribute {
                        LayerAttribute::Volume(volume) => {
                            per_geometry.entry(row.geometry_id).or_default().insert(volume);
                        }
                        other => return Err(unexpected(layer, "volume", &other)),
                    }
                }
                Ok(())
            }
            SpatialLayer::BusRoutes => {
                for row in rows {
                    let route = bus_route(layer, row.attribute)?;
                    self.bus_routes
                        .entry(row.geometry_id)
                        .or_default()
                        .insert(route);
                }
                Ok(())
            }
        }
    }
}

fn merge_flags(
    target: &mut BTreeMap<GeometryId, bool>,
    layer: SpatialLayer,
    rows: Vec<LayerRow>,
) -> Result<(), LayerError> {
    for row in rows {
        match row.attribute {
            LayerAttribute::Flag(value) => {
                *target.entry(row.geometry_id).or_default() |= value == 1;
            }
            other => return Err(unexpected(layer, "flag", &other)),
        }
    }
    Ok(())
}

fn merge_codes<T, F>(
    target: &mut BTreeMap<GeometryId, BTreeSet<T>>,
    layer: SpatialLayer,
    rows: Vec<LayerRow>,
    parse: F,
) -> Result<(), LayerError>
where
    T: Ord,
    F: Fn(&str) -> Option<T>,
{
    for row in rows {
        let code = match row.attribute {
            LayerAttribute::Code(code) => code,
            other => return Err(unexpected(layer, "code", &other)),
        };
        let value = parse(&code).ok_or(LayerError::IllegalCategory { layer, code })?;
        target.entry(row.geometry_id).or_default().insert(value);
    }
    Ok(())
}

fn bus_route(layer: SpatialLayer, attribute: LayerAttribute) -> Result<BusRoute, LayerError> {
    match attribute {
        LayerAttribute::BusRoute {
            route_id,
            direction_id,
            rush_hour,
            trunk,
        } => {
            let trunk = TrunkLine::from_code(&trunk)
                .ok_or(LayerError::IllegalCategory { layer, code: trunk })?;
            Ok(BusRoute {
                route_id,
                direction_id,
                rush_hour,
                trunk,
            })
        }
        other => Err(unexpected(layer, "bus_route", &other)),
    }
}

fn unexpected(layer: SpatialLayer, expected: &'static str, found: &LayerAttribute) -> LayerError {
    LayerError::UnexpectedAttribute {
        layer,
        expected,
        found: found.kind(),
    }
}

/// Fans one overlap query per layer out to the source and joins the results.
pub struct SpatialFeatureCollector<S> {
    source: Arc<S>,
    radii: Vec<VolumeRadius>,
}

impl<S> SpatialFeatureCollector<S>
where
    S: SpatialLayerSource,
{
    pub fn new(source: Arc<S>, radii: Vec<VolumeRadius>) -> Self {
        Self { source, radii }
    }

    /// Queries issued for every geometry set: one per fixed layer and one per
    /// configured traffic volume radius.
    pub fn queries(&self) -> Vec<LayerQuery> {
        let mut queries: Vec<LayerQuery> = SpatialLayer::ALL
            .into_iter()
            .filter(|layer| *layer != SpatialLayer::TrafficVolumes)
            .map(LayerQuery::layer)
            .collect();
        queries.extend(self.radii.iter().copied().map(LayerQuery::traffic_volumes));
        queries
    }

    /// Runs all layer queries concurrently and waits for every one of them.
    /// The first failing layer, in query order, fails the whole collection.
    pub fn collect(&self, geometry_set: GeometrySetId) -> Result<LayerResults, LayerError> {
        let queries = self.queries();
        let source = self.source.as_ref();

        let fetched: Vec<(LayerQuery, Result<Vec<LayerRow>, LayerError>)> =
            thread::scope(|scope| {
                let handles: Vec<_> = queries
                    .iter()
                    .map(|query| {
                        let handle = scope.spawn(move || source.overlapping(query, geometry_set));
                        (*query, handle)
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|(query, handle)| {
                        let rows = handle.join().unwrap_or_else(|_| {
                            Err(LayerError::Query {
                                layer: query.layer,
                                reason: "layer query panicked".to_string(),
                            })
                        });
                        (query, rows)
                    })
                    .collect()
            });

        let mut results = LayerResults::default();
        for (query, rows) in fetched {
            let rows = rows?;
            debug!(%geometry_set, %query, rows = rows.len(), "layer overlap collected");
            results.absorb(&query, rows)?;
        }
        Ok(results)
    }
}
