use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex};

use crate::disruption::layers::{
    GeometryId, GeometrySetId, LayerAttribute, LayerError, LayerQuery, LayerRow, SpatialLayer,
    SpatialLayerSource, VolumeRadius,
};

pub(super) const SET: GeometrySetId = GeometrySetId(7);
pub(super) const FIRST: GeometryId = GeometryId(70);
pub(super) const SECOND: GeometryId = GeometryId(71);

/// Canned overlap rows per query; every query issued is recorded.
#[derive(Default)]
pub(super) struct StaticLayerSource {
    rows: BTreeMap<LayerQuery, Vec<LayerRow>>,
    issued: Mutex<Vec<LayerQuery>>,
}

impl StaticLayerSource {
    pub(super) fn with(mut self, query: LayerQuery, rows: Vec<LayerRow>) -> Self {
        self.rows.entry(query).or_default().extend(rows);
        self
    }

    pub(super) fn layer(self, layer: SpatialLayer, rows: Vec<LayerRow>) -> Self {
        self.with(LayerQuery::layer(layer), rows)
    }

    pub(super) fn volumes(self, radius: u32, rows: Vec<LayerRow>) -> Self {
        self.with(LayerQuery::traffic_volumes(VolumeRadius(radius)), rows)
    }

    pub(super) fn issued(&self) -> Vec<LayerQuery> {
        let mut issued = self.issued.lock().expect("issued lock").clone();
        issued.sort();
        issued
    }
}

impl SpatialLayerSource for StaticLayerSource {
    fn overlapping(
        &self,
        query: &LayerQuery,
        geometry_set: GeometrySetId,
    ) -> Result<Vec<LayerRow>, LayerError> {
        self.issued.lock().expect("issued lock").push(*query);
        if geometry_set != SET {
            return Ok(Vec::new());
        }
        Ok(self.rows.get(query).cloned().unwrap_or_default())
    }
}

/// Source whose given layer always fails.
pub(super) struct FailingSource {
    pub(super) broken: SpatialLayer,
}

impl SpatialLayerSource for FailingSource {
    fn overlapping(
        &self,
        query: &LayerQuery,
        _geometry_set: GeometrySetId,
    ) -> Result<Vec<LayerRow>, LayerError> {
        if query.layer == self.broken {
            Err(LayerError::Query {
                layer: query.layer,
                reason: "connection reset".to_string(),
            })
        } else {
            Ok(Vec::new())
        }
    }
}

/// Source whose queries block until the test opens the gate.
#[derive(Clone, Default)]
pub(super) struct GatedSource {
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GatedSource {
    pub(super) fn open(&self) {
        let (open, signal) = &*self.gate;
        *open.lock().expect("gate lock") = true;
        signal.notify_all();
    }
}

impl SpatialLayerSource for GatedSource {
    fn overlapping(
        &self,
        _query: &LayerQuery,
        _geometry_set: GeometrySetId,
    ) -> Result<Vec<LayerRow>, LayerError> {
        let (open, signal) = &*self.gate;
        let mut guard = open.lock().expect("gate lock");
        while !*guard {
            guard = signal.wait(guard).expect("gate wait");
        }
        Ok(Vec::new())
    }
}

pub(super) fn flag(geometry: GeometryId, value: i64) -> LayerRow {
    LayerRow {
        feature_id: 1,
        geometry_id: geometry,
        attribute: LayerAttribute::Flag(value),
    }
}

pub(super) fn code(geometry: GeometryId, code: &str) -> LayerRow {
    LayerRow {
        feature_id: 2,
        geometry_id: geometry,
        attribute: LayerAttribute::Code(code.to_string()),
    }
}

pub(super) fn volume(geometry: GeometryId, volume: u32) -> LayerRow {
    LayerRow {
        feature_id: i64::from(volume),
        geometry_id: geometry,
        attribute: LayerAttribute::Volume(volume),
    }
}

pub(super) fn bus(geometry: GeometryId, route: &str, rush_hour: u32, trunk: &str) -> LayerRow {
    LayerRow {
        feature_id: 3,
        geometry_id: geometry,
        attribute: LayerAttribute::BusRoute {
            route_id: route.to_string(),
            direction_id: 0,
            rush_hour,
            trunk: trunk.to_string(),
        },
    }
}

pub(super) const MAIN_STREET: &str = "Pääkatu tai moottoriväylä";
pub(super) const LOCAL_COLLECTOR: &str = "Paikallinen kokoojakatu";
pub(super) const PLOT_STREET: &str = "Tonttikatu tai ajoyhteys";
