use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::layers::{
    GeometryId, GeometrySetId, LayerAttribute, LayerError, LayerQuery, LayerRow, SpatialLayer,
    SpatialLayerSource, VolumeRadius,
};

#[derive(Debug, thiserror::Error)]
pub enum CsvSourceError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown layer `{layer}`")]
    UnknownLayer { line: usize, layer: String },
    #[error("line {line}: {column} is required for {layer}")]
    MissingColumn {
        line: usize,
        layer: SpatialLayer,
        column: &'static str,
    },
    #[error("line {line}: invalid {column} `{value}`")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
struct StoredRow {
    layer: SpatialLayer,
    radius: Option<VolumeRadius>,
    geometry_set: GeometrySetId,
    row: LayerRow,
}

/// Layer source backed by a pre-computed overlap export, one CSV row per
/// overlapping feature and geometry.
#[derive(Debug, Clone, Default)]
pub struct CsvLayerSource {
    rows: Vec<StoredRow>,
}

impl CsvLayerSource {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CsvSourceError> {
        let csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        Self::parse(csv_reader)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CsvSourceError> {
        let csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;
        Self::parse(csv_reader)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn parse<R: Read>(mut csv_reader: csv::Reader<R>) -> Result<Self, CsvSourceError> {
        let mut rows = Vec::new();
        for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let line = index + 2;
            rows.push(record?.into_stored(line)?);
        }
        Ok(Self { rows })
    }
}

impl SpatialLayerSource for CsvLayerSource {
    fn overlapping(
        &self,
        query: &LayerQuery,
        geometry_set: GeometrySetId,
    ) -> Result<Vec<LayerRow>, LayerError> {
        if query.layer == SpatialLayer::TrafficVolumes && query.radius.is_none() {
            return Err(LayerError::MissingRadius);
        }

        Ok(self
            .rows
            .iter()
            .filter(|stored| {
                stored.layer == query.layer
                    && stored.geometry_set == geometry_set
                    && stored.radius == query.radius
            })
            .map(|stored| stored.row.clone())
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    layer: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    radius: Option<String>,
    feature_id: i64,
    geometry_set_id: i64,
    geometry_id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    route_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    direction_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rush_hour: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    trunk: Option<String>,
}

impl CsvRow {
    fn into_stored(self, line: usize) -> Result<StoredRow, CsvSourceError> {
        let layer = SpatialLayer::from_label(&self.layer).ok_or_else(|| {
            CsvSourceError::UnknownLayer {
                line,
                layer: self.layer.clone(),
            }
        })?;

        let radius = match layer {
            SpatialLayer::TrafficVolumes => Some(VolumeRadius(parse_column(
                line,
                layer,
                "radius",
                self.radius.as_deref(),
            )?)),
            _ => None,
        };

        let attribute = match layer {
            SpatialLayer::PublicStreetAreas
            | SpatialLayer::CentralBusinessDistrict
            | SpatialLayer::BusCriticalArea => LayerAttribute::Flag(parse_column(
                line,
                layer,
                "value",
                self.value.as_deref(),
            )?),
            SpatialLayer::GeneralStreetClasses
            | SpatialLayer::StreetClasses
            | SpatialLayer::TramLanes
            | SpatialLayer::CycleRoutes => {
                LayerAttribute::Code(self.value.clone().unwrap_or_default())
            }
            SpatialLayer::TrafficVolumes => LayerAttribute::Volume(parse_column(
                line,
                layer,
                "value",
                self.value.as_deref(),
            )?),
            SpatialLayer::BusRoutes => LayerAttribute::BusRoute {
                route_id: required(line, layer, "route_id", self.route_id.clone())?,
                direction_id: parse_column(
                    line,
                    layer,
                    "direction_id",
                    self.direction_id.as_deref(),
                )?,
                rush_hour: parse_column(line, layer, "rush_hour", self.rush_hour.as_deref())?,
                trunk: required(line, layer, "trunk", self.trunk.clone())?,
            },
        };

        Ok(StoredRow {
            layer,
            radius,
            geometry_set: GeometrySetId(self.geometry_set_id),
            row: LayerRow {
                feature_id: self.feature_id,
                geometry_id: GeometryId(self.geometry_id),
                attribute,
            },
        })
    }
}

fn required(
    line: usize,
    layer: SpatialLayer,
    column: &'static str,
    value: Option<String>,
) -> Result<String, CsvSourceError> {
    value.ok_or(CsvSourceError::MissingColumn {
        line,
        layer,
        column,
    })
}

fn parse_column<T: std::str::FromStr>(
    line: usize,
    layer: SpatialLayer,
    column: &'static str,
    value: Option<&str>,
) -> Result<T, CsvSourceError> {
    let raw = value.ok_or(CsvSourceError::MissingColumn {
        line,
        layer,
        column,
    })?;
    raw.parse().map_err(|_| CsvSourceError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
