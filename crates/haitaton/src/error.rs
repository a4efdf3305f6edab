use crate::config::ConfigError;
use crate::disruption::{CsvSourceError, LayerError};
use crate::hanke::{HankeServiceError, ReconcileError, RepositoryError, ACTOR_HEADER};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Hanke(HankeServiceError),
    Disruption(LayerError),
    LayerData(CsvSourceError),
    MissingActor,
    Task(tokio::task::JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Hanke(err) => write!(f, "hanke error: {}", err),
            AppError::Disruption(err) => write!(f, "disruption classification error: {}", err),
            AppError::LayerData(err) => write!(f, "layer data error: {}", err),
            AppError::MissingActor => write!(f, "missing {} header", ACTOR_HEADER),
            AppError::Task(err) => write!(f, "background task failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Hanke(err) => Some(err),
            AppError::Disruption(err) => Some(err),
            AppError::LayerData(err) => Some(err),
            AppError::MissingActor => None,
            AppError::Task(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingActor
            | AppError::Hanke(HankeServiceError::InvalidSearch(_))
            | AppError::Hanke(HankeServiceError::Reconcile(ReconcileError::MissingTunnus)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Hanke(HankeServiceError::NotFound(_))
            | AppError::Hanke(HankeServiceError::Repository(RepositoryError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            AppError::Hanke(HankeServiceError::Reconcile(ReconcileError::ContactNotFound {
                ..
            }))
            | AppError::Hanke(HankeServiceError::Repository(RepositoryError::Conflict(_)))
            | AppError::Hanke(HankeServiceError::Repository(
                RepositoryError::ContactNotFound(_),
            )) => StatusCode::CONFLICT,
            AppError::Hanke(_)
            | AppError::Disruption(_)
            | AppError::LayerData(_)
            | AppError::Task(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<HankeServiceError> for AppError {
    fn from(value: HankeServiceError) -> Self {
        Self::Hanke(value)
    }
}

impl From<LayerError> for AppError {
    fn from(value: LayerError) -> Self {
        Self::Disruption(value)
    }
}

impl From<CsvSourceError> for AppError {
    fn from(value: CsvSourceError) -> Self {
        Self::LayerData(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}
