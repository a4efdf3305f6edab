use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};

use super::domain::{Actor, Hanke, HankeInput, HankeSearch, HankeTunnus};
use super::repository::HankeRepository;
use super::service::{HankeService, HankeServiceError};
use super::tunnus::TunnusGenerator;
use crate::error::AppError;

/// Header carrying the id of the user the request acts for.
pub const ACTOR_HEADER: &str = "x-haitaton-actor";

/// Router builder exposing the Hanke listing, create, load, and update endpoints.
pub fn hanke_router<R, G>(service: Arc<HankeService<R, G>>) -> Router
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/hankkeet",
            get(list_handler::<R, G>).post(create_handler::<R, G>),
        )
        .route(
            "/api/v1/hankkeet/:tunnus",
            get(load_handler::<R, G>).put(update_handler::<R, G>),
        )
        .with_state(service)
}

/// Resolves the acting user once per request; the service receives it explicitly.
pub fn actor_from_headers(headers: &HeaderMap) -> Option<Actor> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Actor::new)
}

fn require_actor(headers: &HeaderMap) -> Result<Actor, AppError> {
    actor_from_headers(headers).ok_or(AppError::MissingActor)
}

pub(crate) async fn list_handler<R, G>(
    State(service): State<Arc<HankeService<R, G>>>,
    Query(search): Query<HankeSearch>,
) -> Result<Json<Vec<Hanke>>, AppError>
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    let hankkeet = service.load_all(Some(&search))?;
    Ok(Json(hankkeet))
}

pub(crate) async fn load_handler<R, G>(
    State(service): State<Arc<HankeService<R, G>>>,
    Path(tunnus): Path<String>,
) -> Result<Json<Hanke>, AppError>
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    let tunnus = HankeTunnus(tunnus);
    match service.load(&tunnus)? {
        Some(hanke) => Ok(Json(hanke)),
        None => Err(HankeServiceError::NotFound(tunnus).into()),
    }
}

pub(crate) async fn create_handler<R, G>(
    State(service): State<Arc<HankeService<R, G>>>,
    headers: HeaderMap,
    Json(input): Json<HankeInput>,
) -> Result<(StatusCode, Json<Hanke>), AppError>
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    let actor = require_actor(&headers)?;
    let hanke = service.create(input, &actor)?;
    Ok((StatusCode::CREATED, Json(hanke)))
}

pub(crate) async fn update_handler<R, G>(
    State(service): State<Arc<HankeService<R, G>>>,
    Path(tunnus): Path<String>,
    headers: HeaderMap,
    Json(mut input): Json<HankeInput>,
) -> Result<Json<Hanke>, AppError>
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    let actor = require_actor(&headers)?;
    input.tunnus = Some(HankeTunnus(tunnus));
    let hanke = service.update(input, &actor)?;
    Ok(Json(hanke))
}
