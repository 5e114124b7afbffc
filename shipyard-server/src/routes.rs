//! HTTP handlers for Shipyard server.

use std::sync::Arc;

use actix_web::error::BlockingError;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipyard_core::{
    NewShip, PageRequest, Ship, ShipFilter, ShipOrder, ShipPatch, ShipService, ShipStore,
    ShipType, ShipyardError,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Ship store shared by every worker.
pub type SharedShipStore = Arc<dyn ShipStore + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship catalog service.
    pub ships: ShipService<SharedShipStore>,
}

impl AppState {
    /// Build state around a shared store.
    pub fn new(store: SharedShipStore) -> Self {
        Self {
            ships: ShipService::new(store),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Query parameters accepted by the listing and count endpoints.
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipQuery {
    /// Substring of the ship name.
    pub name: Option<String>,
    /// Substring of the planet.
    pub planet: Option<String>,
    /// Ship class.
    pub ship_type: Option<ShipType>,
    /// Produced strictly after this epoch millisecond.
    pub after: Option<i64>,
    /// Produced strictly before this epoch millisecond.
    pub before: Option<i64>,
    /// Used flag.
    pub is_used: Option<bool>,
    /// Minimum speed, inclusive.
    pub min_speed: Option<f64>,
    /// Maximum speed, inclusive.
    pub max_speed: Option<f64>,
    /// Minimum crew size, inclusive.
    pub min_crew_size: Option<i32>,
    /// Maximum crew size, inclusive.
    pub max_crew_size: Option<i32>,
    /// Minimum rating, inclusive.
    pub min_rating: Option<f64>,
    /// Maximum rating, inclusive.
    pub max_rating: Option<f64>,
    /// Sort key; listing only.
    pub order: Option<ShipOrder>,
    /// Zero-based page number; listing only.
    pub page_number: Option<i64>,
    /// Page size; listing only.
    pub page_size: Option<i64>,
}

impl ShipQuery {
    /// Convert the filter parameters into engine criteria.
    pub fn filter(&self) -> ShipFilter {
        ShipFilter {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after.map(clamp_millis),
            before: self.before.map(clamp_millis),
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }

    /// Requested page.
    pub fn page(&self) -> PageRequest {
        PageRequest {
            number: self.page_number,
            size: self.page_size,
        }
    }
}

/// Bounds beyond the representable range saturate instead of failing the request.
fn clamp_millis(millis: i64) -> DateTime<Utc> {
    match DateTime::from_timestamp_millis(millis) {
        Some(instant) => instant,
        None if millis < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Map a core error to its HTTP response.
pub fn error_response(err: &ShipyardError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        ShipyardError::InvalidField(_) | ShipyardError::MalformedIdentifier(_) => {
            HttpResponse::BadRequest().json(body)
        }
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(body),
        ShipyardError::Storage(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T>(
    result: Result<shipyard_core::Result<T>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship service unavailable: {err}"),
        }),
    }
}

/// Register the ship routes. `/rest/ships/count` is registered ahead of
/// `/rest/ships/{id}` so it is not captured as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(count_ships)
        .service(openapi_json)
        .service(list_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship);
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipQuery),
    responses(
        (status = 200, description = "Filtered, sorted page of ships", body = [Ship]),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the query.
pub async fn list_ships(state: web::Data<AppState>, query: web::Query<ShipQuery>) -> impl Responder {
    let query = query.into_inner();
    let filter = query.filter();
    let result =
        web::block(move || state.ships.list(&filter, query.order, query.page())).await;
    respond(result, |ships| HttpResponse::Ok().json(ships))
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipQuery),
    responses(
        (status = 200, description = "Number of matching ships", body = usize),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the query; paging parameters are ignored.
pub async fn count_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let filter = query.filter();
    let result = web::block(move || state.ships.count(&filter)).await;
    respond(result, |count| HttpResponse::Ok().json(count))
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = NewShip,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid field", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<NewShip>,
) -> impl Responder {
    let payload = payload.into_inner();
    let result = web::block(move || state.ships.create(payload)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by identifier.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let result = web::block(move || state.ships.get(&raw_id)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipPatch,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid field or identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply a partial update to a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipPatch>,
) -> impl Responder {
    let raw_id = path.into_inner();
    let patch = payload.into_inner();
    let result = web::block(move || state.ships.update(&raw_id, patch)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let result = web::block(move || state.ships.delete(&raw_id)).await;
    respond(result, |()| HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document")
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
