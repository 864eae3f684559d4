// 🌐 REST API with Axum
//
// GET /                      health + version
// GET /plants                filtered, paginated listing
// GET /plants/:id            plant detail
// GET /symptoms              symptom catalog
// GET /symptoms/:id/plants   plants causing a symptom
// GET /toxins                toxin catalog
// GET /toxins/:id/plants     plants containing a toxin

use crate::detail::{plant_detail, PlantDetail};
use crate::entities::{self, Symptom, SymptomPlant, Toxin, ToxinPlant};
use crate::error::{ApiError, ApiResult};
use crate::listing::{search_plants, ListParams, ListQuery, PlantPage};
use crate::params::parse_id;
use anyhow::anyhow;
use axum::{
    extract::{Path, RawQuery, State},
    response::Json,
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run one read against the database
    fn read<T>(&self, query: impl FnOnce(&Connection) -> anyhow::Result<T>) -> ApiResult<T> {
        let conn = self
            .db
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        Ok(query(&conn)?)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Health check
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// GET /plants - Filtered, paginated listing
async fn get_plants(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PlantPage>> {
    let query = ListQuery::from_query_string(raw.as_deref().unwrap_or_default());
    let params = ListParams::from(query);
    let page = state.read(|conn| search_plants(conn, &params))?;

    tracing::debug!(
        "GET /plants q={:?} severity={:?} body_system={:?} -> {} of {}",
        params.q,
        params.severity,
        params.body_system,
        page.data.len(),
        page.total
    );

    Ok(Json(page))
}

/// GET /plants/:id - Plant detail
async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PlantDetail>> {
    let id = parse_id(&id).ok_or(ApiError::InvalidId)?;

    state
        .read(|conn| plant_detail(conn, id))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// GET /symptoms - All symptoms
async fn get_symptoms(State(state): State<AppState>) -> ApiResult<Json<Vec<Symptom>>> {
    Ok(Json(state.read(entities::list_symptoms)?))
}

/// GET /symptoms/:id/plants - Plants causing a symptom
async fn get_symptom_plants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SymptomPlant>>> {
    let id = parse_id(&id).ok_or(ApiError::InvalidId)?;
    Ok(Json(state.read(|conn| entities::plants_for_symptom(conn, id))?))
}

/// GET /toxins - All toxins
async fn get_toxins(State(state): State<AppState>) -> ApiResult<Json<Vec<Toxin>>> {
    Ok(Json(state.read(entities::list_toxins)?))
}

/// GET /toxins/:id/plants - Plants containing a toxin
async fn get_toxin_plants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ToxinPlant>>> {
    let id = parse_id(&id).ok_or(ApiError::InvalidId)?;
    Ok(Json(state.read(|conn| entities::plants_for_toxin(conn, id))?))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/plants", get(get_plants))
        .route("/plants/:id", get(get_plant))
        .route("/symptoms", get(get_symptoms))
        .route("/symptoms/:id/plants", get(get_symptom_plants))
        .route("/toxins", get(get_toxins))
        .route("/toxins/:id/plants", get(get_toxin_plants))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
