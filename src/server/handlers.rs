use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::server::server::AppState;

type ApiResult = Result<Json<Value>, GatewayError>;

#[derive(Debug, Deserialize)]
pub struct VersesParams {
    #[serde(rename = "reciterId")]
    pub reciter_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct RandomAyahParams {
    #[serde(rename = "reciterId")]
    pub reciter_id: u32,
    #[serde(rename = "tafsirId")]
    pub tafsir_id: u32,
}

/// Content routes, mounted under the api prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reciters", get(get_reciters))
        .route("/tafsirs", get(get_tafsirs))
        .route("/surahs", get(get_surahs))
        .route("/surahs/{id}", get(get_surah))
        .route("/surahs/{id}/info", get(get_surah_info))
        .route("/random-ayah-from-surah/{id}", get(get_random_ayah_from_surah))
        .route("/verses-from-surah/{id}", get(get_verses_from_surah))
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = match &self {
            GatewayError::AuthenticationFailed(message) | GatewayError::InvalidRequest(message) => json!({
                "error": self.kind(),
                "message": message,
            }),
            GatewayError::UpstreamFetchFailed { endpoint, status, message } => json!({
                "error": self.kind(),
                "endpoint": endpoint,
                "upstream_status": status,
                "message": message,
            }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

fn respond(result: GatewayResult<Value>) -> ApiResult {
    result.map(Json)
}

async fn get_reciters(State(state): State<AppState>) -> ApiResult {
    respond(state.content.list_reciters().await)
}

async fn get_tafsirs(State(state): State<AppState>) -> ApiResult {
    respond(state.content.list_tafsirs().await)
}

async fn get_surahs(State(state): State<AppState>) -> ApiResult {
    respond(state.content.list_surahs().await)
}

async fn get_surah(
    State(state): State<AppState>,
    surah_id: Result<Path<u32>, PathRejection>,
) -> ApiResult {
    let Path(surah_id) = surah_id?;
    respond(state.content.get_surah(surah_id).await)
}

async fn get_surah_info(
    State(state): State<AppState>,
    surah_id: Result<Path<u32>, PathRejection>,
) -> ApiResult {
    let Path(surah_id) = surah_id?;
    respond(state.content.get_surah_info(surah_id).await)
}

async fn get_verses_from_surah(
    State(state): State<AppState>,
    surah_id: Result<Path<u32>, PathRejection>,
    params: Result<Query<VersesParams>, QueryRejection>,
) -> ApiResult {
    let Path(surah_id) = surah_id?;
    let Query(params) = params?;
    respond(state.content.get_verses_of_surah(surah_id, params.reciter_id).await)
}

async fn get_random_ayah_from_surah(
    State(state): State<AppState>,
    surah_id: Result<Path<u32>, PathRejection>,
    params: Result<Query<RandomAyahParams>, QueryRejection>,
) -> ApiResult {
    let Path(surah_id) = surah_id?;
    let Query(params) = params?;
    respond(
        state
            .content
            .get_random_ayah_from_surah(surah_id, params.reciter_id, params.tafsir_id)
            .await,
    )
}
