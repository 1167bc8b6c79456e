use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, MethodRouter},
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::services::{Resource, ResourceService};
use crate::AppState;

/// GET /api/<resource>
pub async fn list<R: Resource>(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<R>>>> {
    let rows = ResourceService::list::<R>(&state.db).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// POST /api/<resource>
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Json(req): Json<R::Create>,
) -> Result<(StatusCode, Json<ApiResponse<R>>)> {
    let created = ResourceService::create::<R>(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// List + create routes for a resource
pub fn routes<R: Resource>() -> MethodRouter<AppState> {
    get(list::<R>).post(create::<R>)
}
