use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::StopController;
use crate::dto::stop_dto::{CreateStopRequest, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::models::Stop;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stop_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_stop).get(list_stops))
        .route("/route/:route_id", get(list_by_route))
        .route("/:id", patch(update_stop).delete(delete_stop))
}

async fn create_stop(
    State(state): State<AppState>,
    Json(request): Json<CreateStopRequest>,
) -> Result<Json<ApiResponse<Stop>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_stops(State(state): State<AppState>) -> Result<Json<Vec<Stop>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.list_all().await?;
    Ok(Json(response))
}

async fn list_by_route(
    State(state): State<AppState>,
    Path(route_id): Path<i64>,
) -> Result<Json<Vec<Stop>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.list_by_route(route_id).await?;
    Ok(Json(response))
}

async fn update_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStopRequest>,
) -> Result<Json<ApiResponse<Stop>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Stop>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
