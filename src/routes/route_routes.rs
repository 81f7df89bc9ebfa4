use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::clients::Coordinates;
use crate::controllers::RouteController;
use crate::dto::eta_dto::{EtaEstimate, EtaQuery};
use crate::dto::route_dto::{
    CreateRouteRequest, CreateRouteTimeRequest, RouteDetail, RouteWithStops, RouteWithTimes,
    SetActiveRequest, UpdateRouteRequest, UpdateRouteTimeRequest,
};
use crate::dto::ApiResponse;
use crate::models::{Route, RouteTime};
use crate::state::AppState;
use crate::utils::errors::AppError;

// Los segmentos fijos van antes que `/:id`
pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route).get(list_routes))
        .route("/available-now", get(list_available_now))
        .route("/without-vehicle", get(list_without_vehicle))
        .route("/times/:time_id", patch(update_time).delete(delete_time))
        .route("/times/:time_id/active", patch(set_time_active))
        .route("/:id", get(get_route).patch(update_route).delete(delete_route))
        .route("/:id/active", patch(set_route_active))
        .route("/:id/times", post(add_time))
        .route("/:id/eta", get(estimate_arrival))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteWithStops>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteWithTimes>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list_all().await?;
    Ok(Json(response))
}

async fn list_available_now(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteWithTimes>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list_available_now().await?;
    Ok(Json(response))
}

async fn list_without_vehicle(
    State(state): State<AppState>,
) -> Result<Json<Vec<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list_without_vehicle().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RouteDetail>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn set_route_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.set_active(id, request.active).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn add_time(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRouteTimeRequest>,
) -> Result<Json<ApiResponse<RouteTime>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.add_time(id, request).await?;
    Ok(Json(response))
}

async fn update_time(
    State(state): State<AppState>,
    Path(time_id): Path<i64>,
    Json(request): Json<UpdateRouteTimeRequest>,
) -> Result<Json<ApiResponse<RouteTime>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update_time(time_id, request).await?;
    Ok(Json(response))
}

async fn set_time_active(
    State(state): State<AppState>,
    Path(time_id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<RouteTime>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.set_time_active(time_id, request.active).await?;
    Ok(Json(response))
}

async fn delete_time(
    State(state): State<AppState>,
    Path(time_id): Path<i64>,
) -> Result<Json<ApiResponse<RouteTime>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.delete_time(time_id).await?;
    Ok(Json(response))
}

async fn estimate_arrival(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EtaQuery>,
) -> Result<Json<EtaEstimate>, AppError> {
    let estimator = state.arrival_estimator();
    let response = estimator
        .estimate(id, Coordinates::new(query.lat, query.lon), query.stop_id)
        .await?;
    Ok(Json(response))
}
