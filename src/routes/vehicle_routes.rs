use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};

use crate::controllers::VehicleController;
use crate::dto::route_dto::SetActiveRequest;
use crate::dto::vehicle_dto::{
    AssignRoutesRequest, ChangeRouteRequest, CreateVehicleRequest, DriverVehicle,
    RecordLocationRequest, UpdateVehicleRequest, VehicleWithRoutes,
};
use crate::dto::ApiResponse;
use crate::models::{UserResponse, Vehicle, VehicleLocation, VehicleRoute};
use crate::state::AppState;
use crate::utils::errors::AppError;

// Los segmentos fijos van antes que `/:id`
pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/without-route", get(list_without_route))
        .route("/drivers-available", get(list_drivers_without_vehicle))
        .route("/driver/:driver_id", get(get_by_driver))
        .route("/:id", get(get_vehicle).patch(update_vehicle).delete(delete_vehicle))
        .route("/:id/active", patch(set_vehicle_active))
        .route("/:id/routes", post(assign_routes).patch(change_route))
        .route("/:id/routes/:route_id", delete(unassign_route))
        .route("/:id/driver", delete(unassign_driver))
        .route("/:id/locations", post(record_location).get(list_locations))
        .route("/:id/locations/latest", get(latest_location))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleWithRoutes>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_all().await?;
    Ok(Json(response))
}

async fn list_without_route(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_without_route().await?;
    Ok(Json(response))
}

async fn list_drivers_without_vehicle(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_drivers_without_vehicle().await?;
    Ok(Json(response))
}

async fn get_by_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
) -> Result<Json<DriverVehicle>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_driver(driver_id).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VehicleWithRoutes>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn set_vehicle_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.set_active(id, request.active).await?;
    Ok(Json(response))
}

async fn assign_routes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AssignRoutesRequest>,
) -> Result<Json<Vec<VehicleRoute>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.assign_routes(id, request.route_ids).await?;
    Ok(Json(response))
}

async fn change_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChangeRouteRequest>,
) -> Result<Json<ApiResponse<VehicleRoute>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.change_route(id, request).await?;
    Ok(Json(response))
}

async fn unassign_route(
    State(state): State<AppState>,
    Path((id, route_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<VehicleRoute>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.unassign_route(id, route_id).await?;
    Ok(Json(response))
}

async fn unassign_driver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.unassign_driver(id).await?;
    Ok(Json(response))
}

async fn record_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RecordLocationRequest>,
) -> Result<Json<ApiResponse<VehicleLocation>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.record_location(id, request).await?;
    Ok(Json(response))
}

async fn list_locations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<VehicleLocation>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_locations(id).await?;
    Ok(Json(response))
}

async fn latest_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<VehicleLocation>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.latest_location(id).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
