use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::UserController;
use crate::dto::user_dto::{CreateUserRequest, EmailQuery, UpdateUserRequest};
use crate::dto::ApiResponse;
use crate::models::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/drivers", get(list_drivers))
        .route("/lookup", get(find_by_email))
        .route("/:id", patch(update_user).delete(delete_user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list_all().await?;
    Ok(Json(response))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list_drivers().await?;
    Ok(Json(response))
}

// `null` cuando no hay cuenta o la consulta falla
async fn find_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Json<Option<UserResponse>> {
    let controller = UserController::new(state.pool.clone());
    Json(controller.find_by_email(&query.email).await)
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
