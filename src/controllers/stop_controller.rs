use sqlx::PgPool;

use crate::dto::stop_dto::{CreateStopRequest, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::models::Stop;
use crate::repositories::StopRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct StopController {
    repository: StopRepository,
}

impl StopController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StopRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateStopRequest) -> Result<ApiResponse<Stop>, AppError> {
        let stop = self
            .repository
            .create(&request.name, request.route_id, request.latitude, request.longitude)
            .await?;

        log::info!("📍 Parada {} '{}' creada en la ruta {}", stop.id, stop.name, stop.route_id);
        Ok(ApiResponse::success_with_message(stop, "Stop created"))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateStopRequest,
    ) -> Result<ApiResponse<Stop>, AppError> {
        let stop = self
            .repository
            .update(id, request.name, request.latitude, request.longitude)
            .await?
            .ok_or_else(|| not_found_error("Stop", id))?;

        Ok(ApiResponse::success_with_message(stop, "Stop updated"))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<Stop>, AppError> {
        let stop = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found_error("Stop", id))?;

        log::info!("🗑️ Parada {} eliminada", id);
        Ok(ApiResponse::success_with_message(stop, "Stop deleted"))
    }

    pub async fn list_by_route(&self, route_id: i64) -> Result<Vec<Stop>, AppError> {
        self.repository.list_by_route(route_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Stop>, AppError> {
        self.repository.list_all().await
    }
}
