use sqlx::PgPool;

use crate::models::Stop;
use crate::utils::errors::AppError;

const STOP_COLUMNS: &str = "id, name, route_id, latitude, longitude";

pub struct StopRepository {
    pool: PgPool,
}

impl StopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        route_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Stop, AppError> {
        let stop = sqlx::query_as::<_, Stop>(&format!(
            "INSERT INTO stops (name, route_id, latitude, longitude) VALUES ($1, $2, $3, $4) RETURNING {}",
            STOP_COLUMNS
        ))
        .bind(name)
        .bind(route_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(stop)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>(&format!("SELECT {} FROM stops WHERE id = $1", STOP_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stop)
    }

    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>(&format!(
            r#"
            UPDATE stops
            SET name = COALESCE($2, name),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude)
            WHERE id = $1
            RETURNING {}
            "#,
            STOP_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stop)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>(&format!(
            "DELETE FROM stops WHERE id = $1 RETURNING {}",
            STOP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stop)
    }

    pub async fn list_by_route(&self, route_id: i64) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(&format!(
            "SELECT {} FROM stops WHERE route_id = $1 ORDER BY id",
            STOP_COLUMNS
        ))
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    pub async fn list_for_routes(&self, route_ids: &[i64]) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(&format!(
            "SELECT {} FROM stops WHERE route_id = ANY($1) ORDER BY id",
            STOP_COLUMNS
        ))
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    pub async fn list_all(&self) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(&format!("SELECT {} FROM stops ORDER BY id", STOP_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(stops)
    }

    pub async fn delete_for_route(&self, route_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM stops WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
