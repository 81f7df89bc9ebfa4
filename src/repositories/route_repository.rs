use chrono::NaiveTime;
use sqlx::PgPool;

use crate::models::{Route, RouteTime};
use crate::utils::errors::AppError;

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, active: bool) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "INSERT INTO routes (name, active) VALUES ($1, $2) RETURNING id, name, active",
        )
        .bind(name)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT id, name, active FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Actualización parcial: los campos en `None` conservan su valor
    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        active: Option<bool>,
    ) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET name = COALESCE($2, name), active = COALESCE($3, active)
            WHERE id = $1
            RETURNING id, name, active
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn list_all(&self) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>("SELECT id, name, active FROM routes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    pub async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT id, name, active FROM routes WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    /// Rutas cuyo id no está en `excluded`; con la lista vacía devuelve todas
    pub async fn list_excluding(&self, excluded: &[i64]) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT id, name, active FROM routes WHERE NOT (id = ANY($1)) ORDER BY id",
        )
        .bind(excluded)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "DELETE FROM routes WHERE id = $1 RETURNING id, name, active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn create_time(
        &self,
        route_id: i64,
        time: NaiveTime,
        active: bool,
    ) -> Result<RouteTime, AppError> {
        let route_time = sqlx::query_as::<_, RouteTime>(
            r#"
            INSERT INTO route_times (route_id, time, active)
            VALUES ($1, $2, $3)
            RETURNING id, route_id, time, active
            "#,
        )
        .bind(route_id)
        .bind(time)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;

        Ok(route_time)
    }

    pub async fn update_time(
        &self,
        id: i64,
        time: Option<NaiveTime>,
        active: Option<bool>,
    ) -> Result<Option<RouteTime>, AppError> {
        let route_time = sqlx::query_as::<_, RouteTime>(
            r#"
            UPDATE route_times
            SET time = COALESCE($2, time), active = COALESCE($3, active)
            WHERE id = $1
            RETURNING id, route_id, time, active
            "#,
        )
        .bind(id)
        .bind(time)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route_time)
    }

    pub async fn delete_time(&self, id: i64) -> Result<Option<RouteTime>, AppError> {
        let route_time = sqlx::query_as::<_, RouteTime>(
            "DELETE FROM route_times WHERE id = $1 RETURNING id, route_id, time, active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route_time)
    }

    pub async fn list_times(&self) -> Result<Vec<RouteTime>, AppError> {
        let times = sqlx::query_as::<_, RouteTime>(
            "SELECT id, route_id, time, active FROM route_times ORDER BY time, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(times)
    }

    pub async fn list_times_for_routes(&self, route_ids: &[i64]) -> Result<Vec<RouteTime>, AppError> {
        let times = sqlx::query_as::<_, RouteTime>(
            r#"
            SELECT id, route_id, time, active FROM route_times
            WHERE route_id = ANY($1)
            ORDER BY time, id
            "#,
        )
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(times)
    }

    pub async fn delete_times_for_route(&self, route_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM route_times WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
