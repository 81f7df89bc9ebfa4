use sqlx::PgPool;

use crate::models::{Vehicle, VehicleLocation, VehicleRoute};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        driver_id: Option<i64>,
        active: bool,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (name, driver_id, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, driver_id, active
            "#,
        )
        .bind(name)
        .bind(driver_id)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, name, driver_id, active FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// `driver_id`: `None` conserva el chofer, `Some(None)` lo desasigna
    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        driver_id: Option<Option<i64>>,
        active: Option<bool>,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = COALESCE($2, name),
                driver_id = CASE WHEN $3 THEN $4 ELSE driver_id END,
                active = COALESCE($5, active)
            WHERE id = $1
            RETURNING id, name, driver_id, active
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(driver_id.is_some())
        .bind(driver_id.flatten())
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT id, name, driver_id, active FROM vehicles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_driver(&self, driver_id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, name, driver_id, active FROM vehicles WHERE driver_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Vehículos cuyo id no está en `excluded`; con la lista vacía devuelve todos
    pub async fn list_excluding(&self, excluded: &[i64]) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT id, name, driver_id, active FROM vehicles WHERE NOT (id = ANY($1)) ORDER BY id",
        )
        .bind(excluded)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn occupied_driver_ids(&self) -> Result<Vec<i64>, AppError> {
        let ids: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT driver_id FROM vehicles WHERE driver_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "DELETE FROM vehicles WHERE id = $1 RETURNING id, name, driver_id, active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Vehículos asignados a una ruta, en orden de id
    pub async fn list_for_route(&self, route_id: i64) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT DISTINCT v.id, v.name, v.driver_id, v.active
            FROM vehicles v
            JOIN vehicle_routes vr ON vr.vehicle_id = v.id
            WHERE vr.route_id = $1
            ORDER BY v.id
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn assignments_for_vehicle(&self, vehicle_id: i64) -> Result<Vec<VehicleRoute>, AppError> {
        self.assignments_for_vehicles(&[vehicle_id]).await
    }

    pub async fn assignments_for_vehicles(
        &self,
        vehicle_ids: &[i64],
    ) -> Result<Vec<VehicleRoute>, AppError> {
        let rows = sqlx::query_as::<_, VehicleRoute>(
            r#"
            SELECT vehicle_id, route_id FROM vehicle_routes
            WHERE vehicle_id = ANY($1)
            ORDER BY vehicle_id, route_id
            "#,
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn assigned_vehicle_ids(&self) -> Result<Vec<i64>, AppError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT DISTINCT vehicle_id FROM vehicle_routes")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    pub async fn assigned_route_ids(&self) -> Result<Vec<i64>, AppError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT DISTINCT route_id FROM vehicle_routes")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Inserta en bloque una fila por ruta
    pub async fn insert_assignments(
        &self,
        vehicle_id: i64,
        route_ids: &[i64],
    ) -> Result<Vec<VehicleRoute>, AppError> {
        let rows = sqlx::query_as::<_, VehicleRoute>(
            r#"
            INSERT INTO vehicle_routes (vehicle_id, route_id)
            SELECT $1, route_id FROM UNNEST($2::BIGINT[]) AS route_id
            RETURNING vehicle_id, route_id
            "#,
        )
        .bind(vehicle_id)
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn change_assignment(
        &self,
        vehicle_id: i64,
        old_route_id: i64,
        new_route_id: i64,
    ) -> Result<Option<VehicleRoute>, AppError> {
        let row = sqlx::query_as::<_, VehicleRoute>(
            r#"
            UPDATE vehicle_routes SET route_id = $3
            WHERE vehicle_id = $1 AND route_id = $2
            RETURNING vehicle_id, route_id
            "#,
        )
        .bind(vehicle_id)
        .bind(old_route_id)
        .bind(new_route_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_assignment(
        &self,
        vehicle_id: i64,
        route_id: i64,
    ) -> Result<Option<VehicleRoute>, AppError> {
        let row = sqlx::query_as::<_, VehicleRoute>(
            r#"
            DELETE FROM vehicle_routes
            WHERE vehicle_id = $1 AND route_id = $2
            RETURNING vehicle_id, route_id
            "#,
        )
        .bind(vehicle_id)
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_assignments_for_vehicle(&self, vehicle_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_routes WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_assignments_for_route(&self, route_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_routes WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_location(
        &self,
        vehicle_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<VehicleLocation, AppError> {
        let location = sqlx::query_as::<_, VehicleLocation>(
            r#"
            INSERT INTO vehicle_locations (vehicle_id, latitude, longitude)
            VALUES ($1, $2, $3)
            RETURNING id, vehicle_id, latitude, longitude, recorded_at
            "#,
        )
        .bind(vehicle_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn list_locations(&self, vehicle_id: i64) -> Result<Vec<VehicleLocation>, AppError> {
        let locations = sqlx::query_as::<_, VehicleLocation>(
            r#"
            SELECT id, vehicle_id, latitude, longitude, recorded_at
            FROM vehicle_locations
            WHERE vehicle_id = $1
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    pub async fn latest_location(&self, vehicle_id: i64) -> Result<Option<VehicleLocation>, AppError> {
        let location = sqlx::query_as::<_, VehicleLocation>(
            r#"
            SELECT id, vehicle_id, latitude, longitude, recorded_at
            FROM vehicle_locations
            WHERE vehicle_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }
}
