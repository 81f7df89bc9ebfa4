use chrono::{Local, NaiveTime};
use futures::future::try_join_all;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::dto::route_dto::{
    AssignedVehicle, CreateRouteRequest, CreateRouteTimeRequest, RouteDetail, RouteWithStops,
    RouteWithTimes, UpdateRouteRequest, UpdateRouteTimeRequest,
};
use crate::dto::ApiResponse;
use crate::models::{Route, RouteTime, UserResponse, Vehicle, VehicleLocation};
use crate::repositories::{RouteRepository, StopRepository, UserRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, AppError};

/// Parada que se crea junto con cada ruta nueva
pub const DEFAULT_STOP_NAME: &str = "UDO";
pub const DEFAULT_STOP_LATITUDE: f64 = 10.4564;
pub const DEFAULT_STOP_LONGITUDE: f64 = -64.1675;

pub struct RouteController {
    routes: RouteRepository,
    stops: StopRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            stops: StopRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Crea la ruta y su parada por defecto
    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteWithStops>, AppError> {
        let route = self
            .routes
            .create(&request.name, request.active.unwrap_or(true))
            .await?;

        let stop = self
            .stops
            .create(DEFAULT_STOP_NAME, route.id, DEFAULT_STOP_LATITUDE, DEFAULT_STOP_LONGITUDE)
            .await?;

        log::info!("🛣️ Ruta {} '{}' creada con parada {}", route.id, route.name, stop.id);

        Ok(ApiResponse::success_with_message(
            RouteWithStops { route, stops: vec![stop] },
            "Route created",
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        let route = self
            .routes
            .update(id, request.name, request.active)
            .await?
            .ok_or_else(|| not_found_error("Route", id))?;

        log::info!("✏️ Ruta {} actualizada", id);
        Ok(ApiResponse::success_with_message(route, "Route updated"))
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<ApiResponse<Route>, AppError> {
        self.update(id, UpdateRouteRequest { name: None, active: Some(active) })
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<RouteWithTimes>, AppError> {
        let routes = self.routes.list_all().await?;
        let times = self.routes.list_times().await?;
        Ok(attach_times(routes, times))
    }

    /// Rutas activas con al menos una hora activa ya pasada hoy
    pub async fn list_available_now(&self) -> Result<Vec<RouteWithTimes>, AppError> {
        self.list_available_at(Local::now().time()).await
    }

    pub async fn list_available_at(&self, now: NaiveTime) -> Result<Vec<RouteWithTimes>, AppError> {
        let routes = self.list_all().await?;
        Ok(routes
            .into_iter()
            .filter(|route| is_available_at(route, now))
            .collect())
    }

    pub async fn list_without_vehicle(&self) -> Result<Vec<Route>, AppError> {
        let assigned = self.vehicles.assigned_route_ids().await?;
        self.routes.list_excluding(&assigned).await
    }

    pub async fn get_detail(&self, id: i64) -> Result<RouteDetail, AppError> {
        let route = self
            .routes
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", id))?;

        let mut times = self.routes.list_times_for_routes(&[id]).await?;
        times.sort_by_key(|t| (t.time, t.id));

        let stops = self.stops.list_by_route(id).await?;
        let vehicles = self.vehicles.list_for_route(id).await?;

        let vehicles = try_join_all(vehicles.into_iter().map(|v| self.assigned_vehicle(v))).await?;

        Ok(RouteDetail { route, times, stops, vehicles })
    }

    /// Chofer y última ubicación de un vehículo. La ubicación es best-effort.
    async fn assigned_vehicle(&self, vehicle: Vehicle) -> Result<AssignedVehicle, AppError> {
        let (driver, location) = futures::join!(
            self.driver_profile(vehicle.driver_id),
            self.vehicles.latest_location(vehicle.id)
        );

        let location = location_or_none(vehicle.id, location);

        Ok(AssignedVehicle { vehicle, driver: driver?, location })
    }

    async fn driver_profile(&self, driver_id: Option<i64>) -> Result<Option<UserResponse>, AppError> {
        match driver_id {
            Some(driver_id) => Ok(self.users.find_by_id(driver_id).await?.map(UserResponse::from)),
            None => Ok(None),
        }
    }

    /// Borrado en cascada: asignaciones, paradas, horas y la ruta, en ese orden
    pub async fn delete(&self, id: i64) -> Result<ApiResponse<Route>, AppError> {
        let assignments = self.vehicles.delete_assignments_for_route(id).await?;
        let stops = self.stops.delete_for_route(id).await?;
        let times = self.routes.delete_times_for_route(id).await?;

        let route = self
            .routes
            .delete(id)
            .await?
            .ok_or_else(|| not_found_error("Route", id))?;

        log::info!(
            "🗑️ Ruta {} eliminada ({} asignaciones, {} paradas, {} horas)",
            id,
            assignments,
            stops,
            times
        );
        Ok(ApiResponse::success_with_message(route, "Route deleted"))
    }

    pub async fn add_time(
        &self,
        route_id: i64,
        request: CreateRouteTimeRequest,
    ) -> Result<ApiResponse<RouteTime>, AppError> {
        if self.routes.find_by_id(route_id).await?.is_none() {
            return Err(not_found_error("Route", route_id));
        }

        let route_time = self
            .routes
            .create_time(route_id, request.time, request.active.unwrap_or(true))
            .await?;

        log::info!("🕐 Hora {} agregada a la ruta {}", route_time.time, route_id);
        Ok(ApiResponse::success_with_message(route_time, "Scheduled time added"))
    }

    pub async fn update_time(
        &self,
        time_id: i64,
        request: UpdateRouteTimeRequest,
    ) -> Result<ApiResponse<RouteTime>, AppError> {
        let route_time = self
            .routes
            .update_time(time_id, request.time, request.active)
            .await?
            .ok_or_else(|| not_found_error("Scheduled time", time_id))?;

        Ok(ApiResponse::success_with_message(route_time, "Scheduled time updated"))
    }

    pub async fn set_time_active(
        &self,
        time_id: i64,
        active: bool,
    ) -> Result<ApiResponse<RouteTime>, AppError> {
        self.update_time(time_id, UpdateRouteTimeRequest { time: None, active: Some(active) })
            .await
    }

    pub async fn delete_time(&self, time_id: i64) -> Result<ApiResponse<RouteTime>, AppError> {
        let route_time = self
            .routes
            .delete_time(time_id)
            .await?
            .ok_or_else(|| not_found_error("Scheduled time", time_id))?;

        Ok(ApiResponse::success_with_message(route_time, "Scheduled time deleted"))
    }
}

/// Agrupa las horas bajo su ruta conservando el orden de ambas listas
pub fn attach_times(routes: Vec<Route>, times: Vec<RouteTime>) -> Vec<RouteWithTimes> {
    let mut by_route: HashMap<i64, Vec<RouteTime>> = HashMap::new();
    for time in times {
        by_route.entry(time.route_id).or_default().push(time);
    }

    routes
        .into_iter()
        .map(|route| {
            let times = by_route.remove(&route.id).unwrap_or_default();
            RouteWithTimes { route, times }
        })
        .collect()
}

/// Un fallo al leer la ubicación se registra y se trata como "sin ubicación"
pub fn location_or_none(
    vehicle_id: i64,
    location: Result<Option<VehicleLocation>, AppError>,
) -> Option<VehicleLocation> {
    match location {
        Ok(location) => location,
        Err(e) => {
            log::warn!("⚠️ No se pudo leer la ubicación del vehículo {}: {}", vehicle_id, e);
            None
        }
    }
}

pub fn is_available_at(route: &RouteWithTimes, now: NaiveTime) -> bool {
    route.route.active && route.times.iter().any(|t| t.active && t.time < now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn route(id: i64, active: bool) -> Route {
        Route { id, name: format!("R{}", id), active }
    }

    fn time(id: i64, route_id: i64, at: NaiveTime, active: bool) -> RouteTime {
        RouteTime { id, route_id, time: at, active }
    }

    #[test]
    fn test_attach_times_groups_by_route() {
        let grouped = attach_times(
            vec![route(1, true), route(2, true), route(3, false)],
            vec![time(10, 2, hm(7, 0), true), time(11, 1, hm(8, 0), true), time(12, 2, hm(9, 0), false)],
        );

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].times.iter().map(|t| t.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(grouped[1].times.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10, 12]);
        assert!(grouped[2].times.is_empty());
    }

    #[test]
    fn test_available_requires_active_route() {
        let r = RouteWithTimes { route: route(1, false), times: vec![time(1, 1, hm(6, 0), true)] };
        assert!(!is_available_at(&r, hm(12, 0)));
    }

    #[test]
    fn test_available_requires_active_past_time() {
        let r = RouteWithTimes {
            route: route(1, true),
            times: vec![time(1, 1, hm(6, 0), false), time(2, 1, hm(13, 0), true)],
        };
        assert!(!is_available_at(&r, hm(12, 0)));
        assert!(is_available_at(&r, hm(13, 30)));
    }

    #[test]
    fn test_available_is_strictly_before_now() {
        let r = RouteWithTimes { route: route(1, true), times: vec![time(1, 1, hm(12, 0), true)] };
        assert!(!is_available_at(&r, hm(12, 0)));
        assert!(is_available_at(&r, NaiveTime::from_hms_opt(12, 0, 1).unwrap()));
    }

    #[test]
    fn test_location_failure_becomes_none() {
        let failed = location_or_none(3, Err(AppError::Database(sqlx::Error::RowNotFound)));
        assert!(failed.is_none());
    }

    #[test]
    fn test_location_is_kept_when_lookup_succeeds() {
        let ping = VehicleLocation {
            id: 9,
            vehicle_id: 3,
            latitude: 10.45,
            longitude: -64.17,
            recorded_at: chrono::Utc::now(),
        };
        assert_eq!(location_or_none(3, Ok(Some(ping.clone()))), Some(ping));
        assert_eq!(location_or_none(3, Ok(None)), None);
    }

    #[test]
    fn test_route_without_times_is_not_available() {
        let r = RouteWithTimes { route: route(1, true), times: Vec::new() };
        assert!(!is_available_at(&r, hm(23, 59)));
    }
}
