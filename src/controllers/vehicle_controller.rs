use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

use crate::dto::vehicle_dto::{
    AssignedRoute, ChangeRouteRequest, CreateVehicleRequest, DriverVehicle, RecordLocationRequest,
    UnassignedDriver, UpdateVehicleRequest, VehicleWithRoutes,
};
use crate::dto::ApiResponse;
use crate::models::{
    Route, RouteTime, Stop, UserResponse, Vehicle, VehicleLocation, VehicleRoute, DRIVER_USER_TYPE,
};
use crate::repositories::{RouteRepository, StopRepository, UserRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    repository: VehicleRepository,
    routes: RouteRepository,
    stops: StopRepository,
    users: UserRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            stops: StopRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self
            .repository
            .create(&request.name, request.driver_id, request.active.unwrap_or(true))
            .await?;

        log::info!("🚌 Vehículo {} '{}' creado", vehicle.id, vehicle.name);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle created"))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self
            .repository
            .update(id, request.name, request.driver_id, request.active)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        log::info!("✏️ Vehículo {} actualizado", id);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated"))
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<ApiResponse<Vehicle>, AppError> {
        self.update(id, UpdateVehicleRequest { active: Some(active), ..Default::default() })
            .await
    }

    /// Inserta solo las rutas que el vehículo aún no tiene
    pub async fn assign_routes(
        &self,
        vehicle_id: i64,
        route_ids: Vec<i64>,
    ) -> Result<Vec<VehicleRoute>, AppError> {
        if self.repository.find_by_id(vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", vehicle_id));
        }

        let existing = self.repository.assignments_for_vehicle(vehicle_id).await?;
        let new_ids = new_route_ids(&existing, &route_ids);
        if new_ids.is_empty() {
            log::info!("ℹ️ Vehículo {} ya tiene todas las rutas pedidas", vehicle_id);
            return Ok(Vec::new());
        }

        let found: HashSet<i64> = self
            .routes
            .list_by_ids(&new_ids)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        if let Some(missing) = new_ids.iter().find(|id| !found.contains(id)) {
            return Err(not_found_error("Route", *missing));
        }

        let inserted = self.repository.insert_assignments(vehicle_id, &new_ids).await?;
        log::info!("🔗 Vehículo {}: {} rutas asignadas", vehicle_id, inserted.len());
        Ok(inserted)
    }

    pub async fn list_all(&self) -> Result<Vec<VehicleWithRoutes>, AppError> {
        let vehicles = self.repository.list_all().await?;
        self.with_routes(vehicles).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<VehicleWithRoutes, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        self.with_routes(vec![vehicle])
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    /// Un chofer sin vehículo es un resultado normal, no un 404
    pub async fn get_by_driver(&self, driver_id: i64) -> Result<DriverVehicle, AppError> {
        let Some(vehicle) = self.repository.find_by_driver(driver_id).await? else {
            return Ok(DriverVehicle::Unassigned(UnassignedDriver::new(driver_id)));
        };

        let mut nested = self.with_routes(vec![vehicle]).await?;
        Ok(match nested.pop() {
            Some(vehicle) => DriverVehicle::Assigned(vehicle),
            None => DriverVehicle::Unassigned(UnassignedDriver::new(driver_id)),
        })
    }

    pub async fn list_without_route(&self) -> Result<Vec<Vehicle>, AppError> {
        let assigned = self.repository.assigned_vehicle_ids().await?;
        self.repository.list_excluding(&assigned).await
    }

    pub async fn list_drivers_without_vehicle(&self) -> Result<Vec<UserResponse>, AppError> {
        let occupied = self.repository.occupied_driver_ids().await?;
        let drivers = self
            .users
            .list_by_type_excluding(DRIVER_USER_TYPE, &occupied)
            .await?;
        Ok(drivers.into_iter().map(UserResponse::from).collect())
    }

    pub async fn record_location(
        &self,
        vehicle_id: i64,
        request: RecordLocationRequest,
    ) -> Result<ApiResponse<VehicleLocation>, AppError> {
        let location = self
            .repository
            .insert_location(vehicle_id, request.latitude, request.longitude)
            .await?;

        log::debug!(
            "📡 Vehículo {} en ({}, {})",
            vehicle_id,
            location.latitude,
            location.longitude
        );
        Ok(ApiResponse::success(location))
    }

    pub async fn list_locations(&self, vehicle_id: i64) -> Result<Vec<VehicleLocation>, AppError> {
        self.repository.list_locations(vehicle_id).await
    }

    pub async fn latest_location(&self, vehicle_id: i64) -> Result<Option<VehicleLocation>, AppError> {
        self.repository.latest_location(vehicle_id).await
    }

    pub async fn change_route(
        &self,
        vehicle_id: i64,
        request: ChangeRouteRequest,
    ) -> Result<ApiResponse<VehicleRoute>, AppError> {
        let assignment = self
            .repository
            .change_assignment(vehicle_id, request.old_route_id, request.new_route_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicle {} is not assigned to route {}",
                    vehicle_id, request.old_route_id
                ))
            })?;

        log::info!(
            "🔀 Vehículo {}: ruta {} -> {}",
            vehicle_id,
            request.old_route_id,
            request.new_route_id
        );
        Ok(ApiResponse::success_with_message(assignment, "Route changed"))
    }

    pub async fn unassign_driver(&self, vehicle_id: i64) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self
            .repository
            .update(vehicle_id, None, Some(None), None)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        log::info!("👋 Chofer desasignado del vehículo {}", vehicle_id);
        Ok(ApiResponse::success_with_message(vehicle, "Driver unassigned"))
    }

    pub async fn unassign_route(
        &self,
        vehicle_id: i64,
        route_id: i64,
    ) -> Result<ApiResponse<VehicleRoute>, AppError> {
        let assignment = self
            .repository
            .delete_assignment(vehicle_id, route_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicle {} is not assigned to route {}",
                    vehicle_id, route_id
                ))
            })?;

        Ok(ApiResponse::success_with_message(assignment, "Route unassigned"))
    }

    /// Borrado en cascada: asignaciones y luego el vehículo
    pub async fn delete(&self, id: i64) -> Result<ApiResponse<Vehicle>, AppError> {
        let assignments = self.repository.delete_assignments_for_vehicle(id).await?;

        let vehicle = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        log::info!("🗑️ Vehículo {} eliminado ({} asignaciones)", id, assignments);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle deleted"))
    }

    async fn with_routes(&self, vehicles: Vec<Vehicle>) -> Result<Vec<VehicleWithRoutes>, AppError> {
        if vehicles.is_empty() {
            return Ok(Vec::new());
        }

        let vehicle_ids: Vec<i64> = vehicles.iter().map(|v| v.id).collect();
        let assignments = self.repository.assignments_for_vehicles(&vehicle_ids).await?;

        let mut route_ids: Vec<i64> = assignments.iter().map(|a| a.route_id).collect();
        route_ids.sort_unstable();
        route_ids.dedup();

        let routes = self.routes.list_by_ids(&route_ids).await?;
        let times = self.routes.list_times_for_routes(&route_ids).await?;
        let stops = self.stops.list_for_routes(&route_ids).await?;

        Ok(nest_vehicles(vehicles, assignments, routes, times, stops))
    }
}

/// Ids pedidos que todavía no están asignados, sin duplicados y en el orden pedido
pub fn new_route_ids(existing: &[VehicleRoute], requested: &[i64]) -> Vec<i64> {
    let mut seen: HashSet<i64> = existing.iter().map(|a| a.route_id).collect();
    requested
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Arma vehículo -> rutas -> (horas, paradas)
pub fn nest_vehicles(
    vehicles: Vec<Vehicle>,
    assignments: Vec<VehicleRoute>,
    routes: Vec<Route>,
    times: Vec<RouteTime>,
    stops: Vec<Stop>,
) -> Vec<VehicleWithRoutes> {
    let mut times_by_route: HashMap<i64, Vec<RouteTime>> = HashMap::new();
    for time in times {
        times_by_route.entry(time.route_id).or_default().push(time);
    }

    let mut stops_by_route: HashMap<i64, Vec<Stop>> = HashMap::new();
    for stop in stops {
        stops_by_route.entry(stop.route_id).or_default().push(stop);
    }

    let routes: HashMap<i64, AssignedRoute> = routes
        .into_iter()
        .map(|route| {
            let id = route.id;
            let assigned = AssignedRoute {
                times: times_by_route.remove(&id).unwrap_or_default(),
                stops: stops_by_route.remove(&id).unwrap_or_default(),
                route,
            };
            (id, assigned)
        })
        .collect();

    let mut routes_by_vehicle: HashMap<i64, Vec<AssignedRoute>> = HashMap::new();
    for assignment in assignments {
        if let Some(route) = routes.get(&assignment.route_id) {
            routes_by_vehicle
                .entry(assignment.vehicle_id)
                .or_default()
                .push(route.clone());
        }
    }

    vehicles
        .into_iter()
        .map(|vehicle| VehicleWithRoutes {
            routes: routes_by_vehicle.remove(&vehicle.id).unwrap_or_default(),
            vehicle,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn assignment(vehicle_id: i64, route_id: i64) -> VehicleRoute {
        VehicleRoute { vehicle_id, route_id }
    }

    fn vehicle(id: i64) -> Vehicle {
        Vehicle { id, name: format!("Bus {}", id), driver_id: None, active: true }
    }

    fn route(id: i64) -> Route {
        Route { id, name: format!("R{}", id), active: true }
    }

    #[test]
    fn test_new_route_ids_filters_existing() {
        let existing = vec![assignment(1, 10), assignment(1, 11)];
        assert_eq!(new_route_ids(&existing, &[10, 12, 11, 13]), vec![12, 13]);
    }

    #[test]
    fn test_new_route_ids_is_empty_on_repeat() {
        let existing = vec![assignment(1, 10), assignment(1, 11)];
        assert!(new_route_ids(&existing, &[10, 11]).is_empty());
        assert!(new_route_ids(&existing, &[]).is_empty());
    }

    #[test]
    fn test_new_route_ids_collapses_duplicates() {
        assert_eq!(new_route_ids(&[], &[5, 5, 6, 5]), vec![5, 6]);
    }

    #[test]
    fn test_nest_vehicles() {
        let at = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        let nested = nest_vehicles(
            vec![vehicle(1), vehicle(2)],
            vec![assignment(1, 10), assignment(1, 11)],
            vec![route(10), route(11)],
            vec![RouteTime { id: 100, route_id: 10, time: at, active: true }],
            vec![Stop {
                id: 200,
                name: "UDO".to_string(),
                route_id: 11,
                latitude: 10.45,
                longitude: -64.16,
            }],
        );

        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].routes.len(), 2);
        assert_eq!(nested[0].routes[0].route.id, 10);
        assert_eq!(nested[0].routes[0].times.len(), 1);
        assert!(nested[0].routes[0].stops.is_empty());
        assert_eq!(nested[0].routes[1].stops[0].id, 200);
        assert!(nested[1].routes.is_empty());
    }

    #[test]
    fn test_nest_vehicles_shares_route_between_vehicles() {
        let nested = nest_vehicles(
            vec![vehicle(1), vehicle(2)],
            vec![assignment(1, 10), assignment(2, 10)],
            vec![route(10)],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(nested[0].routes[0].route.id, 10);
        assert_eq!(nested[1].routes[0].route.id, 10);
    }
}
