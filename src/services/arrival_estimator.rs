//! Estimador de llegada
//!
//! Combina la parada, la última ubicación del primer vehículo asignado a la
//! ruta y dos consultas al servicio de ruteo (usuario → parada y
//! vehículo → parada).

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::clients::{Coordinates, RouteLeg, RoutingProvider};
use crate::dto::eta_dto::{EtaEstimate, EtaLeg};
use crate::models::{Stop, Vehicle, VehicleLocation};
use crate::repositories::{StopRepository, VehicleRepository};
use crate::utils::errors::AppError;

pub const USER_LEG_LABEL: &str = "user→stop";
pub const VEHICLE_LEG_LABEL: &str = "vehicle→stop";

/// Lecturas que necesita el estimador
#[async_trait]
pub trait FleetLookup: Send + Sync {
    async fn find_stop(&self, stop_id: i64) -> Result<Option<Stop>, AppError>;
    async fn vehicles_for_route(&self, route_id: i64) -> Result<Vec<Vehicle>, AppError>;
    async fn latest_location(&self, vehicle_id: i64) -> Result<Option<VehicleLocation>, AppError>;
}

pub struct PgFleetLookup {
    stops: StopRepository,
    vehicles: VehicleRepository,
}

impl PgFleetLookup {
    pub fn new(pool: PgPool) -> Self {
        Self {
            stops: StopRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }
}

#[async_trait]
impl FleetLookup for PgFleetLookup {
    async fn find_stop(&self, stop_id: i64) -> Result<Option<Stop>, AppError> {
        self.stops.find_by_id(stop_id).await
    }

    async fn vehicles_for_route(&self, route_id: i64) -> Result<Vec<Vehicle>, AppError> {
        self.vehicles.list_for_route(route_id).await
    }

    async fn latest_location(&self, vehicle_id: i64) -> Result<Option<VehicleLocation>, AppError> {
        self.vehicles.latest_location(vehicle_id).await
    }
}

pub struct ArrivalEstimator {
    lookup: Arc<dyn FleetLookup>,
    routing: Arc<dyn RoutingProvider>,
}

impl ArrivalEstimator {
    pub fn new(lookup: Arc<dyn FleetLookup>, routing: Arc<dyn RoutingProvider>) -> Self {
        Self { lookup, routing }
    }

    pub async fn estimate(
        &self,
        route_id: i64,
        user: Coordinates,
        stop_id: i64,
    ) -> Result<EtaEstimate, AppError> {
        let stop = self
            .lookup
            .find_stop(stop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("stop not found".to_string()))?;

        // Siempre el primer vehículo devuelto, sin criterio de cercanía
        let vehicle = self
            .lookup
            .vehicles_for_route(route_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Unprocessable("no vehicle assigned".to_string()))?;

        let location = self
            .lookup
            .latest_location(vehicle.id)
            .await?
            .ok_or_else(|| AppError::Unprocessable("vehicle has no recorded location".to_string()))?;

        let target = stop.coordinates();
        let (user_leg, vehicle_leg) = futures::try_join!(
            self.routing.leg(user, target),
            self.routing.leg(location.coordinates(), target)
        )?;

        log::info!(
            "⏱️ ETA ruta {} parada {} vehículo {}: usuario {:.0}s, vehículo {:.0}s",
            route_id,
            stop_id,
            vehicle.id,
            user_leg.duration_seconds,
            vehicle_leg.duration_seconds
        );

        Ok(compose_estimate(route_id, stop_id, vehicle.id, user_leg, vehicle_leg))
    }
}

/// Minutos redondeados hacia arriba: la estimación nunca es optimista
pub fn ceil_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).ceil() as i64
}

/// Metros a kilómetros con dos decimales
pub fn round_kilometers(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

pub fn compose_estimate(
    route_id: i64,
    stop_id: i64,
    vehicle_id: i64,
    user_leg: RouteLeg,
    vehicle_leg: RouteLeg,
) -> EtaEstimate {
    let user = EtaLeg {
        label: USER_LEG_LABEL.to_string(),
        minutes: ceil_minutes(user_leg.duration_seconds),
        kilometers: round_kilometers(user_leg.distance_meters),
    };
    let vehicle = EtaLeg {
        label: VEHICLE_LEG_LABEL.to_string(),
        minutes: ceil_minutes(vehicle_leg.duration_seconds),
        kilometers: round_kilometers(vehicle_leg.distance_meters),
    };

    EtaEstimate {
        route_id,
        stop_id,
        vehicle_id,
        user_minutes: user.minutes,
        user_kilometers: user.kilometers,
        vehicle_minutes: vehicle.minutes,
        vehicle_kilometers: vehicle.kilometers,
        breakdown: vec![user, vehicle],
    }
}
