//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, la tabla de asignación
//! vehículo-ruta y los pings de ubicación GPS.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehículo de la flota - mapea la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub driver_id: Option<i64>,
    pub active: bool,
}

/// Fila de la tabla vehicle_routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VehicleRoute {
    pub vehicle_id: i64,
    pub route_id: i64,
}

/// Ping GPS inmutable. La ubicación actual es el ping más reciente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VehicleLocation {
    pub id: i64,
    pub vehicle_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

impl VehicleLocation {
    pub fn coordinates(&self) -> crate::clients::Coordinates {
        crate::clients::Coordinates::new(self.latitude, self.longitude)
    }
}
