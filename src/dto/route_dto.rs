use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::{Route, RouteTime, Stop, UserResponse, Vehicle, VehicleLocation};

// Request para crear una ruta
#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    pub name: String,
    pub active: Option<bool>,
}

// Request para editar una ruta
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRouteRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

// Body de los endpoints de activar/desactivar
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateRouteTimeRequest {
    pub time: NaiveTime,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRouteTimeRequest {
    pub time: Option<NaiveTime>,
    pub active: Option<bool>,
}

// Ruta con sus horas programadas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteWithTimes {
    #[serde(flatten)]
    pub route: Route,
    pub times: Vec<RouteTime>,
}

// Ruta recién creada con su parada por defecto
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteWithStops {
    #[serde(flatten)]
    pub route: Route,
    pub stops: Vec<Stop>,
}

// Vehículo asignado con chofer y última ubicación conocida
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub driver: Option<UserResponse>,
    pub location: Option<VehicleLocation>,
}

// Detalle completo de una ruta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: Route,
    pub times: Vec<RouteTime>,
    pub stops: Vec<Stop>,
    pub vehicles: Vec<AssignedVehicle>,
}
