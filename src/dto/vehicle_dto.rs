use serde::{Deserialize, Serialize};

use crate::models::{Route, RouteTime, Stop, Vehicle};
use crate::utils::patch::nullable;

// Request para crear un vehículo
#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub driver_id: Option<i64>,
    pub active: Option<bool>,
}

// Request para actualizar un vehículo; `driver_id: null` desasigna al chofer
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub driver_id: Option<Option<i64>>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoutesRequest {
    pub route_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRouteRequest {
    pub old_route_id: i64,
    pub new_route_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

// Ruta asignada a un vehículo con horas y paradas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedRoute {
    #[serde(flatten)]
    pub route: Route,
    pub times: Vec<RouteTime>,
    pub stops: Vec<Stop>,
}

// Vehículo con sus rutas asignadas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleWithRoutes {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub routes: Vec<AssignedRoute>,
}

// Indicador de chofer sin vehículo; no es un error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedDriver {
    pub success: bool,
    pub message: String,
    pub vehicle: Option<Vehicle>,
    pub routes: Vec<AssignedRoute>,
}

impl UnassignedDriver {
    pub fn new(driver_id: i64) -> Self {
        Self {
            success: false,
            message: format!("Driver {} has no vehicle assigned", driver_id),
            vehicle: None,
            routes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DriverVehicle {
    Assigned(VehicleWithRoutes),
    Unassigned(UnassignedDriver),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_driver_shape() {
        let json = serde_json::to_value(DriverVehicle::Unassigned(UnassignedDriver::new(5))).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["vehicle"].is_null());
        assert_eq!(json["routes"], serde_json::json!([]));
    }

    #[test]
    fn test_assigned_vehicle_is_flattened() {
        let assigned = DriverVehicle::Assigned(VehicleWithRoutes {
            vehicle: Vehicle { id: 3, name: "Bus 3".to_string(), driver_id: Some(5), active: true },
            routes: Vec::new(),
        });
        let json = serde_json::to_value(assigned).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["driver_id"], 5);
        assert!(json.get("success").is_none());
    }
}
