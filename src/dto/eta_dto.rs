use serde::{Deserialize, Serialize};

// Query del endpoint de ETA: posición del usuario y parada destino
#[derive(Debug, Deserialize)]
pub struct EtaQuery {
    pub lat: f64,
    pub lon: f64,
    pub stop_id: i64,
}

// Un tramo del cálculo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtaLeg {
    pub label: String,
    pub minutes: i64,
    pub kilometers: f64,
}

// Estimación de llegada en dos tramos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtaEstimate {
    pub route_id: i64,
    pub stop_id: i64,
    pub vehicle_id: i64,
    pub user_minutes: i64,
    pub user_kilometers: f64,
    pub vehicle_minutes: i64,
    pub vehicle_kilometers: f64,
    pub breakdown: Vec<EtaLeg>,
}
