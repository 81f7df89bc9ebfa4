use serde::Deserialize;

// Request para crear una parada
#[derive(Debug, Deserialize)]
pub struct CreateStopRequest {
    pub name: String,
    pub route_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

// Request para editar una parada
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStopRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
