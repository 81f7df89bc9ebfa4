//! Modelo de Stop
//!
//! Una parada geográfica que pertenece a una ruta.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub route_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn coordinates(&self) -> crate::clients::Coordinates {
        crate::clients::Coordinates::new(self.latitude, self.longitude)
    }
}
