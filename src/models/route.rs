//! Modelos de Route y RouteTime
//!
//! Mapean las tablas `routes` y `route_times`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ruta de transporte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// Hora programada de salida de una ruta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RouteTime {
    pub id: i64,
    pub route_id: i64,
    pub time: NaiveTime,
    pub active: bool,
}
