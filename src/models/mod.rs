//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean
//! las tablas PostgreSQL de la flota.

pub mod route;
pub mod stop;
pub mod user;
pub mod vehicle;

pub use route::{Route, RouteTime};
pub use stop::Stop;
pub use user::{User, UserResponse, DRIVER_USER_TYPE};
pub use vehicle::{Vehicle, VehicleLocation, VehicleRoute};
