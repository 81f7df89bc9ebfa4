//! Services module
//!
//! Este módulo contiene la lógica de negocio que combina varios
//! repositorios con integraciones externas.

pub mod arrival_estimator;

pub use arrival_estimator::{ArrivalEstimator, FleetLookup, PgFleetLookup};
