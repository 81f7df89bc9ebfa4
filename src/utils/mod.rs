//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y
//! deserialización de actualizaciones parciales.

pub mod errors;
pub mod patch;

pub use errors::*;
