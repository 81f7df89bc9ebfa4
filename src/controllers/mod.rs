//! Controladores
//!
//! Lógica de cada registro (rutas, paradas, vehículos y cuentas) sobre
//! los repositorios.

pub mod route_controller;
pub mod stop_controller;
pub mod user_controller;
pub mod vehicle_controller;

pub use route_controller::RouteController;
pub use stop_controller::StopController;
pub use user_controller::UserController;
pub use vehicle_controller::VehicleController;
