//! Repositorios
//!
//! Acceso a PostgreSQL por entidad. Cada repositorio envuelve el pool
//! compartido y expone consultas parametrizadas.

pub mod route_repository;
pub mod stop_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use route_repository::RouteRepository;
pub use stop_repository::StopRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
