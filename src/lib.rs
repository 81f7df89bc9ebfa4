//! Fleet Tracker
//!
//! Backend REST para una flota de transporte público: rutas, paradas,
//! horas programadas, vehículos, choferes, pings GPS y estimación de llegada.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
