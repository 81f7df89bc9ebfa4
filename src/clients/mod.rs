//! Clientes HTTP
//!
//! Este módulo contiene los clientes para comunicarse con APIs externas.

pub mod routing_client;

pub use routing_client::{Coordinates, OsrmRoutingClient, RouteLeg, RoutingError, RoutingProvider};
