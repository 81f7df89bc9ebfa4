//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::clients::{OsrmRoutingClient, RoutingProvider};
use crate::config::environment::EnvironmentConfig;
use crate::services::{ArrivalEstimator, PgFleetLookup};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub routing: Arc<dyn RoutingProvider>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let routing = Arc::new(OsrmRoutingClient::new(
            config.routing_base_url.clone(),
            config.routing_profile.clone(),
        ));
        Self::with_routing(pool, config, routing)
    }

    pub fn with_routing(
        pool: PgPool,
        config: EnvironmentConfig,
        routing: Arc<dyn RoutingProvider>,
    ) -> Self {
        Self { pool, config, routing }
    }

    pub fn arrival_estimator(&self) -> ArrivalEstimator {
        ArrivalEstimator::new(
            Arc::new(PgFleetLookup::new(self.pool.clone())),
            self.routing.clone(),
        )
    }
}
