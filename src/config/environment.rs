//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use thiserror::Error;

/// Errores al leer la configuración
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub routing_base_url: String,
    pub routing_profile: String,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_number(&lookup, "PORT", 3000)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url,
            db_max_connections: parse_number(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            routing_base_url: lookup("ROUTING_BASE_URL")
                .unwrap_or_else(|| "https://router.project-osrm.org".to_string()),
            routing_profile: lookup("ROUTING_PROFILE").unwrap_or_else(|| "driving".to_string()),
        })
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
