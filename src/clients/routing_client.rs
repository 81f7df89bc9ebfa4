//! Cliente del servicio de ruteo
//!
//! Consulta tiempo y distancia de manejo entre dos coordenadas contra un
//! servidor compatible con la API `/route/v1` de OSRM.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Par latitud/longitud en grados decimales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Resultado de un tramo punto a punto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    pub duration_seconds: f64,
    pub distance_meters: f64,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected routing response: {0}")]
    Malformed(String),

    #[error("routing service found no route ({0})")]
    NoRoute(String),
}

impl From<RoutingError> for crate::utils::errors::AppError {
    fn from(e: RoutingError) -> Self {
        crate::utils::errors::AppError::ExternalApi(e.to_string())
    }
}

/// Proveedor de tramos de manejo
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn leg(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg, RoutingError>;
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    distance: f64,
}

pub struct OsrmRoutingClient {
    base_url: String,
    profile: String,
    client: Client,
}

impl OsrmRoutingClient {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
            client: Client::new(),
        }
    }

    /// OSRM espera `lon,lat;lon,lat`
    fn route_url(&self, from: Coordinates, to: Coordinates) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.base_url,
            self.profile,
            from.longitude,
            from.latitude,
            to.longitude,
            to.latitude
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmRoutingClient {
    async fn leg(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg, RoutingError> {
        let url = self.route_url(from, to);
        log::debug!("🗺️ Consultando ruteo: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "FleetTracker/1.0")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("❌ Ruteo falló con status {}: {}", status, body);
            return Err(RoutingError::Status { status: status.as_u16(), body });
        }

        parse_osrm_leg(&body)
    }
}

fn parse_osrm_leg(body: &str) -> Result<RouteLeg, RoutingError> {
    let parsed: OsrmResponse =
        serde_json::from_str(body).map_err(|e| RoutingError::Malformed(e.to_string()))?;

    if parsed.code != "Ok" {
        return Err(RoutingError::NoRoute(
            parsed.message.unwrap_or(parsed.code),
        ));
    }

    let route = parsed
        .routes
        .first()
        .ok_or_else(|| RoutingError::Malformed("empty routes array".to_string()))?;

    Ok(RouteLeg {
        duration_seconds: route.duration,
        distance_meters: route.distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url_uses_lon_lat_order() {
        let client = OsrmRoutingClient::new("http://osrm.local/", "driving");
        let url = client.route_url(Coordinates::new(10.5, -64.2), Coordinates::new(10.4, -64.1));
        assert_eq!(
            url,
            "http://osrm.local/route/v1/driving/-64.2,10.5;-64.1,10.4?overview=false"
        );
    }

    #[test]
    fn test_parse_ok_response() {
        let body = r#"{"code":"Ok","routes":[{"duration":61.0,"distance":1234.5,"legs":[]}],"waypoints":[]}"#;
        let leg = parse_osrm_leg(body).unwrap();
        assert_eq!(leg.duration_seconds, 61.0);
        assert_eq!(leg.distance_meters, 1234.5);
    }

    #[test]
    fn test_parse_no_route() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;
        match parse_osrm_leg(body) {
            Err(RoutingError::NoRoute(msg)) => assert_eq!(msg, "Impossible route between points"),
            other => panic!("expected NoRoute, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_osrm_leg("<html>"), Err(RoutingError::Malformed(_))));
        assert!(matches!(
            parse_osrm_leg(r#"{"code":"Ok","routes":[]}"#),
            Err(RoutingError::Malformed(_))
        ));
    }
}
