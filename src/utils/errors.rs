//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    /// Status HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estable que consumen los clientes
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unprocessable(_) => "UNPROCESSABLE",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn into_error_response(self) -> ErrorResponse {
        let code = self.code().to_string();
        match self {
            AppError::Database(e) => {
                log::error!("❌ Database error: {}", e);
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: Some(json!({ "sql_error": e.to_string() })),
                    code,
                }
            }

            AppError::NotFound(msg) => {
                log::warn!("🔍 Resource not found: {}", msg);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code,
                }
            }

            AppError::Unprocessable(msg) => {
                log::warn!("⚠️ Unprocessable: {}", msg);
                ErrorResponse {
                    error: "Unprocessable Entity".to_string(),
                    message: msg,
                    details: None,
                    code,
                }
            }

            AppError::Hash(msg) => {
                log::error!("❌ Hash error: {}", msg);
                ErrorResponse {
                    error: "Hash Error".to_string(),
                    message: "An error occurred while processing credentials".to_string(),
                    details: Some(json!({ "hash_error": msg })),
                    code,
                }
            }

            AppError::ExternalApi(msg) => {
                log::error!("❌ External API error: {}", msg);
                ErrorResponse {
                    error: "External API Error".to_string(),
                    message: "An error occurred while communicating with external service".to_string(),
                    details: Some(json!({ "external_api_error": msg })),
                    code,
                }
            }

            AppError::Internal(msg) => {
                log::error!("❌ Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: Some(json!({ "internal_error": msg })),
                    code,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.into_error_response();
        (status, Json(body)).into_response()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hash(e.to_string())
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
