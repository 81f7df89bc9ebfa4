//! Modelo de User
//!
//! Cuenta de usuario o chofer. El hash de la contraseña nunca se serializa:
//! las respuestas usan `UserResponse`.

use serde::Serialize;
use sqlx::FromRow;

/// Tipo de cuenta asignado a los choferes
pub const DRIVER_USER_TYPE: &str = "driver";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub alias: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: String,
    pub password_hash: String,
}

/// Response de usuario para la API, sin credenciales
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub alias: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            alias: user.alias,
            email: user.email,
            phone: user.phone,
            user_type: user.user_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_has_no_credential() {
        let user = User {
            id: 1,
            alias: "pedro".to_string(),
            email: "pedro@example.com".to_string(),
            phone: None,
            user_type: DRIVER_USER_TYPE.to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["user_type"], "driver");
    }
}
