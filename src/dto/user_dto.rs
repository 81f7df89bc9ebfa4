use serde::Deserialize;
use std::fmt;

use crate::utils::patch::nullable;

// Request para crear una cuenta
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub alias: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: Option<String>,
    pub password: String,
}

// Request para actualizar una cuenta; la contraseña se vuelve a hashear
#[derive(Default, Deserialize)]
pub struct UpdateUserRequest {
    pub alias: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub user_type: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("alias", &self.alias)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("user_type", &self.user_type)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("alias", &self.alias)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("user_type", &self.user_type)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"alias":"ana","email":"ana@example.com","password":"hunter22"}"#,
        )
        .unwrap();
        let printed = format!("{:?}", request);
        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("<redacted>"));
    }
}
