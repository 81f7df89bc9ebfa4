use sqlx::PgPool;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::dto::ApiResponse;
use crate::models::{UserResponse, DRIVER_USER_TYPE};
use crate::repositories::UserRepository;
use crate::utils::errors::{not_found_error, AppError};

/// Costo de bcrypt para las credenciales
pub const HASH_COST: u32 = 10;

/// Tipo asignado cuando la cuenta se crea sin uno explícito
pub const DEFAULT_USER_TYPE: &str = "passenger";

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let password_hash = hash_password(request.password).await?;
        let user_type = request.user_type.as_deref().unwrap_or(DEFAULT_USER_TYPE);

        let user = self
            .repository
            .create(
                &request.alias,
                &request.email,
                request.phone.as_deref(),
                user_type,
                &password_hash,
            )
            .await?;

        log::info!("👤 Cuenta {} creada ({})", user.id, user.user_type);
        Ok(ApiResponse::success_with_message(user.into(), "User created"))
    }

    /// Devuelve `None` tanto si no existe como si la consulta falla
    pub async fn find_by_email(&self, email: &str) -> Option<UserResponse> {
        match self.repository.find_by_email(email).await {
            Ok(user) => user.map(UserResponse::from),
            Err(e) => {
                log::warn!("⚠️ Búsqueda por email falló: {}", e);
                None
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn list_drivers(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list_by_type(DRIVER_USER_TYPE).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let password_hash = match request.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let user = self
            .repository
            .update(
                id,
                request.alias,
                request.email,
                request.phone,
                request.user_type,
                password_hash,
            )
            .await?
            .ok_or_else(|| not_found_error("User", id))?;

        log::info!("✏️ Cuenta {} actualizada", id);
        Ok(ApiResponse::success_with_message(user.into(), "User updated"))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found_error("User", id))?;

        log::info!("🗑️ Cuenta {} eliminada", id);
        Ok(ApiResponse::success_with_message(user.into(), "User deleted"))
    }
}

/// bcrypt bloquea la CPU, así que corre fuera del executor
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_password_is_verifiable() {
        let hash = hash_password("s3cret-pass".to_string()).await.unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(hash.starts_with("$2"));
        assert!(bcrypt::verify("s3cret-pass", &hash).unwrap());
        assert!(!bcrypt::verify("other", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_hash_password_is_salted() {
        let a = hash_password("same".to_string()).await.unwrap();
        let b = hash_password("same".to_string()).await.unwrap();
        assert_ne!(a, b);
    }
}
