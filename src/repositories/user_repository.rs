use sqlx::PgPool;

use crate::models::User;
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id, alias, email, phone, user_type, password_hash";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        alias: &str,
        email: &str,
        phone: Option<&str>,
        user_type: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (alias, email, phone, user_type, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(alias)
        .bind(email)
        .bind(phone)
        .bind(user_type)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn list_by_type(&self, user_type: &str) -> Result<Vec<User>, AppError> {
        self.list_by_type_excluding(user_type, &[]).await
    }

    /// Cuentas del tipo dado cuyo id no está en `excluded`
    pub async fn list_by_type_excluding(
        &self,
        user_type: &str,
        excluded: &[i64],
    ) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE user_type = $1 AND NOT (id = ANY($2)) ORDER BY id",
            USER_COLUMNS
        ))
        .bind(user_type)
        .bind(excluded)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update(
        &self,
        id: i64,
        alias: Option<String>,
        email: Option<String>,
        phone: Option<Option<String>>,
        user_type: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET alias = COALESCE($2, alias),
                email = COALESCE($3, email),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                user_type = COALESCE($6, user_type),
                password_hash = COALESCE($7, password_hash)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(alias)
        .bind(email)
        .bind(phone.is_some())
        .bind(phone.flatten())
        .bind(user_type)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
