//! PostgreSQL user directory

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{DomainError, UserDirectory, UserId};
use crate::infrastructure::storage::{map_sqlx_error, with_timeout};

/// Reads the `users` table owned by the users service
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool, DomainError> {
        with_timeout(self.timeout, "Look up user", async {
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to look up user", e))
        })
        .await
    }
}
