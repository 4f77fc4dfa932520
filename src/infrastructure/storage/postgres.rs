//! PostgreSQL connection pooling

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
    /// Upper bound for a single store call, in seconds
    pub statement_timeout_secs: u64,
}

impl PostgresConfig {
    /// Build from the `database` config section. `None` when no URL is configured.
    pub fn from_database_config(config: &DatabaseConfig) -> Option<Self> {
        let url = config.resolve_url()?;

        Some(Self {
            url,
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
            statement_timeout_secs: config.statement_timeout_secs,
        })
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }
}

/// Open a connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Run a store call, failing with a storage error once `limit` elapses
pub async fn with_timeout<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::storage(format!(
            "{} timed out after {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}

/// Map a sqlx error, turning unique violations into `DomainError::Conflict`
pub(crate) fn map_sqlx_error(context: &str, error: sqlx::Error) -> DomainError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(format!("{}: {}", context, db.message()))
        }
        _ => DomainError::storage(format!("{}: {}", context, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), "ping", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_elapsed_is_storage_error() {
        let result: Result<(), DomainError> =
            with_timeout(Duration::from_millis(10), "slow query", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, DomainError::Storage { .. }));
        assert!(error.to_string().contains("slow query timed out"));
    }

    #[test]
    fn test_config_requires_url() {
        let database = DatabaseConfig {
            url: Some("postgres://localhost/costs".to_string()),
            statement_timeout_secs: 3,
            ..Default::default()
        };

        let config = PostgresConfig::from_database_config(&database).unwrap();
        assert_eq!(config.url, "postgres://localhost/costs");
        assert_eq!(config.statement_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_non_unique_errors_are_storage_errors() {
        let error = map_sqlx_error("Failed to load", sqlx::Error::RowNotFound);
        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
