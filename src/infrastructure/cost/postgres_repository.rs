//! PostgreSQL cost store

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{Category, CostItem, CostRepository, DomainError, UserId};
use crate::infrastructure::storage::{map_sqlx_error, with_timeout};

/// PostgreSQL implementation of CostRepository
#[derive(Debug, Clone)]
pub struct PostgresCostRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresCostRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CostRepository for PostgresCostRepository {
    async fn append(&self, item: CostItem) -> Result<CostItem, DomainError> {
        with_timeout(self.timeout, "Insert cost", async {
            sqlx::query(
                r#"
                INSERT INTO costs (id, user_id, description, category, amount, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(item.user_id.value())
            .bind(&item.description)
            .bind(item.category.as_str())
            .bind(item.sum)
            .bind(item.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to insert cost", e))
        })
        .await?;

        Ok(item)
    }

    async fn find_by_user_and_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CostItem>, DomainError> {
        let rows = with_timeout(self.timeout, "Load costs", async {
            sqlx::query(
                r#"
                SELECT id, user_id, description, category, amount, created_at
                FROM costs
                WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
                ORDER BY created_at ASC
                "#,
            )
            .bind(user_id.value())
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to load costs", e))
        })
        .await?;

        rows.iter().map(row_to_cost).collect()
    }

    async fn total_for_user(&self, user_id: UserId) -> Result<f64, DomainError> {
        with_timeout(self.timeout, "Sum costs", async {
            sqlx::query_scalar::<_, f64>(
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM costs WHERE user_id = $1",
            )
            .bind(user_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to sum costs", e))
        })
        .await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        with_timeout(self.timeout, "Ping", async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Database unreachable", e))
        })
        .await?;

        Ok(())
    }
}

fn row_to_cost(row: &PgRow) -> Result<CostItem, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read cost row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read)?;
    let user_id: i64 = row.try_get("user_id").map_err(read)?;
    let description: String = row.try_get("description").map_err(read)?;
    let category: String = row.try_get("category").map_err(read)?;
    let sum: f64 = row.try_get("amount").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;

    let user_id = UserId::new(user_id)
        .map_err(|_| DomainError::storage(format!("Invalid user_id {} in costs", user_id)))?;
    let category: Category = category
        .parse()
        .map_err(|_| DomainError::storage(format!("Invalid category '{}' in costs", category)))?;

    Ok(CostItem {
        id,
        user_id,
        description,
        category,
        sum,
        created_at,
    })
}
