//! PostgreSQL report cache

use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::{CategoryCosts, DomainError, MonthlyReport, ReportKey, ReportRepository};
use crate::infrastructure::storage::{map_sqlx_error, with_timeout};

/// PostgreSQL implementation of ReportRepository
///
/// Relies on the unique index over `(user_id, year, month)`; a duplicate
/// insert surfaces as `DomainError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresReportRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn find_by_key(&self, key: ReportKey) -> Result<Option<MonthlyReport>, DomainError> {
        let row = with_timeout(self.timeout, "Load report", async {
            sqlx::query(
                r#"
                SELECT costs
                FROM reports
                WHERE user_id = $1 AND year = $2 AND month = $3
                "#,
            )
            .bind(key.user_id.value())
            .bind(key.year)
            .bind(key.month as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to load report", e))
        })
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(costs): Json<Vec<CategoryCosts>> = row
            .try_get("costs")
            .map_err(|e| DomainError::storage(format!("Failed to read report row: {}", e)))?;

        Ok(Some(MonthlyReport {
            user_id: key.user_id,
            year: key.year,
            month: key.month,
            costs,
        }))
    }

    async fn create_unique(&self, report: MonthlyReport) -> Result<MonthlyReport, DomainError> {
        with_timeout(self.timeout, "Insert report", async {
            sqlx::query(
                r#"
                INSERT INTO reports (user_id, year, month, costs)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(report.user_id.value())
            .bind(report.year)
            .bind(report.month as i32)
            .bind(Json(&report.costs))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to insert report", e))
        })
        .await?;

        Ok(report)
    }
}
