//! Report cache repository trait

use async_trait::async_trait;

use super::entity::{MonthlyReport, ReportKey};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persisted monthly reports, unique per `(user, year, month)`
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find the stored report for an exact key
    async fn find_by_key(&self, key: ReportKey) -> Result<Option<MonthlyReport>, DomainError>;

    /// Store a report. Fails with `DomainError::Conflict` if the key is taken.
    async fn create_unique(&self, report: MonthlyReport) -> Result<MonthlyReport, DomainError>;
}
