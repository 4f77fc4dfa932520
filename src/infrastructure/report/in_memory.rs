//! In-memory report cache

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{DomainError, MonthlyReport, ReportKey, ReportRepository};

/// In-memory implementation of ReportRepository
///
/// Insertion happens under the write lock, so of two racing `create_unique`
/// calls for one key exactly one succeeds.
#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    reports: Arc<RwLock<HashMap<ReportKey, MonthlyReport>>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn find_by_key(&self, key: ReportKey) -> Result<Option<MonthlyReport>, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports.get(&key).cloned())
    }

    async fn create_unique(&self, report: MonthlyReport) -> Result<MonthlyReport, DomainError> {
        let mut reports = self.reports.write().await;

        match reports.entry(report.key()) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "Report for user {} ({}/{}) already exists",
                report.user_id, report.month, report.year
            ))),
            Entry::Vacant(slot) => {
                slot.insert(report.clone());
                Ok(report)
            }
        }
    }
}
