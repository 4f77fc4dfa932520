//! Report service - monthly reports with write-once caching of past months
//!
//! Reports for months strictly before the current one are computed once and
//! stored; later requests get the stored snapshot back unchanged. Reports for
//! the current or a future month are always computed from the cost store and
//! never stored.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::validation::{missing_fields, validate_month, validate_user_id, validate_year};
use crate::domain::{
    Clock, CostRepository, DomainError, MonthlyReport, ReportKey, ReportPeriod, ReportRepository,
    UserId, ValidationError,
};

/// Query parameters of a report request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Report service
pub struct ReportService {
    costs: Arc<dyn CostRepository>,
    reports: Arc<dyn ReportRepository>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        costs: Arc<dyn CostRepository>,
        reports: Arc<dyn ReportRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            costs,
            reports,
            clock,
        }
    }

    /// Validate a report request and produce the report
    pub async fn monthly_report(&self, query: &ReportQuery) -> Result<MonthlyReport, DomainError> {
        let id = query.id.clone().map(Value::String);
        let year = query.year.clone().map(Value::String);
        let month = query.month.clone().map(Value::String);

        let missing = missing_fields(&[
            ("id", id.as_ref()),
            ("year", year.as_ref()),
            ("month", month.as_ref()),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing).into());
        }

        let user_id = validate_user_id(id.as_ref())?;
        let year = validate_year(year.as_ref())?;
        let month = validate_month(month.as_ref())?;

        self.generate(user_id, year, month).await
    }

    /// Produce the report for an already validated period
    pub async fn generate(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyReport, DomainError> {
        let period = ReportPeriod::new(year, month).ok_or_else(|| {
            DomainError::internal(format!("Invalid report period {}/{}", month, year))
        })?;
        let key = ReportKey::new(user_id, &period);
        let is_past = period.is_past(self.clock.now());

        if is_past {
            if let Some(report) = self.reports.find_by_key(key).await? {
                debug!(user_id = %user_id, year, month, "Returning cached report");
                return Ok(report);
            }
        }

        let (start, end) = period.bounds();
        let items = self
            .costs
            .find_by_user_and_range(user_id, start, end)
            .await?;
        let report = MonthlyReport::compute(key, &items);

        if is_past {
            self.persist(&report).await?;
        }

        Ok(report)
    }

    /// Store a computed past-month report; losing a race for the key is fine
    async fn persist(&self, report: &MonthlyReport) -> Result<(), DomainError> {
        match self.reports.create_unique(report.clone()).await {
            Ok(_) => {
                info!(
                    user_id = %report.user_id,
                    year = report.year,
                    month = report.month,
                    "Stored computed report"
                );
                Ok(())
            }
            Err(e) if e.is_conflict() => {
                debug!(
                    user_id = %report.user_id,
                    year = report.year,
                    month = report.month,
                    "Report already stored by a concurrent request"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
