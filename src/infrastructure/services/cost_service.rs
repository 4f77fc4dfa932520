//! Cost service - ingestion of cost items and per-user totals

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BackdatingPolicy;
use crate::domain::validation::{
    is_present, missing_fields, validate_category, validate_day, validate_description,
    validate_month, validate_sum, validate_user_id, validate_year,
};
use crate::domain::{
    Clock, CostItem, CostRepository, DomainError, ReportPeriod, UserDirectory, UserId,
    ValidationError,
};

/// Request to add a cost item
///
/// Fields stay untyped so each one can be rejected with its own error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddCostRequest {
    pub userid: Option<Value>,
    pub description: Option<Value>,
    pub category: Option<Value>,
    pub sum: Option<Value>,
    pub year: Option<Value>,
    pub month: Option<Value>,
    pub day: Option<Value>,
}

/// Sum of every cost a user recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTotal {
    pub userid: UserId,
    pub total: f64,
}

/// Cost service
pub struct CostService {
    costs: Arc<dyn CostRepository>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    backdating: BackdatingPolicy,
}

impl CostService {
    pub fn new(
        costs: Arc<dyn CostRepository>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        backdating: BackdatingPolicy,
    ) -> Self {
        Self {
            costs,
            users,
            clock,
            backdating,
        }
    }

    /// Validate and store a new cost item
    ///
    /// Every field check runs before the user lookup, and the user lookup
    /// runs before the write.
    pub async fn add(&self, request: AddCostRequest) -> Result<CostItem, DomainError> {
        let missing = missing_fields(&[
            ("userid", request.userid.as_ref()),
            ("description", request.description.as_ref()),
            ("category", request.category.as_ref()),
            ("sum", request.sum.as_ref()),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing).into());
        }

        let user_id = validate_user_id(request.userid.as_ref())?;
        let description = validate_description(request.description.as_ref())?;
        let category = validate_category(request.category.as_ref())?;
        let sum = validate_sum(request.sum.as_ref())?;
        let created_at = self.resolve_created_at(&request)?;

        if !self.users.exists(user_id).await? {
            return Err(DomainError::user_not_found(user_id));
        }

        let item = self
            .costs
            .append(CostItem::new(user_id, description, category, sum, created_at))
            .await?;

        info!(
            user_id = %item.user_id,
            cost_id = %item.id,
            category = %item.category,
            "Cost item saved"
        );

        Ok(item)
    }

    /// Total of all costs for a user
    ///
    /// Does not consult the user directory; unknown users total zero.
    pub async fn total(&self, raw_user_id: &str) -> Result<UserTotal, DomainError> {
        let user_id = validate_user_id(Some(&Value::String(raw_user_id.to_string())))?;
        let total = self.costs.total_for_user(user_id).await?;

        Ok(UserTotal {
            userid: user_id,
            total,
        })
    }

    /// Check that the cost store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.costs.ping().await
    }

    /// Explicit date when year, month and day are all given, else now
    fn resolve_created_at(&self, request: &AddCostRequest) -> Result<DateTime<Utc>, DomainError> {
        let now = self.clock.now();

        let explicit = is_present(request.year.as_ref())
            && is_present(request.month.as_ref())
            && is_present(request.day.as_ref());

        let created_at = if explicit {
            let year = validate_year(request.year.as_ref())?;
            let month = validate_month(request.month.as_ref())?;
            let date = validate_day(request.day.as_ref(), year, month)?;
            date.and_time(NaiveTime::MIN).and_utc()
        } else {
            now
        };

        if self.backdating == BackdatingPolicy::CurrentMonthOnly {
            let (month_start, _) = ReportPeriod::containing(now)
                .ok_or_else(|| {
                    DomainError::internal(format!("No calendar month contains {}", now))
                })?
                .bounds();

            if created_at < month_start {
                debug!(
                    created_at = %created_at,
                    current_year = now.year(),
                    current_month = now.month(),
                    "Rejecting backdated cost"
                );
                return Err(ValidationError::BackdatedCost.into());
            }
        }

        Ok(created_at)
    }
}
