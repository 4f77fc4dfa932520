//! Cost store repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entity::CostItem;
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Append-only store of cost items
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CostRepository: Send + Sync {
    /// Persist a new cost item
    async fn append(&self, item: CostItem) -> Result<CostItem, DomainError>;

    /// Costs of a user created in `[start, end)`, ordered by creation time
    async fn find_by_user_and_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CostItem>, DomainError>;

    /// Sum of every cost the user ever recorded
    async fn total_for_user(&self, user_id: UserId) -> Result<f64, DomainError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
