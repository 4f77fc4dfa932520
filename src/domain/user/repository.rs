//! User directory trait

use async_trait::async_trait;

use super::entity::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read-only view of the users owned by the users service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Check if a user ID exists
    async fn exists(&self, user_id: UserId) -> Result<bool, DomainError>;
}
