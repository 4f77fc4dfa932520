//! In-memory cost store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{CostItem, CostRepository, DomainError, UserId};

/// In-memory implementation of CostRepository
#[derive(Debug, Default)]
pub struct InMemoryCostRepository {
    items: Arc<RwLock<Vec<CostItem>>>,
}

impl InMemoryCostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_items(items: Vec<CostItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

#[async_trait]
impl CostRepository for InMemoryCostRepository {
    async fn append(&self, item: CostItem) -> Result<CostItem, DomainError> {
        let mut items = self.items.write().await;

        if items.iter().any(|existing| existing.id == item.id) {
            return Err(DomainError::conflict(format!(
                "Cost item '{}' already exists",
                item.id
            )));
        }

        items.push(item.clone());
        Ok(item)
    }

    async fn find_by_user_and_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CostItem>, DomainError> {
        let items = self.items.read().await;

        let mut matching: Vec<CostItem> = items
            .iter()
            .filter(|item| item.user_id == user_id)
            .filter(|item| item.created_at >= start && item.created_at < end)
            .cloned()
            .collect();

        // Stable: ties keep insertion order
        matching.sort_by_key(|item| item.created_at);

        Ok(matching)
    }

    async fn total_for_user(&self, user_id: UserId) -> Result<f64, DomainError> {
        let items = self.items.read().await;

        Ok(items
            .iter()
            .filter(|item| item.user_id == user_id)
            .map(|item| item.sum)
            .sum())
    }
}
