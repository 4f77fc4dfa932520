//! Cost item entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use crate::domain::user::UserId;

/// A single expense record. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub id: Uuid,
    #[serde(rename = "userid")]
    pub user_id: UserId,
    pub description: String,
    pub category: Category,
    pub sum: f64,
    pub created_at: DateTime<Utc>,
}

impl CostItem {
    /// Create a new cost item with a freshly assigned ID
    pub fn new(
        user_id: UserId,
        description: impl Into<String>,
        category: Category,
        sum: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            description: description.into(),
            category,
            sum,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_json_shape() {
        let created_at = Utc.with_ymd_and_hms(2023, 1, 5, 12, 0, 0).unwrap();
        let item = CostItem::new(UserId::new(1).unwrap(), "Lunch", Category::Food, 50.0, created_at);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["userid"], 1);
        assert_eq!(json["description"], "Lunch");
        assert_eq!(json["category"], "food");
        assert_eq!(json["sum"], 50.0);
        assert_eq!(json["createdAt"], "2023-01-05T12:00:00Z");
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Utc::now();
        let user = UserId::new(1).unwrap();
        let a = CostItem::new(user, "a", Category::Food, 1.0, now);
        let b = CostItem::new(user, "a", Category::Food, 1.0, now);
        assert_ne!(a.id, b.id);
    }
}
