//! Grouping of raw costs into the fixed report shape

use super::entity::{CategoryCosts, MonthlyReport, ReportEntry, ReportKey};
use crate::domain::cost::{Category, CostItem};

/// Partition costs into one group per category, in `Category::ALL` order.
///
/// Every category is present, even with no entries. Within a group, entries
/// keep the order of `items`.
pub fn group_by_category(items: &[CostItem]) -> Vec<CategoryCosts> {
    Category::ALL
        .iter()
        .map(|&category| {
            let entries = items
                .iter()
                .filter(|item| item.category == category)
                .map(ReportEntry::from)
                .collect();

            CategoryCosts::new(category, entries)
        })
        .collect()
}

impl MonthlyReport {
    /// Build the report for `key` from the costs of that month
    pub fn compute(key: ReportKey, items: &[CostItem]) -> Self {
        Self {
            user_id: key.user_id,
            year: key.year,
            month: key.month,
            costs: group_by_category(items),
        }
    }
}
