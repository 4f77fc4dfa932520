//! Monthly report entities

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::cost::{Category, CostItem};
use crate::domain::user::UserId;

/// A calendar month, with its UTC boundaries precomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
    start: NaiveDate,
    next_start: NaiveDate,
}

impl ReportPeriod {
    /// Returns `None` when year/month do not name a calendar month
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };

        Some(Self {
            year,
            month,
            start,
            next_start,
        })
    }

    /// The month containing the given instant
    pub fn containing(instant: DateTime<Utc>) -> Option<Self> {
        Self::new(instant.year(), instant.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Half-open `[first instant of month, first instant of next month)`
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start.and_time(NaiveTime::MIN).and_utc(),
            self.next_start.and_time(NaiveTime::MIN).and_utc(),
        )
    }

    /// Strictly before the calendar month of `now`; day-of-month is irrelevant
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        (self.year, self.month) < (now.year(), now.month())
    }
}

/// Report cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub user_id: UserId,
    pub year: i32,
    pub month: u32,
}

impl ReportKey {
    pub fn new(user_id: UserId, period: &ReportPeriod) -> Self {
        Self {
            user_id,
            year: period.year(),
            month: period.month(),
        }
    }
}

/// One cost as it appears inside a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub sum: f64,
    pub description: String,
    pub day: u32,
}

impl From<&CostItem> for ReportEntry {
    fn from(item: &CostItem) -> Self {
        Self {
            sum: item.sum,
            description: item.description.clone(),
            day: item.created_at.day(),
        }
    }
}

/// The costs of one category, serialized as `{"<category>": [entries]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<ReportEntry>>",
    into = "BTreeMap<String, Vec<ReportEntry>>"
)]
pub struct CategoryCosts {
    pub category: Category,
    pub entries: Vec<ReportEntry>,
}

impl CategoryCosts {
    pub fn new(category: Category, entries: Vec<ReportEntry>) -> Self {
        Self { category, entries }
    }
}

impl TryFrom<BTreeMap<String, Vec<ReportEntry>>> for CategoryCosts {
    type Error = String;

    fn try_from(map: BTreeMap<String, Vec<ReportEntry>>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "expected exactly one category per group, found {}",
                map.len()
            ));
        }

        let (name, entries) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty category group".to_string())?;
        let category = name.parse::<Category>().map_err(|e| e.to_string())?;

        Ok(Self { category, entries })
    }
}

impl From<CategoryCosts> for BTreeMap<String, Vec<ReportEntry>> {
    fn from(group: CategoryCosts) -> Self {
        BTreeMap::from([(group.category.as_str().to_string(), group.entries)])
    }
}

/// Category-grouped summary of a user's costs for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(rename = "userid")]
    pub user_id: UserId,
    pub year: i32,
    pub month: u32,
    pub costs: Vec<CategoryCosts>,
}

impl MonthlyReport {
    pub fn key(&self) -> ReportKey {
        ReportKey {
            user_id: self.user_id,
            year: self.year,
            month: self.month,
        }
    }

    /// Entries recorded under a category, empty when the category is absent
    pub fn entries(&self, category: Category) -> &[ReportEntry] {
        self.costs
            .iter()
            .find(|group| group.category == category)
            .map(|group| group.entries.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_period_bounds() {
        let period = ReportPeriod::new(2023, 1).unwrap();
        let (start, end) = period.bounds();
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_period_bounds_roll_over_year() {
        let (start, end) = ReportPeriod::new(2024, 12).unwrap().bounds();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_period() {
        assert!(ReportPeriod::new(2023, 0).is_none());
        assert!(ReportPeriod::new(2023, 13).is_none());
    }

    #[test]
    fn test_is_past() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();

        assert!(ReportPeriod::new(2026, 2).unwrap().is_past(now));
        assert!(ReportPeriod::new(2025, 12).unwrap().is_past(now));
        assert!(!ReportPeriod::new(2026, 3).unwrap().is_past(now));
        assert!(!ReportPeriod::new(2026, 4).unwrap().is_past(now));
        assert!(!ReportPeriod::new(2027, 1).unwrap().is_past(now));
    }

    #[test]
    fn test_current_month_is_never_past_even_on_first_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert!(!ReportPeriod::containing(now).unwrap().is_past(now));
    }

    #[test]
    fn test_report_json_shape() {
        let report = MonthlyReport {
            user_id: UserId::new(1).unwrap(),
            year: 2023,
            month: 1,
            costs: vec![
                CategoryCosts::new(
                    Category::Food,
                    vec![ReportEntry {
                        sum: 10.0,
                        description: "Breakfast".to_string(),
                        day: 5,
                    }],
                ),
                CategoryCosts::new(Category::Health, vec![]),
            ],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "userid": 1,
                "year": 2023,
                "month": 1,
                "costs": [
                    {"food": [{"sum": 10.0, "description": "Breakfast", "day": 5}]},
                    {"health": []}
                ]
            })
        );

        let parsed: MonthlyReport = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_category_group_rejects_multiple_keys() {
        let result = serde_json::from_value::<CategoryCosts>(json!({"food": [], "health": []}));
        assert!(result.is_err());

        let result = serde_json::from_value::<CategoryCosts>(json!({"travel": []}));
        assert!(result.is_err());
    }
}
