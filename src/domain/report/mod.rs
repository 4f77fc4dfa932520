//! Monthly report domain

mod aggregation;
mod entity;
mod repository;

pub use aggregation::group_by_category;
pub use entity::{CategoryCosts, MonthlyReport, ReportEntry, ReportKey, ReportPeriod};
pub use repository::ReportRepository;

#[cfg(test)]
pub use repository::MockReportRepository;
