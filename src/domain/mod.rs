//! Domain layer - Core business logic and entities

pub mod audit;
pub mod clock;
pub mod cost;
pub mod error;
pub mod report;
pub mod user;
pub mod validation;

pub use audit::{AuditEvent, AuditLevel, AuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use cost::{Category, CostItem, CostRepository};
pub use error::DomainError;
pub use report::{
    group_by_category, CategoryCosts, MonthlyReport, ReportEntry, ReportKey, ReportPeriod,
    ReportRepository,
};
pub use user::{UserDirectory, UserId};
pub use validation::ValidationError;
