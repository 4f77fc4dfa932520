//! Infrastructure services

mod cost_service;
mod report_service;

pub use cost_service::{AddCostRequest, CostService, UserTotal};
pub use report_service::{ReportQuery, ReportService};
