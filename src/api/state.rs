//! Application state for shared services

use std::sync::Arc;

use crate::domain::{AuditSink, CostItem, DomainError, MonthlyReport};
use crate::infrastructure::services::{
    AddCostRequest, CostService, ReportQuery, ReportService, UserTotal,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub cost_service: Arc<dyn CostServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
    pub audit: Arc<dyn AuditSink>,
}

/// Trait for cost service operations
#[async_trait::async_trait]
pub trait CostServiceTrait: Send + Sync {
    async fn add(&self, request: AddCostRequest) -> Result<CostItem, DomainError>;
    async fn total(&self, user_id: &str) -> Result<UserTotal, DomainError>;
    /// Check that the cost store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Trait for report service operations
#[async_trait::async_trait]
pub trait ReportServiceTrait: Send + Sync {
    async fn monthly_report(&self, query: &ReportQuery) -> Result<MonthlyReport, DomainError>;
}

#[async_trait::async_trait]
impl CostServiceTrait for CostService {
    async fn add(&self, request: AddCostRequest) -> Result<CostItem, DomainError> {
        CostService::add(self, request).await
    }

    async fn total(&self, user_id: &str) -> Result<UserTotal, DomainError> {
        CostService::total(self, user_id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        CostService::ping(self).await
    }
}

#[async_trait::async_trait]
impl ReportServiceTrait for ReportService {
    async fn monthly_report(&self, query: &ReportQuery) -> Result<MonthlyReport, DomainError> {
        ReportService::monthly_report(self, query).await
    }
}
