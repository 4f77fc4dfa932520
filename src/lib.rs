//! Cost Manager API
//!
//! Records per-user cost items and serves monthly cost reports with:
//! - Per-field request validation
//! - Computed monthly reports, stored once a month has closed
//! - In-memory or PostgreSQL storage
//! - Request audit events forwarded to an external log sink

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use domain::{Clock, CostRepository, ReportRepository, SystemClock, UserDirectory, UserId};
use infrastructure::{
    audit::start_audit_sink,
    cost::{InMemoryCostRepository, PostgresCostRepository},
    report::{InMemoryReportRepository, PostgresReportRepository},
    services::{CostService, ReportService},
    storage::{connect_pool, run_storage_migrations, PostgresConfig, StorageType},
    user::{InMemoryUserDirectory, PostgresUserDirectory},
};
use tracing::{info, warn};

struct Stores {
    costs: Arc<dyn CostRepository>,
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserDirectory>,
}

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_type: StorageType = config.storage.backend.parse()?;

    let stores = match storage_type {
        StorageType::InMemory => in_memory_stores(config),
        StorageType::Postgres => postgres_stores(config).await?,
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let audit = start_audit_sink(&config.log_sink)?;

    let cost_service = CostService::new(
        stores.costs.clone(),
        stores.users,
        clock.clone(),
        config.ingestion.backdating,
    );
    let report_service = ReportService::new(stores.costs, stores.reports, clock);

    Ok(AppState {
        cost_service: Arc::new(cost_service),
        report_service: Arc::new(report_service),
        audit,
    })
}

fn in_memory_stores(config: &AppConfig) -> Stores {
    info!("Using in-memory storage");

    let seed = config
        .storage
        .seed_user_ids
        .iter()
        .filter_map(|id| match UserId::new(*id) {
            Ok(user_id) => Some(user_id),
            Err(_) => {
                warn!(user_id = id, "Skipping invalid seed user id");
                None
            }
        });

    Stores {
        costs: Arc::new(InMemoryCostRepository::new()),
        reports: Arc::new(InMemoryReportRepository::new()),
        users: Arc::new(InMemoryUserDirectory::with_users(seed)),
    }
}

async fn postgres_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    let pg = PostgresConfig::from_database_config(&config.database)
        .context("database.url or DATABASE_URL must be set for the postgres backend")?;

    info!(
        max_connections = pg.max_connections,
        "Using PostgreSQL storage"
    );

    let pool = connect_pool(&pg).await?;
    run_storage_migrations(&pool).await?;

    let timeout = pg.statement_timeout();

    Ok(Stores {
        costs: Arc::new(PostgresCostRepository::new(pool.clone(), timeout)),
        reports: Arc::new(PostgresReportRepository::new(pool.clone(), timeout)),
        users: Arc::new(PostgresUserDirectory::new(pool, timeout)),
    })
}
