//! Report cache implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryReportRepository;
pub use postgres_repository::PostgresReportRepository;
