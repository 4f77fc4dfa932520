//! Cost store implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryCostRepository;
pub use postgres_repository::PostgresCostRepository;
