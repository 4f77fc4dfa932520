//! User directory implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryUserDirectory;
pub use postgres_repository::PostgresUserDirectory;
