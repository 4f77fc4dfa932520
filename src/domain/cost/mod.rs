//! Cost domain
//!
//! Expense records, the fixed category set, and the cost store trait.

mod category;
mod entity;
mod repository;

pub use category::Category;
pub use entity::CostItem;
pub use repository::CostRepository;

#[cfg(test)]
pub use repository::MockCostRepository;
