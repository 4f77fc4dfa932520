//! User domain
//!
//! Users are owned by a separate service. This module only knows how to name
//! a user and how to ask whether one exists.

mod entity;
mod repository;

pub use entity::UserId;
pub use repository::UserDirectory;

#[cfg(test)]
pub use repository::MockUserDirectory;
