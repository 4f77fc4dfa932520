//! API request and response types

pub mod error;
pub mod json;
pub mod path;
pub mod query;

pub use error::{ApiError, ApiErrorResponse, ErrorCode};
pub use json::Json;
pub use path::Path;
pub use query::Query;
