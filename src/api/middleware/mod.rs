//! API middleware components

pub mod audit;
pub mod logging;

pub use audit::{audit_middleware, describe_action};
pub use logging::{logging_middleware, RequestId, REQUEST_ID_HEADER};
