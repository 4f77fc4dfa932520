//! Infrastructure layer - Store adapters, audit delivery and services

pub mod audit;
pub mod cost;
pub mod logging;
pub mod report;
pub mod services;
pub mod storage;
pub mod user;
