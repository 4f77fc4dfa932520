//! Input validation for cost and report fields
//!
//! Validators accept raw JSON values so that the same rules apply to request
//! bodies and to query-string parameters (which arrive as strings). Numeric
//! fields accept JSON numbers or numeric strings; integer fields additionally
//! require an integral value (`12` and `"12"` are fine, `12.5` is not).

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use super::cost::Category;
use super::user::UserId;

pub const MAX_SUM: f64 = 1_000_000.0;
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Errors that can occur while validating user input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid JSON request: {0}")]
    MalformedBody(String),

    #[error("Invalid query string: {0}")]
    MalformedQuery(String),

    #[error("Invalid path parameter: {0}")]
    MalformedPath(String),

    #[error("Description must be non-empty text")]
    InvalidDescription,

    #[error("User ID is required")]
    UserIdRequired,

    #[error("User ID must be a positive integer")]
    InvalidUserId,

    #[error("Category is required")]
    CategoryRequired,

    #[error("Invalid category. Must be one of: {}", Category::allowed_values())]
    InvalidCategory,

    #[error("Sum is required")]
    SumRequired,

    #[error("Sum must be a valid number")]
    SumNotNumeric,

    #[error("Sum must be greater than 0")]
    SumNotPositive,

    #[error("Sum cannot exceed 1,000,000")]
    SumTooLarge,

    #[error("Year is required")]
    YearRequired,

    #[error("Year must be an integer")]
    YearNotInteger,

    #[error("Year must be between {} and {}", MIN_YEAR, MAX_YEAR)]
    YearOutOfRange,

    #[error("Month is required")]
    MonthRequired,

    #[error("Month must be an integer")]
    MonthNotInteger,

    #[error("Month must be between 1 and 12")]
    MonthOutOfRange,

    #[error("Day {day} is not a valid day of {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: i64 },

    #[error("Cannot add costs to past months.")]
    BackdatedCost,
}

/// A field counts as present unless it is missing, `null`, or a blank string
pub fn is_present(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Collect the names of absent fields, preserving the given order
pub fn missing_fields(fields: &[(&'static str, Option<&Value>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, raw)| !is_present(*raw))
        .map(|(name, _)| *name)
        .collect()
}

fn as_number(raw: &Value) -> Option<f64> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

fn as_integer(raw: &Value) -> Option<i64> {
    let number = as_number(raw)?;

    // Beyond 2^53 an f64 no longer represents every integer exactly
    if number.fract() != 0.0 || number.abs() > 9_007_199_254_740_991.0 {
        return None;
    }

    Some(number as i64)
}

/// Validate a user ID: a positive integer
pub fn validate_user_id(raw: Option<&Value>) -> Result<UserId, ValidationError> {
    let raw = raw
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::UserIdRequired)?;

    as_integer(raw)
        .and_then(|id| UserId::new(id).ok())
        .ok_or(ValidationError::InvalidUserId)
}

/// Validate a cost description: text that is not blank. Stored as given.
pub fn validate_description(raw: Option<&Value>) -> Result<String, ValidationError> {
    match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::InvalidDescription),
    }
}

/// Validate a category against the fixed category set
pub fn validate_category(raw: Option<&Value>) -> Result<Category, ValidationError> {
    match raw {
        None | Some(Value::Null) => Err(ValidationError::CategoryRequired),
        Some(Value::String(s)) => s.parse(),
        Some(_) => Err(ValidationError::InvalidCategory),
    }
}

/// Validate a cost sum: numeric, positive, at most 1,000,000
pub fn validate_sum(raw: Option<&Value>) -> Result<f64, ValidationError> {
    let raw = raw
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::SumRequired)?;
    let sum = as_number(raw).ok_or(ValidationError::SumNotNumeric)?;

    if sum <= 0.0 {
        return Err(ValidationError::SumNotPositive);
    }

    if sum > MAX_SUM {
        return Err(ValidationError::SumTooLarge);
    }

    Ok(sum)
}

/// Validate a report or cost year: an integer in 2000..=2100
pub fn validate_year(raw: Option<&Value>) -> Result<i32, ValidationError> {
    let raw = raw
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::YearRequired)?;
    let year = as_integer(raw).ok_or(ValidationError::YearNotInteger)?;

    if year < i64::from(MIN_YEAR) || year > i64::from(MAX_YEAR) {
        return Err(ValidationError::YearOutOfRange);
    }

    Ok(year as i32)
}

/// Validate a month: an integer in 1..=12
pub fn validate_month(raw: Option<&Value>) -> Result<u32, ValidationError> {
    let raw = raw
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::MonthRequired)?;
    let month = as_integer(raw).ok_or(ValidationError::MonthNotInteger)?;

    if !(1..=12).contains(&month) {
        return Err(ValidationError::MonthOutOfRange);
    }

    Ok(month as u32)
}

/// Validate a day of month against an already validated year and month
pub fn validate_day(raw: Option<&Value>, year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    let day = raw.and_then(as_integer).unwrap_or(0);

    u32::try_from(day)
        .ok()
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
        .ok_or(ValidationError::InvalidDay { year, month, day })
}
