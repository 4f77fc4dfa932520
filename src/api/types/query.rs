//! Query string extractor that reports rejections in the API error shape

use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::{DomainError, ValidationError};

/// Wrapper around `axum::extract::Query` rejecting with `VALIDATION_ERROR`
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(DomainError::from(ValidationError::MalformedQuery(
                rejection_reason(&rejection),
            ))
            .into()),
        }
    }
}

fn rejection_reason(rejection: &QueryRejection) -> String {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => err.body_text(),
        _ => "Unreadable query string".to_string(),
    }
}
