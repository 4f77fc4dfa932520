//! Path parameter extractor that reports rejections in the API error shape

use axum::{
    extract::{rejection::PathRejection, FromRequestParts, Path as AxumPath},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::{DomainError, ValidationError};

/// Wrapper around `axum::extract::Path` rejecting with `VALIDATION_ERROR`
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumPath::<T>::from_request_parts(parts, state).await {
            Ok(AxumPath(value)) => Ok(Path(value)),
            Err(rejection) => Err(DomainError::from(ValidationError::MalformedPath(
                rejection_reason(&rejection),
            ))
            .into()),
        }
    }
}

fn rejection_reason(rejection: &PathRejection) -> String {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => err.body_text(),
        _ => "Missing path parameters".to_string(),
    }
}
