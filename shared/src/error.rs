use std::fmt;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use lambda_http::http::StatusCode;

/// Failure taxonomy for everything below the handlers. Validation is
/// raised before any store call; the rest classify store responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    RateLimit(String),
    UpstreamMissing(String),
    Unexpected(String),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) | StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) | StoreError::UpstreamMissing(_) => StatusCode::NOT_FOUND,
            StoreError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            StoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StoreError::Validation(msg)
            | StoreError::NotFound(msg)
            | StoreError::Conflict(msg)
            | StoreError::RateLimit(msg)
            | StoreError::UpstreamMissing(msg)
            | StoreError::Unexpected(msg) => msg,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "validation failed: {msg}"),
            StoreError::NotFound(msg) => write!(f, "not found: {msg}"),
            StoreError::Conflict(msg) => write!(f, "conditional check failed: {msg}"),
            StoreError::RateLimit(msg) => write!(f, "capacity exceeded: {msg}"),
            StoreError::UpstreamMissing(msg) => write!(f, "resource missing: {msg}"),
            StoreError::Unexpected(msg) => write!(f, "unexpected store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Classify a service error by its exception code. Unrecognized codes
/// collapse to Unexpected with the raw message kept for diagnostics.
pub(crate) fn classify(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some("ConditionalCheckFailedException") => StoreError::Conflict(message),
        Some("ProvisionedThroughputExceededException")
        | Some("ThroughputExceededException")
        | Some("RequestLimitExceeded") => StoreError::RateLimit(message),
        Some("ResourceNotFoundException") => StoreError::UpstreamMissing(message),
        _ => StoreError::Unexpected(message),
    }
}

impl<E, R> From<SdkError<E, R>> for StoreError
where
    E: ProvideErrorMetadata + fmt::Debug,
    R: fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        let code = err.code().map(|c| c.to_string());
        let message = err
            .message()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{err:?}"));
        classify(code.as_deref(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_check_maps_to_conflict() {
        let err = classify(
            Some("ConditionalCheckFailedException"),
            "The conditional request failed".to_string(),
        );
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn throughput_maps_to_rate_limit() {
        for code in [
            "ProvisionedThroughputExceededException",
            "ThroughputExceededException",
            "RequestLimitExceeded",
        ] {
            let err = classify(Some(code), "slow down".to_string());
            assert!(matches!(err, StoreError::RateLimit(_)));
            assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        }
    }

    #[test]
    fn missing_table_maps_to_upstream_missing() {
        let err = classify(Some("ResourceNotFoundException"), "no table".to_string());
        assert!(matches!(err, StoreError::UpstreamMissing(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_code_preserves_message() {
        let err = classify(Some("InternalServerError"), "boom".to_string());
        assert_eq!(err, StoreError::Unexpected("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_code_is_unexpected() {
        let err = classify(None, "connection reset".to_string());
        assert!(matches!(err, StoreError::Unexpected(_)));
    }
}
