// ABOUTME: Error taxonomy for hosted-backend provider calls
// ABOUTME: Distinguishes transport failures, HTTP rejections, and decode failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Provider error types and their mapping into [`AppError`].

use crate::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failure of a call to the hosted backend
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never completed (DNS, connect, timeout)
    #[error("hosted backend unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend rejected the credentials presented
    #[error("hosted backend rejected credentials: {0}")]
    AuthFailed(String),

    /// The backend answered with a non-success status
    #[error("hosted backend returned {status}: {body}")]
    Http {
        /// HTTP status returned
        status: u16,
        /// Response body, truncated for logging
        body: String,
    },

    /// The query matched no row
    #[error("hosted backend query matched no row")]
    NotFound,

    /// The response body could not be decoded into the expected shape
    #[error("hosted backend response could not be decoded: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Whether this failure means the caller's credentials were bad, as
    /// opposed to a transient backend problem
    #[must_use]
    pub const fn is_credential_failure(&self) -> bool {
        matches!(self, Self::AuthFailed(_))
            || matches!(self, Self::Http { status: 401 | 403, .. })
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::AuthFailed(msg) => {
                Self::new(ErrorCode::AuthInvalid, msg.clone()).with_source(err)
            }
            ProviderError::Http { status: 401 | 403, .. } => {
                Self::new(ErrorCode::ExternalAuthFailed, err.to_string())
            }
            ProviderError::NotFound | ProviderError::Http { status: 404, .. } => {
                Self::new(ErrorCode::ResourceNotFound, err.to_string())
            }
            ProviderError::Network(_) => {
                Self::new(ErrorCode::ExternalServiceUnavailable, err.to_string())
            }
            ProviderError::Decode(_) => {
                Self::new(ErrorCode::SerializationError, err.to_string())
            }
            ProviderError::Http { .. } => {
                Self::new(ErrorCode::ExternalServiceError, err.to_string())
            }
        }
    }
}
