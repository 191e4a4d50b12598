//! Trait abstraction for the auth endpoints to enable mocking in tests

use super::{ApiError, CorrelationValue};
use async_trait::async_trait;

/// Remote operations the verification handshake needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Succeeds when `email` is not registered yet
    async fn check_duplicate_email(&self, email: &str) -> Result<(), ApiError>;

    /// Send a confirmation code to `email`, returning the correlation value
    /// the confirmation widget needs later
    async fn dispatch_code(&self, email: &str) -> Result<CorrelationValue, ApiError>;
}
