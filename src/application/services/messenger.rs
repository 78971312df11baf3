use async_trait::async_trait;

use crate::domain::models::{DeliveryOutcome, MessageRequest};

/// Outbound seam for the templated-messaging API.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Attempts delivery of one request. Never fails: every error is
    /// normalized into a [`DeliveryOutcome`].
    async fn send(&self, request: &MessageRequest) -> DeliveryOutcome;
}
