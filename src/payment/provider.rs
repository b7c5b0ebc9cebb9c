use super::{CheckoutSession, PaymentError, SessionRequest};
use async_trait::async_trait;

/// Payment provider trait
///
/// Abstracts the hosted checkout so the endpoint can run against Stripe in
/// production and against a fake in tests.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session. Called at most once per request.
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
