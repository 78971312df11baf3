use std::time::Duration;

use rand::Rng;

use crate::{
    application::services::messenger::MessageSender,
    domain::models::{DeliveryOutcome, MessageRequest},
};

/// Bounded retry with exponential backoff for transient send failures.
///
/// The default performs no retries, matching the one-shot behavior the
/// campaign report format assumes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (0-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        let scaled = self
            .initial_delay
            .mul_f64(self.backoff_multiplier.powi(attempt as i32))
            .min(self.max_delay);
        if self.jitter { add_jitter(scaled) } else { scaled }
    }
}

/// Jitter is uniform between 0% and 100% of the delay, so the actual
/// wait lands between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let factor: f64 = rand::thread_rng().gen_range(0.0..=1.0);
    delay.mul_f64(1.0 + factor)
}

/// Runs one send through the retry policy. Only transient outcomes are
/// retried; the last outcome is returned once attempts are exhausted.
pub async fn send_with_retry(
    sender: &dyn MessageSender,
    request: &MessageRequest,
    policy: &RetryPolicy,
) -> DeliveryOutcome {
    let mut outcome = sender.send(request).await;
    let mut attempt = 0;

    while outcome.is_transient() && attempt < policy.max_retries {
        let delay = policy.delay_for(attempt);
        tracing::warn!(
            number = %request.number,
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            "send failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
        outcome = sender.send(request).await;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Fails with a transient outcome until `failures` sends have been
    /// attempted, then delivers.
    struct FlakySender {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakySender {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MessageSender for FlakySender {
        async fn send(&self, _request: &MessageRequest) -> DeliveryOutcome {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                DeliveryOutcome::RequestFailed
            } else {
                DeliveryOutcome::Delivered
            }
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..RetryPolicy::default()
        }
    }

    fn request() -> MessageRequest {
        MessageRequest::templated("+100", "template", "en", "hello")
    }

    #[tokio::test]
    async fn default_policy_attempts_exactly_once() {
        let sender = FlakySender::new(u32::MAX);
        let outcome = send_with_retry(&sender, &request(), &RetryPolicy::default()).await;

        assert_eq!(outcome, DeliveryOutcome::RequestFailed);
        assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_until_delivered() {
        let sender = FlakySender::new(2);
        let outcome = send_with_retry(&sender, &request(), &fast_policy(3)).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_stop_at_the_cap() {
        let sender = FlakySender::new(u32::MAX);
        let outcome = send_with_retry(&sender, &request(), &fast_policy(2)).await;

        assert_eq!(outcome, DeliveryOutcome::RequestFailed);
        assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rejection_is_never_retried() {
        struct RejectingSender(AtomicU32);

        #[async_trait]
        impl MessageSender for RejectingSender {
            async fn send(&self, _request: &MessageRequest) -> DeliveryOutcome {
                self.0.fetch_add(1, Ordering::SeqCst);
                DeliveryOutcome::Rejected {
                    body: "invalid template".to_string(),
                }
            }
        }

        let sender = RejectingSender(AtomicU32::new(0));
        let outcome = send_with_retry(&sender, &request(), &fast_policy(5)).await;

        assert!(matches!(outcome, DeliveryOutcome::Rejected { .. }));
        assert_eq!(sender.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 4.0,
            max_delay: Duration::from_secs(8),
            jitter: false,
        };

        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(5), Duration::from_secs(8));
    }
}
