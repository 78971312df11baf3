use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};

use crate::{
    application::services::{
        messenger::MessageSender,
        retry::{RetryPolicy, send_with_retry},
    },
    domain::models::{DeliveryOutcome, DeliveryReport, MessageRequest},
};

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on concurrent in-flight sends.
    pub max_in_flight: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { max_in_flight: 32 }
    }
}

/// Fans a batch of message requests out to the messaging API and collects
/// exactly one outcome per record.
pub struct BatchDispatcher {
    sender: Arc<dyn MessageSender>,
    limiter: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl BatchDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, config: DispatchConfig, retry: RetryPolicy) -> Self {
        Self {
            sender,
            limiter: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            retry,
        }
    }

    /// Sends every request concurrently and returns once all of them have
    /// finished, successfully or not.
    ///
    /// Outcomes are keyed by each record's 1-based position in `requests`,
    /// regardless of the order in which sends complete.
    pub async fn dispatch(&self, requests: Vec<MessageRequest>) -> DeliveryReport {
        let total = requests.len();
        let mut report = DeliveryReport::new();
        if total == 0 {
            return report;
        }

        // Capacity covers one outcome per record, so no task ever blocks
        // on the channel.
        let (tx, mut rx) = mpsc::channel::<(u32, DeliveryOutcome)>(total);

        for (index, request) in requests.into_iter().enumerate() {
            let position = index as u32 + 1;
            let tx = tx.clone();
            let sender = Arc::clone(&self.sender);
            let limiter = Arc::clone(&self.limiter);
            let retry = self.retry.clone();

            tokio::spawn(async move {
                let _permit = limiter
                    .acquire_owned()
                    .await
                    .expect("dispatch semaphore closed");

                let outcome = send_with_retry(sender.as_ref(), &request, &retry).await;
                if !outcome.is_delivered() {
                    tracing::warn!(
                        position,
                        number = %request.number,
                        response = outcome.response_text(),
                        "delivery failed"
                    );
                }

                let _ = tx.send((position, outcome)).await;
            });
        }
        drop(tx);

        // The channel closes once every task has dropped its sender, so
        // draining it to the end is the completion barrier.
        while let Some((position, outcome)) = rx.recv().await {
            report.record(position, outcome);
        }

        debug_assert_eq!(report.len(), total);
        report
    }
}
