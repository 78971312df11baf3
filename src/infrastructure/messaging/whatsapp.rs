use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use crate::{
    application::services::messenger::MessageSender,
    domain::models::{DeliveryOutcome, MessageRequest},
};

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub base_url: String,
    pub business_id: String,
    pub api_key: String,
    /// Forces the mock gateway to answer with a fixed status code.
    /// Unset outside the test harness.
    pub mock_response_code: Option<String>,
    pub send_timeout: Duration,
}

/// Client for the templated-messages endpoint of the WhatsApp business
/// API. Stateless; every send is an independent request/response pair.
pub struct WhatsAppClient {
    http: Client,
    endpoint: String,
    api_key: String,
    mock_response_code: Option<String>,
}

impl WhatsAppClient {
    pub fn new(config: &WhatsAppConfig) -> Arc<dyn MessageSender> {
        Arc::new(Self {
            http: Client::builder()
                .user_agent("campaign-sender/whatsapp")
                .timeout(config.send_timeout)
                .build()
                .expect("failed to build whatsapp client"),
            endpoint: format!(
                "{}/v1/businesses/{}/send/whatsapp_templated_messages",
                config.base_url.trim_end_matches('/'),
                config.business_id
            ),
            api_key: config.api_key.clone(),
            mock_response_code: config.mock_response_code.clone(),
        }) as Arc<dyn MessageSender>
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send(&self, request: &MessageRequest) -> DeliveryOutcome {
        let body = match serde_json::to_vec(request) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(number = %request.number, error = %err, "failed to encode request");
                return DeliveryOutcome::EncodingFailed;
            }
        };

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header("X-API-Key", &self.api_key)
            .body(body);
        if let Some(code) = &self.mock_response_code {
            builder = builder.header("x-mock-response-code", code);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(number = %request.number, error = %err, "request to messaging api failed");
                return DeliveryOutcome::RequestFailed;
            }
        };

        // The API acknowledges an accepted message with 201; anything
        // else is a rejection and the body is kept verbatim.
        if response.status() == StatusCode::CREATED {
            return DeliveryOutcome::Delivered;
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(number = %request.number, %status, "messaging api rejected the request");
        DeliveryOutcome::Rejected { body }
    }
}
