use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::{
    application::{handlers::batch_dispatcher::DispatchConfig, services::retry::RetryPolicy},
    infrastructure::messaging::whatsapp::WhatsAppConfig,
};

pub struct Config {
    pub csv_url: String,
    pub local_path: String,
    pub report_path: String,
    pub template_name: String,
    pub template_language: String,
    pub whatsapp: WhatsAppConfig,
    pub dispatch: DispatchConfig,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        Ok(Config {
            csv_url: var("CAMPAIGN_CSV_URL")
                .map_err(|_| "An error occured while getting CAMPAIGN_CSV_URL env param")?,
            local_path: var("CAMPAIGN_LOCAL_PATH")
                .unwrap_or_else(|_| "./campaign_csv.csv".to_string()),
            report_path: var("REPORT_PATH").unwrap_or_else(|_| "./responses.json".to_string()),
            template_name: var("TEMPLATE_NAME").unwrap_or_else(|_| "template".to_string()),
            template_language: var("TEMPLATE_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            whatsapp: WhatsAppConfig {
                base_url: var("WHATSAPP_API_URL")
                    .map_err(|_| "An error occured while getting WHATSAPP_API_URL env param")?,
                business_id: var("WHATSAPP_BUSINESS_ID")
                    .map_err(|_| "An error occured while getting WHATSAPP_BUSINESS_ID env param")?,
                api_key: var("WHATSAPP_API_KEY")
                    .map_err(|_| "An error occured while getting WHATSAPP_API_KEY env param")?,
                mock_response_code: var("WHATSAPP_MOCK_RESPONSE_CODE").ok(),
                send_timeout: Duration::from_secs(
                    parse_optional(
                        "SEND_TIMEOUT_SECS",
                        "An error occured while parsing SEND_TIMEOUT_SECS env param",
                    )?
                    .unwrap_or(10),
                ),
            },
            dispatch: DispatchConfig {
                max_in_flight: parse_optional(
                    "MAX_IN_FLIGHT",
                    "An error occured while parsing MAX_IN_FLIGHT env param",
                )?
                .unwrap_or(32),
            },
            retry: RetryPolicy {
                max_retries: parse_optional(
                    "MAX_RETRIES",
                    "An error occured while parsing MAX_RETRIES env param",
                )?
                .unwrap_or(0),
                ..RetryPolicy::default()
            },
        })
    }
}

fn parse_optional<T: FromStr>(name: &str, error: &'static str) -> Result<Option<T>, &'static str> {
    match var(name) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| error),
        Err(_) => Ok(None),
    }
}
