use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort the whole campaign run. Per-record delivery
/// failures are not errors; they are recorded as
/// [`DeliveryOutcome`](crate::domain::models::DeliveryOutcome) values.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("failed to download campaign file from {url}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("campaign file {path} is not readable")]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed campaign file: {0}")]
    Parse(String),
    #[error("failed to encode delivery report")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write delivery report to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
