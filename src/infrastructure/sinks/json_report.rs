use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{errors::CampaignError, models::DeliveryReport};

#[derive(Debug, Serialize)]
struct ResponseRecord {
    response: String,
}

/// Writes the delivery report as a JSON object mapping string-encoded
/// positions to `{"response": ...}` records, overwriting any prior file.
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn persist(&self, report: &DeliveryReport) -> Result<(), CampaignError> {
        let records: BTreeMap<u32, ResponseRecord> = report
            .iter()
            .map(|(position, outcome)| {
                (
                    position,
                    ResponseRecord {
                        response: outcome.response_text().to_string(),
                    },
                )
            })
            .collect();

        let body = serde_json::to_vec(&records)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| CampaignError::Persist {
                path: self.path.clone(),
                source,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::models::DeliveryOutcome;

    use super::*;

    #[tokio::test]
    async fn report_serializes_with_string_positions_in_order() {
        let mut report = DeliveryReport::new();
        report.record(2, DeliveryOutcome::RequestFailed);
        report.record(1, DeliveryOutcome::Delivered);
        report.record(
            3,
            DeliveryOutcome::Rejected {
                body: "bad template".to_string(),
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let sink = JsonReportSink::new(&path);

        sink.persist(&report).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            r#"{"1":{"response":"OK"},"2":{"response":"Error: API request failed"},"3":{"response":"bad template"}}"#
        );
    }

    #[tokio::test]
    async fn persist_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        std::fs::write(&path, "stale contents").unwrap();

        let mut report = DeliveryReport::new();
        report.record(1, DeliveryOutcome::Delivered);

        JsonReportSink::new(&path).persist(&report).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, r#"{"1":{"response":"OK"}}"#);
    }

    #[tokio::test]
    async fn unwritable_path_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("responses.json");

        let err = JsonReportSink::new(&path)
            .persist(&DeliveryReport::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::Persist { .. }));
    }
}
