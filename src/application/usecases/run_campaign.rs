use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    application::handlers::batch_dispatcher::BatchDispatcher,
    domain::errors::CampaignError,
    infrastructure::{
        sinks::json_report::JsonReportSink,
        sources::{csv::CsvRecordSource, download::CampaignFileDownloader},
    },
};

/// End-to-end campaign run: download the campaign file, parse it, fan the
/// sends out, persist the delivery report.
pub struct RunCampaignUseCase {
    downloader: CampaignFileDownloader,
    source: CsvRecordSource,
    dispatcher: BatchDispatcher,
    sink: JsonReportSink,
}

#[derive(Debug, Clone)]
pub struct CampaignSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub delivered: usize,
    pub failed: usize,
    pub report_path: PathBuf,
}

impl RunCampaignUseCase {
    pub fn new(
        downloader: CampaignFileDownloader,
        source: CsvRecordSource,
        dispatcher: BatchDispatcher,
        sink: JsonReportSink,
    ) -> Self {
        Self {
            downloader,
            source,
            dispatcher,
            sink,
        }
    }

    pub async fn execute(&self) -> Result<CampaignSummary, CampaignError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        self.downloader.fetch().await?;
        tracing::info!(
            %run_id,
            path = %self.downloader.local_path().display(),
            "campaign file downloaded"
        );

        let requests = self.source.load().await?;
        let total = requests.len();
        tracing::info!(%run_id, records = total, "campaign file parsed");

        let report = self.dispatcher.dispatch(requests).await;
        let delivered = report.delivered_count();
        let failed = report.failed_count();

        self.sink.persist(&report).await?;
        tracing::info!(
            %run_id,
            delivered,
            failed,
            path = %self.sink.path().display(),
            "delivery report persisted"
        );

        Ok(CampaignSummary {
            run_id,
            started_at,
            total,
            delivered,
            failed,
            report_path: self.sink.path().to_path_buf(),
        })
    }
}
