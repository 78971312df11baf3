use anyhow::Context;
use tokio::main;
use tracing_subscriber::EnvFilter;

use campaign::{
    application::{
        handlers::batch_dispatcher::BatchDispatcher, usecases::run_campaign::RunCampaignUseCase,
    },
    config::Config,
    infrastructure::{
        messaging::whatsapp::WhatsAppClient,
        sinks::json_report::JsonReportSink,
        sources::{csv::CsvRecordSource, download::CampaignFileDownloader},
    },
};

#[main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::try_parse().map_err(anyhow::Error::msg)?;

    let downloader = CampaignFileDownloader::new(
        reqwest::Client::new(),
        &config.csv_url,
        &config.local_path,
    );
    let source = CsvRecordSource::new(
        &config.local_path,
        &config.template_name,
        &config.template_language,
    );
    let sender = WhatsAppClient::new(&config.whatsapp);
    let dispatcher = BatchDispatcher::new(sender, config.dispatch.clone(), config.retry.clone());
    let sink = JsonReportSink::new(&config.report_path);

    let campaign = RunCampaignUseCase::new(downloader, source, dispatcher, sink);

    println!("Sending campaign from {}", config.csv_url);
    let summary = campaign.execute().await.context("campaign run failed")?;
    println!(
        "Campaign {} finished: {} delivered, {} failed out of {} records",
        summary.run_id, summary.delivered, summary.failed, summary.total
    );
    println!("Responses saved to {}", summary.report_path.display());

    Ok(())
}
