use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::domain::errors::CampaignError;

/// Fetches the campaign file into the local working path before parsing.
/// Any transport or non-success status aborts the run.
pub struct CampaignFileDownloader {
    http: Client,
    url: String,
    local_path: PathBuf,
}

impl CampaignFileDownloader {
    pub fn new(http: Client, url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            http,
            url: url.into(),
            local_path: local_path.into(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub async fn fetch(&self) -> Result<(), CampaignError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|source| self.download_error(source))?
            .error_for_status()
            .map_err(|source| self.download_error(source))?;

        let body = response
            .bytes()
            .await
            .map_err(|source| self.download_error(source))?;

        tokio::fs::write(&self.local_path, &body)
            .await
            .map_err(|source| CampaignError::InputFile {
                path: self.local_path.clone(),
                source,
            })?;

        Ok(())
    }

    fn download_error(&self, source: reqwest::Error) -> CampaignError {
        CampaignError::Download {
            url: self.url.clone(),
            source,
        }
    }
}
