use std::path::PathBuf;

use csv::ReaderBuilder;

use crate::domain::{errors::CampaignError, models::MessageRequest};

/// Column layout of the campaign file (semicolon separated, header row
/// first): recipient number at index 1, message text at index 3.
const NUMBER_COLUMN: usize = 1;
const MESSAGE_COLUMN: usize = 3;

/// Parses the downloaded campaign file into one message request per data
/// row. A malformed row fails the whole batch; there is no
/// partial-success mode.
pub struct CsvRecordSource {
    path: PathBuf,
    template_name: String,
    language: String,
}

impl CsvRecordSource {
    pub fn new(
        path: impl Into<PathBuf>,
        template_name: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            template_name: template_name.into(),
            language: language.into(),
        }
    }

    pub async fn load(&self) -> Result<Vec<MessageRequest>, CampaignError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CampaignError::InputFile {
                path: self.path.clone(),
                source,
            })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut requests = Vec::new();
        for (row, record) in reader.records().enumerate() {
            // 1-based file line, accounting for the header.
            let line = row + 2;
            let record =
                record.map_err(|err| CampaignError::Parse(format!("line {line}: {err}")))?;

            let number = record.get(NUMBER_COLUMN).ok_or_else(|| {
                CampaignError::Parse(format!("line {line}: missing recipient column"))
            })?;
            let message = record.get(MESSAGE_COLUMN).ok_or_else(|| {
                CampaignError::Parse(format!("line {line}: missing message column"))
            })?;

            if number.trim().is_empty() || message.trim().is_empty() {
                tracing::warn!(line, "record has an empty recipient or message");
            }

            requests.push(MessageRequest::templated(
                number,
                &self.template_name,
                &self.language,
                message,
            ));
        }

        Ok(requests)
    }
}
