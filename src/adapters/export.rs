use crate::core::Storage;
use crate::domain::model::ParsedEvent;
use crate::utils::error::{Result, ScheduleError};
use serde::Serialize;

pub const JSON_FILENAME: &str = "events.json";
pub const CSV_FILENAME: &str = "events.csv";

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    title: &'a str,
    description: &'a str,
    start: String,
    end: String,
    url: &'a str,
}

/// 依設定的格式把事件清單寫到 storage
pub struct EventExporter<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> EventExporter<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Self {
        Self { storage, formats }
    }

    /// Writes every configured format and returns the written file names.
    pub async fn export(&self, events: &[ParsedEvent]) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in &self.formats {
            let (filename, data) = match format.as_str() {
                "json" => (JSON_FILENAME, serde_json::to_vec_pretty(events)?),
                "csv" => (CSV_FILENAME, to_csv(events)?),
                other => {
                    return Err(ScheduleError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported export format".to_string(),
                    })
                }
            };

            self.storage.write_file(filename, &data).await?;
            tracing::info!("📁 Wrote {} events to {}", events.len(), filename);
            written.push(filename.to_string());
        }

        Ok(written)
    }
}

fn to_csv(events: &[ParsedEvent]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in events {
        writer.serialize(EventRow {
            title: &event.title,
            description: &event.description,
            start: event.start.to_rfc3339(),
            end: event.end.to_rfc3339(),
            url: &event.url,
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| ScheduleError::IoError(e.into_error()))
}
