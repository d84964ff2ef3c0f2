use crate::adapters::png::to_rgba_image;
use crate::config::toml_config::OcrConfig;
use crate::domain::model::ScheduleImage;
use crate::domain::ports::TextRecognizer;
use crate::utils::error::{Result, ScheduleError};
use async_trait::async_trait;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// 呼叫本機的 tesseract 執行檔做 OCR
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: String,
    page_segmentation_mode: u8,
    timeout: Duration,
}

impl TesseractRecognizer {
    pub fn new(executable: impl Into<String>, page_segmentation_mode: u8, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            page_segmentation_mode,
            timeout,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(
            config.tesseract_path.clone(),
            config.page_segmentation_mode,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

fn failure(message: impl Into<String>) -> ScheduleError {
    ScheduleError::RecognitionFailure {
        message: message.into(),
    }
}

/// Splits tesseract's plain-text output into non-blank lines.
pub fn parse_stdout_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &ScheduleImage, language: &str) -> Result<Vec<String>> {
        // 先把裁切後的圖存成暫存 PNG
        let temp_input = NamedTempFile::with_suffix(".png")?;
        to_rgba_image(image)?
            .save(temp_input.path())
            .map_err(|e| failure(format!("could not write OCR input: {}", e)))?;

        tracing::debug!(
            "Running {} on {} (lang {}, psm {})",
            self.executable,
            temp_input.path().display(),
            language,
            self.page_segmentation_mode
        );

        let run = Command::new(&self.executable)
            .arg(temp_input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(self.page_segmentation_mode.to_string())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| failure(format!("tesseract timed out after {:?}", self.timeout)))?
            .map_err(|e| failure(format!("could not start {}: {}", self.executable, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("tesseract failed: {}", stderr.trim())));
        }

        let lines = parse_stdout_lines(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!("Tesseract returned {} lines", lines.len());
        Ok(lines)
    }
}
