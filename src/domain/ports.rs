use crate::domain::model::{Color, ParsedEvent, ScheduleGrid, ScheduleImage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::FixedOffset;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn marker_color(&self) -> Color;
    fn event_title(&self) -> &str;
    fn event_description(&self) -> &str;
    fn event_location(&self) -> Option<&str>;
    fn ocr_language(&self) -> &str;
    fn utc_offset(&self) -> FixedOffset;
}

/// 外部 OCR 引擎。回傳辨識出的文字行，順序與圖片中由上而下一致。
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ScheduleImage, language: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: TextRecognizer + ?Sized> TextRecognizer for Arc<T> {
    async fn recognize(&self, image: &ScheduleImage, language: &str) -> Result<Vec<String>> {
        (**self).recognize(image, language).await
    }
}

/// Receives human-readable progress messages.
pub trait ProgressNotifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: ProgressNotifier + ?Sized> ProgressNotifier for Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<ScheduleImage>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn locate(&self, image: &ScheduleImage) -> Result<ScheduleGrid>;
    async fn recognize_header(&self, image: &ScheduleImage, grid: &ScheduleGrid) -> Result<String>;
    async fn build_events(&self, grid: &ScheduleGrid, header_text: &str) -> Result<Vec<ParsedEvent>>;
}
