use crate::domain::model::{BoundingBox, ScheduleImage};
use crate::domain::ports::TextRecognizer;
use crate::utils::error::Result;

/// 裁切日期格並交給 OCR，只取第一行。沒有重試；辨識失敗直接往上傳。
pub async fn recognize_region_text<R: TextRecognizer + ?Sized>(
    recognizer: &R,
    image: &ScheduleImage,
    region: &BoundingBox,
    language: &str,
) -> Result<String> {
    let crop = image.crop(region)?;
    tracing::debug!(
        "Recognizing {}x{} crop at ({}, {})",
        crop.width(),
        crop.height(),
        region.x0,
        region.y0
    );

    let lines = recognizer.recognize(&crop, language).await?;
    let first = lines.into_iter().next().unwrap_or_default();
    Ok(first.trim_end_matches(['\r', '\n']).to_string())
}
