use crate::core::calendar_url::build_event_url;
use crate::core::grid::{calibrate, calibration_reference, locate_first_date_cell};
use crate::core::ocr::recognize_region_text;
use crate::core::regions::{find_regions, merge_regions};
use crate::core::time_mapper::{map_work_blocks, parse_header_date, resolve_interval};
use crate::core::{ConfigProvider, Pipeline, TextRecognizer};
use crate::domain::model::{ParsedEvent, ScheduleGrid, ScheduleImage};
use crate::utils::error::{Result, ScheduleError};

/// 單一格式的週班表截圖解析流程
pub struct SchedulePipeline<R: TextRecognizer, C: ConfigProvider> {
    recognizer: R,
    config: C,
}

impl<R: TextRecognizer, C: ConfigProvider> SchedulePipeline<R, C> {
    pub fn new(recognizer: R, config: C) -> Self {
        Self { recognizer, config }
    }
}

#[async_trait::async_trait]
impl<R: TextRecognizer, C: ConfigProvider> Pipeline for SchedulePipeline<R, C> {
    async fn locate(&self, image: &ScheduleImage) -> Result<ScheduleGrid> {
        let marker = self.config.marker_color();
        tracing::debug!(
            "Scanning {}x{} image for marker {}",
            image.width(),
            image.height(),
            marker
        );

        let boxes = find_regions(image, marker);
        let regions = merge_regions(&boxes);
        tracing::debug!("{} raw regions merged into {}", boxes.len(), regions.len());

        let first = regions
            .first()
            .ok_or(ScheduleError::NoMarkersFound { color: marker })?;

        let (reference_x, reference_y) = calibration_reference(image, first)?;
        let calibration = calibrate(image, reference_x, reference_y)?;
        let date_cell =
            locate_first_date_cell(image, calibration.border_color, reference_x, reference_y)?;

        let grid = ScheduleGrid {
            regions,
            hour_cell_width: calibration.hour_cell_width,
            border_color: calibration.border_color,
            date_cell,
        };
        tracing::info!(
            "📐 Grid: {} blocks, hour width {}px, border {}, date cell {:?}",
            grid.regions.len(),
            grid.hour_cell_width,
            grid.border_color,
            grid.date_cell
        );
        Ok(grid)
    }

    async fn recognize_header(&self, image: &ScheduleImage, grid: &ScheduleGrid) -> Result<String> {
        recognize_region_text(
            &self.recognizer,
            image,
            &grid.date_cell,
            self.config.ocr_language(),
        )
        .await
    }

    async fn build_events(&self, grid: &ScheduleGrid, header_text: &str) -> Result<Vec<ParsedEvent>> {
        let base_date = parse_header_date(header_text)?;
        let offset = self.config.utc_offset();
        let title = self.config.event_title();
        let description = self.config.event_description();

        map_work_blocks(&grid.regions, &grid.date_cell, grid.hour_cell_width)
            .iter()
            .map(|block| -> Result<ParsedEvent> {
                let (start, end) = resolve_interval(base_date, block, offset)?;
                tracing::debug!(
                    "Day +{}: {:.3}h-{:.3}h -> {} - {}",
                    block.day_offset,
                    block.starts_at,
                    block.ends_at,
                    start,
                    end
                );
                Ok(ParsedEvent {
                    title: title.to_string(),
                    description: description.to_string(),
                    url: build_event_url(
                        &start,
                        &end,
                        title,
                        Some(description),
                        self.config.event_location(),
                    ),
                    start,
                    end,
                })
            })
            .collect()
    }
}
