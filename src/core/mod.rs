pub mod calendar_url;
pub mod color;
pub mod engine;
pub mod grid;
pub mod ocr;
pub mod pipeline;
pub mod regions;
pub mod session;
pub mod time_mapper;

pub use crate::domain::model::{BoundingBox, Color, ParsedEvent, ScheduleGrid, ScheduleImage, WorkBlock};
pub use crate::domain::ports::{
    ConfigProvider, ImageDecoder, Pipeline, ProgressNotifier, Storage, TextRecognizer,
};
pub use crate::utils::error::Result;
