pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{EventExporter, LocalStorage, PngDecoder, TesseractRecognizer, TracingNotifier};
pub use config::ParserConfig;
pub use crate::core::{
    engine::ScheduleEngine,
    pipeline::SchedulePipeline,
    session::{RunToken, ScheduleSession, SessionState},
};
pub use domain::model::{BoundingBox, Color, ParsedEvent, ScheduleGrid, ScheduleImage, WorkBlock};
pub use utils::error::{Result, ScheduleError};
