use crate::domain::model::Color;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("No work markers of color {color} found in the image")]
    NoMarkersFound { color: Color },

    #[error("Could not calibrate grid: {stage} walk reached the image edge at ({x}, {y})")]
    BoundsExceeded { stage: &'static str, x: i64, y: i64 },

    #[error("Unparseable date header: {text:?}")]
    UnparseableDate { text: String },

    #[error("Text recognition failed: {message}")]
    RecognitionFailure { message: String },

    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    #[error("Image decoding failed: {0}")]
    ImageDecodeError(#[from] image::ImageError),

    #[error("Input error: {message}")]
    InputError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Run {generation} was superseded by run {current}")]
    SupersededRun { generation: u64, current: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Detection,
    Recognition,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScheduleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScheduleError::InvalidImage { .. }
            | ScheduleError::ImageDecodeError(_)
            | ScheduleError::InputError { .. } => ErrorCategory::Input,
            ScheduleError::NoMarkersFound { .. } | ScheduleError::BoundsExceeded { .. } => {
                ErrorCategory::Detection
            }
            ScheduleError::UnparseableDate { .. } | ScheduleError::RecognitionFailure { .. } => {
                ErrorCategory::Recognition
            }
            ScheduleError::ConfigError { .. }
            | ScheduleError::ConfigValidationError { .. }
            | ScheduleError::InvalidConfigValueError { .. }
            | ScheduleError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScheduleError::IoError(_)
            | ScheduleError::SerializationError(_)
            | ScheduleError::CsvError(_)
            | ScheduleError::SupersededRun { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 被新的執行取代，不算真正的失敗
            ScheduleError::SupersededRun { .. } => ErrorSeverity::Low,
            ScheduleError::RecognitionFailure { .. } => ErrorSeverity::Medium,
            ScheduleError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給使用者看的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ScheduleError::NoMarkersFound { .. } => {
                "No work blocks were found in the screenshot".to_string()
            }
            ScheduleError::BoundsExceeded { .. } => "Could not calibrate grid".to_string(),
            ScheduleError::UnparseableDate { text } => {
                format!("Could not read a date from the header, recognized \"{}\"", text)
            }
            ScheduleError::RecognitionFailure { .. } => {
                "Text recognition did not finish".to_string()
            }
            ScheduleError::InvalidImage { .. } | ScheduleError::ImageDecodeError(_) => {
                "The image could not be read".to_string()
            }
            ScheduleError::InputError { message } => message.clone(),
            ScheduleError::SupersededRun { .. } => {
                "A newer screenshot replaced this one".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Provide a PNG screenshot of the weekly schedule",
            ErrorCategory::Detection => {
                "Check the marker color setting and take an uncropped, unscaled screenshot of the grid"
            }
            ErrorCategory::Recognition => {
                "Make sure tesseract is installed and the first date header is fully visible"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command line options",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
