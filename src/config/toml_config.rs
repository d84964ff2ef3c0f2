use crate::core::ConfigProvider;
use crate::domain::model::Color;
use crate::utils::error::{ScheduleError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_path, validate_range, Validate,
};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_FORMATS: &[&str] = &["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub marker: MarkerConfig,
    pub event: EventConfig,
    pub ocr: OcrConfig,
    pub calendar: CalendarConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// 班表上工作區塊的顏色
    pub rgba: [u8; 4],
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            rgba: [0, 51, 187, 255],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            title: "Work".to_string(),
            description: "Automatically parsed from picture, hopefully dates are correct..."
                .to_string(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub language: String,
    pub tesseract_path: String,
    /// Tesseract --psm; 7 treats the crop as a single text line.
    pub page_segmentation_mode: u8,
    pub timeout_seconds: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            page_segmentation_mode: 7,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// 截圖上的時間所屬時區，相對 UTC 的分鐘數；未設定視為 UTC
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            formats: vec!["json".to_string(), "csv".to_string()],
        }
    }
}

impl ParserConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScheduleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScheduleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TESSERACT_PATH})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for ParserConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("event.title", &self.event.title)?;
        validate_non_empty_string("ocr.language", &self.ocr.language)?;
        validate_non_empty_string("ocr.tesseract_path", &self.ocr.tesseract_path)?;
        validate_range("ocr.timeout_seconds", self.ocr.timeout_seconds, 1, 600)?;
        validate_range("ocr.page_segmentation_mode", self.ocr.page_segmentation_mode, 0, 13)?;

        if let Some(minutes) = self.calendar.utc_offset_minutes {
            validate_range("calendar.utc_offset_minutes", minutes, -14 * 60, 14 * 60)?;
        }

        validate_path("output.path", &self.output.path)?;
        validate_allowed_values("output.formats", &self.output.formats, SUPPORTED_FORMATS)?;

        Ok(())
    }
}

impl ConfigProvider for ParserConfig {
    fn marker_color(&self) -> Color {
        Color::from(self.marker.rgba)
    }

    fn event_title(&self) -> &str {
        &self.event.title
    }

    fn event_description(&self) -> &str {
        &self.event.description
    }

    fn event_location(&self) -> Option<&str> {
        self.event.location.as_deref()
    }

    fn ocr_language(&self) -> &str {
        &self.ocr.language
    }

    fn utc_offset(&self) -> FixedOffset {
        self.calendar
            .utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| Utc.fix())
    }
}
