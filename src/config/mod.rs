pub mod toml_config;

pub use toml_config::ParserConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "shift-snap")]
#[command(about = "Turn a weekly work-schedule screenshot into calendar events")]
pub struct CliConfig {
    /// Screenshot files; only the first PNG is used
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Offset of the schedule's times from UTC, in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    #[arg(long)]
    pub tesseract: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut ParserConfig) {
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if let Some(minutes) = self.utc_offset {
            config.calendar.utc_offset_minutes = Some(minutes);
        }
        if let Some(tesseract) = &self.tesseract {
            config.ocr.tesseract_path = tesseract.clone();
        }
    }
}
