#![allow(dead_code)]

use async_trait::async_trait;
use shift_snap::core::{ProgressNotifier, TextRecognizer};
use shift_snap::{Color, Result, ScheduleError, ScheduleImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const WHITE: Color = Color::new(255, 255, 255, 255);
pub const BORDER: Color = Color::new(204, 204, 204, 255);
pub const MARKER: Color = Color::new(0, 51, 187, 255);
/// 工作區塊左側的深色邊
pub const ACCENT: Color = Color::new(0, 32, 120, 255);

pub const HOUR_WIDTH: u32 = 20;
/// 標題格內部最右邊的 x
pub const HEADER_RIGHT: u32 = 60;
pub const FIRST_ROW_TOP: u32 = 22;
pub const ROW_HEIGHT: u32 = 30;
pub const ROW_PITCH: u32 = ROW_HEIGHT + 1;

/// Synthetic weekly schedule screenshot.
///
/// Layout: a date-header column (x 1..=60) separated from 24 hour cells by a
/// double vertical line (x 61/62), hour lines every 20px after that; an
/// hour-label band on top separated from the day rows by a double horizontal
/// line (y 20/21); day rows 30px high with single lines between them. Work
/// blocks are marker-colored bars with a darker one-pixel stripe on their
/// left, leaving white space below them inside the row.
pub struct ScheduleBuilder {
    days: u32,
    shifts: Vec<(u32, f64, f64)>,
}

impl ScheduleBuilder {
    pub fn new(days: u32) -> Self {
        Self {
            days,
            shifts: Vec::new(),
        }
    }

    /// A whole-hour start puts the block's left stripe on top of the hour line.
    pub fn shift(mut self, day: u32, start: f64, end: f64) -> Self {
        self.shifts.push((day, start, end));
        self
    }

    pub fn width() -> u32 {
        HEADER_RIGHT + 2 + 24 * HOUR_WIDTH + 1
    }

    pub fn height(&self) -> u32 {
        FIRST_ROW_TOP + self.days * ROW_PITCH
    }

    fn is_grid_line(x: u32, y: u32) -> bool {
        let line_origin = HEADER_RIGHT + 2;
        let vertical = x == 0
            || x == HEADER_RIGHT + 1
            || x == line_origin
            || (x > line_origin && (x - line_origin) % HOUR_WIDTH == 0);
        let horizontal = y == 0
            || y == FIRST_ROW_TOP - 2
            || (y >= FIRST_ROW_TOP - 1 && (y - (FIRST_ROW_TOP - 1)) % ROW_PITCH == 0);
        vertical || horizontal
    }

    /// Pixel extent of a shift: (x0, x1, y0, y1).
    pub fn block_bounds(day: u32, start: f64, end: f64) -> (u32, u32, u32, u32) {
        let x0 = HEADER_RIGHT + 3 + (start * HOUR_WIDTH as f64).round() as u32;
        let x1 = HEADER_RIGHT + 1 + (end * HOUR_WIDTH as f64).round() as u32;
        let y0 = FIRST_ROW_TOP + day * ROW_PITCH + 2;
        let y1 = y0 + 21;
        (x0, x1, y0, y1)
    }

    fn paint(&self, x: u32, y: u32) -> Color {
        let line = Self::is_grid_line(x, y);
        for &(day, start, end) in &self.shifts {
            let (x0, x1, y0, y1) = Self::block_bounds(day, start, end);
            if !(y0..=y1).contains(&y) {
                continue;
            }
            if x == x0 - 1 {
                return ACCENT;
            }
            if (x0..=x1).contains(&x) && !line {
                return MARKER;
            }
        }
        if line {
            BORDER
        } else {
            WHITE
        }
    }

    pub fn build(&self) -> ScheduleImage {
        let (width, height) = (Self::width(), self.height());
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&self.paint(x, y).rgba());
            }
        }
        ScheduleImage::new(width, height, data).unwrap()
    }
}

pub fn blank_image(width: u32, height: u32) -> ScheduleImage {
    ScheduleImage::new(width, height, WHITE.rgba().repeat((width * height) as usize)).unwrap()
}

/// OCR stub returning scripted lines and recording every crop it receives.
pub struct StubRecognizer {
    lines: Vec<String>,
    pub calls: AtomicUsize,
    pub crops: Mutex<Vec<(u32, u32, String)>>,
}

impl StubRecognizer {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            calls: AtomicUsize::new(0),
            crops: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(&self, image: &ScheduleImage, language: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.crops
            .lock()
            .unwrap()
            .push((image.width(), image.height(), language.to_string()));
        Ok(self.lines.clone())
    }
}

pub struct FailingRecognizer;

#[async_trait]
impl TextRecognizer for FailingRecognizer {
    async fn recognize(&self, _image: &ScheduleImage, _language: &str) -> Result<Vec<String>> {
        Err(ScheduleError::RecognitionFailure {
            message: "tesseract timed out".to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    fn push(&self, level: Level, message: &str) {
        self.messages.lock().unwrap().push((level, message.to_string()));
    }
}

impl ProgressNotifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
