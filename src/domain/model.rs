use crate::utils::error::{Result, ScheduleError};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 單一像素的 RGBA 顏色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// 解碼後的截圖：row-major RGBA，每像素 4 bytes，沒有 row padding。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ScheduleImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ScheduleError::InvalidImage {
                message: format!(
                    "{}x{} RGBA image needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    data.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let offset = (x as usize + y as usize * self.width as usize) * 4;
        let px = &self.data[offset..offset + 4];
        Some(Color::new(px[0], px[1], px[2], px[3]))
    }

    /// Copies the inclusive `region` into a new image.
    pub fn crop(&self, region: &BoundingBox) -> Result<ScheduleImage> {
        if region.x1 >= self.width || region.y1 >= self.height {
            return Err(ScheduleError::InvalidImage {
                message: format!(
                    "crop region {:?} exceeds {}x{} image",
                    region, self.width, self.height
                ),
            });
        }

        let width = region.width();
        let height = region.height();
        let row_len = width as usize * 4;
        let mut data = Vec::with_capacity(row_len * height as usize);

        for y in region.y0..=region.y1 {
            let start = (region.x0 as usize + y as usize * self.width as usize) * 4;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }

        ScheduleImage::new(width, height, data)
    }
}

/// 包含邊界的像素矩形 (x0..=x1, y0..=y1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl BoundingBox {
    pub const fn new(x0: u32, x1: u32, y0: u32, y1: u32) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }
}

/// One detected day of work, still in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkBlock {
    pub day_offset: i64,
    /// Fractional hours since midnight.
    pub starts_at: f64,
    pub ends_at: f64,
}

/// Geometry recovered from the screenshot before any OCR happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    pub regions: Vec<BoundingBox>,
    pub hour_cell_width: u32,
    pub border_color: Color,
    pub date_cell: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub title: String,
    pub description: String,
    pub url: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}
