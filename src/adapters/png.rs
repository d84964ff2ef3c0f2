use crate::domain::model::ScheduleImage;
use crate::domain::ports::ImageDecoder;
use crate::utils::error::{Result, ScheduleError};
use image::{ImageFormat, RgbaImage};

/// 用 `image` crate 把 PNG 解成 RGBA8
#[derive(Debug, Clone, Copy, Default)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ScheduleImage> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        from_rgba_image(decoded.to_rgba8())
    }
}

pub fn from_rgba_image(img: RgbaImage) -> Result<ScheduleImage> {
    let (width, height) = img.dimensions();
    ScheduleImage::new(width, height, img.into_raw())
}

pub fn to_rgba_image(image: &ScheduleImage) -> Result<RgbaImage> {
    RgbaImage::from_raw(image.width(), image.height(), image.as_bytes().to_vec()).ok_or_else(|| {
        ScheduleError::InvalidImage {
            message: "pixel buffer does not match image dimensions".to_string(),
        }
    })
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &ScheduleImage) -> Result<Vec<u8>> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    to_rgba_image(image)?.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}
