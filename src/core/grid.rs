//! Grid geometry: calibration of the hour cells and localisation of the
//! first date-header cell.
//!
//! Every walk here expects to hit a grid line before leaving the image. When
//! it does not, the screenshot does not have the layout we expect and the run
//! fails with `BoundsExceeded`.

use crate::core::color::colors_equal;
use crate::domain::model::{BoundingBox, Color, ScheduleImage};
use crate::utils::error::{Result, ScheduleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Narrowest hour cell accepted: one border pixel plus at least two interior pixels.
const MIN_CELL_WIDTH: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCalibration {
    pub hour_cell_width: u32,
    pub border_color: Color,
}

/// 從 `(x, y)` 的下一格開始沿 `direction` 前進，回傳第一個不滿足 `keep` 的像素位置與顏色。
pub fn walk_while(
    image: &ScheduleImage,
    (x, y): (i64, i64),
    direction: Direction,
    stage: &'static str,
    keep: impl Fn(Color) -> bool,
) -> Result<(i64, i64, Color)> {
    let (dx, dy) = direction.delta();
    let (mut cx, mut cy) = (x + dx, y + dy);
    loop {
        match image.pixel(cx, cy) {
            None => return Err(ScheduleError::BoundsExceeded { stage, x: cx, y: cy }),
            Some(color) if keep(color) => {
                cx += dx;
                cy += dy;
            }
            Some(color) => return Ok((cx, cy, color)),
        }
    }
}

fn color_at(image: &ScheduleImage, x: i64, y: i64, stage: &'static str) -> Result<Color> {
    image
        .pixel(x, y)
        .ok_or(ScheduleError::BoundsExceeded { stage, x, y })
}

/// Finds an empty hour-cell pixel just below the first work block.
///
/// Starts one pixel left of the block's top-left corner and moves down past
/// every pixel sharing that starting color. The reference is the block's
/// first column on that row: the column left of the block can be an hour
/// line when the block starts on a whole hour, the block's own first column
/// never is.
pub fn calibration_reference(image: &ScheduleImage, first: &BoundingBox) -> Result<(u32, u32)> {
    const STAGE: &str = "reference";

    let x = first.x0 as i64 - 1;
    let y = first.y0 as i64;
    let edge = color_at(image, x, y, STAGE)?;
    let (_, ry, _) = walk_while(image, (x, y), Direction::Down, STAGE, |c| {
        colors_equal(edge, c)
    })?;

    tracing::debug!("Calibration reference at ({}, {})", first.x0, ry);
    Ok((first.x0, ry as u32))
}

/// 以參考點所在的空白格子為準，往左右找到格線，量出一小時的像素寬度與格線顏色。
pub fn calibrate(image: &ScheduleImage, reference_x: u32, reference_y: u32) -> Result<GridCalibration> {
    const STAGE: &str = "calibration";

    let origin = (reference_x as i64, reference_y as i64);
    let interior = color_at(image, origin.0, origin.1, STAGE)?;
    let is_interior = |c| colors_equal(interior, c);

    let (left, _, border_color) = walk_while(image, origin, Direction::Left, STAGE, is_interior)?;
    let (right, _, right_color) = walk_while(image, origin, Direction::Right, STAGE, is_interior)?;

    // 參考點不在空白格內（例如落在格線上）時兩側顏色不同或寬度過窄
    if right - left < MIN_CELL_WIDTH || !colors_equal(border_color, right_color) {
        tracing::warn!(
            "Reference ({}, {}) is not inside an hour cell: borders {} / {}, width {}",
            origin.0,
            origin.1,
            border_color,
            right_color,
            right - left
        );
        return Err(ScheduleError::BoundsExceeded {
            stage: STAGE,
            x: origin.0,
            y: origin.1,
        });
    }

    let calibration = GridCalibration {
        hour_cell_width: (right - left) as u32,
        border_color,
    };
    tracing::debug!(
        "Hour cell width {}px, border color {}",
        calibration.hour_cell_width,
        calibration.border_color
    );
    Ok(calibration)
}

/// Walks until two consecutive border pixels are seen and returns the
/// position of the second one.
fn find_double_line(
    image: &ScheduleImage,
    origin: (i64, i64),
    direction: Direction,
    border: Color,
    stage: &'static str,
) -> Result<(i64, i64)> {
    let (dx, dy) = direction.delta();
    let (mut x, mut y) = origin;
    let mut last_matched = false;

    loop {
        x += dx;
        y += dy;
        let color = color_at(image, x, y, stage)?;
        if colors_equal(border, color) {
            if last_matched {
                return Ok((x, y));
            }
            last_matched = true;
        } else {
            last_matched = false;
        }
    }
}

/// 找出第一個日期標題格的外框。
///
/// 標題欄與小時格之間、以及標題列上方都是雙線；先往左找雙線，再往上找雙線，
/// 落在格子內部後往四個方向擴張到格線為止。
pub fn locate_first_date_cell(
    image: &ScheduleImage,
    border: Color,
    reference_x: u32,
    reference_y: u32,
) -> Result<BoundingBox> {
    let origin = (reference_x as i64, reference_y as i64);

    let (line_x, _) = find_double_line(image, origin, Direction::Left, border, "date column")?;
    let column_x = line_x - 1;

    let (_, line_y) = find_double_line(
        image,
        (column_x, origin.1),
        Direction::Up,
        border,
        "date header",
    )?;
    // 雙線下方第二列像素，確定在格子內
    let row_y = line_y + 3;

    let cell = cell_bounding_box(image, border, column_x, row_y)?;
    tracing::debug!("First date cell {:?}", cell);
    Ok(cell)
}

/// Expands from an interior point until border pixels are met on each side.
pub fn cell_bounding_box(image: &ScheduleImage, border: Color, x: i64, y: i64) -> Result<BoundingBox> {
    const STAGE: &str = "date cell";
    let not_border = |c| !colors_equal(border, c);

    let (_, top, _) = walk_while(image, (x, y), Direction::Up, STAGE, not_border)?;
    let y0 = top + 1;
    let (left, _, _) = walk_while(image, (x, y0), Direction::Left, STAGE, not_border)?;
    let x0 = left + 1;
    let (_, bottom, _) = walk_while(image, (x, y), Direction::Down, STAGE, not_border)?;
    let y1 = bottom - 1;
    let (right, _, _) = walk_while(image, (x, y1), Direction::Right, STAGE, not_border)?;
    let x1 = right - 1;

    Ok(BoundingBox::new(x0 as u32, x1 as u32, y0 as u32, y1 as u32))
}
