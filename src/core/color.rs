use crate::domain::model::Color;

/// 每個通道允許的差距（嚴格小於）。整數通道下等同完全相等。
pub const COLOR_TOLERANCE: i16 = 1;

pub fn colors_equal(a: Color, b: Color) -> bool {
    a.rgba()
        .iter()
        .zip(b.rgba().iter())
        .all(|(&x, &y)| (x as i16 - y as i16).abs() < COLOR_TOLERANCE)
}
