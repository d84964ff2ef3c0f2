use crate::core::color::colors_equal;
use crate::domain::model::{BoundingBox, Color, ScheduleImage};

/// 以 row-major 順序掃描整張圖，為每個尚未被框住的目標色像素建立一個十字外框。
pub fn find_regions(image: &ScheduleImage, target: Color) -> Vec<BoundingBox> {
    let (width, height) = (image.width(), image.height());

    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .fold(Vec::new(), |mut boxes, (x, y)| {
            let matches = image
                .pixel(x as i64, y as i64)
                .is_some_and(|c| colors_equal(target, c));
            if matches && !boxes.iter().any(|bb: &BoundingBox| bb.contains(x, y)) {
                boxes.push(cross_bounding_box(image, x, y));
            }
            boxes
        })
}

/// Bounds the same-color runs along the four axes through `(x, y)`.
///
/// This is not a flood fill: only the row and column through the seed are
/// walked, so concave shapes are approximated.
pub fn cross_bounding_box(image: &ScheduleImage, x: u32, y: u32) -> BoundingBox {
    let (sx, sy) = (x as i64, y as i64);
    let Some(seed) = image.pixel(sx, sy) else {
        return BoundingBox::new(x, x, y, y);
    };
    let same = |px: i64, py: i64| image.pixel(px, py).is_some_and(|c| colors_equal(seed, c));

    let run = |dx: i64, dy: i64| {
        let mut steps = 0;
        while same(sx + dx * (steps + 1), sy + dy * (steps + 1)) {
            steps += 1;
        }
        steps as u32
    };

    BoundingBox {
        x0: x - run(-1, 0),
        x1: x + run(1, 0),
        y0: y - run(0, -1),
        y1: y + run(0, 1),
    }
}

/// 合併同一列（相同 y0）被格線切開的區塊，保留各組第一次出現的順序。
pub fn merge_regions(boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    boxes.iter().fold(Vec::new(), |mut merged: Vec<BoundingBox>, bb| {
        match merged.iter_mut().find(|m| m.y0 == bb.y0) {
            Some(existing) => {
                existing.x0 = existing.x0.min(bb.x0);
                existing.x1 = existing.x1.max(bb.x1);
                existing.y1 = existing.y1.max(bb.y1);
            }
            None => merged.push(*bb),
        }
        merged
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(255, 255, 255, 255);
    const BLUE: Color = Color::new(0, 51, 187, 255);

    fn canvas(width: u32, height: u32, paint: impl Fn(u32, u32) -> Color) -> ScheduleImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&paint(x, y).rgba());
            }
        }
        ScheduleImage::new(width, height, data).unwrap()
    }

    #[test]
    fn test_solid_rectangle_yields_single_box() {
        let rect = BoundingBox::new(3, 12, 4, 9);
        let img = canvas(20, 15, |x, y| if rect.contains(x, y) { BLUE } else { WHITE });

        assert_eq!(find_regions(&img, BLUE), vec![rect]);
    }

    #[test]
    fn test_rectangle_touching_image_edges() {
        let img = canvas(6, 4, |x, _| if x >= 2 { BLUE } else { WHITE });
        assert_eq!(find_regions(&img, BLUE), vec![BoundingBox::new(2, 5, 0, 3)]);
    }

    #[test]
    fn test_vertical_line_splits_block() {
        let img = canvas(20, 10, |x, y| {
            if (2..=8).contains(&y) && (4..=15).contains(&x) && x != 9 {
                BLUE
            } else {
                WHITE
            }
        });

        let boxes = find_regions(&img, BLUE);
        assert_eq!(
            boxes,
            vec![BoundingBox::new(4, 8, 2, 8), BoundingBox::new(10, 15, 2, 8)]
        );
        assert_eq!(merge_regions(&boxes), vec![BoundingBox::new(4, 15, 2, 8)]);
    }

    #[test]
    fn test_no_target_color_yields_nothing() {
        let img = canvas(5, 5, |_, _| WHITE);
        assert!(find_regions(&img, BLUE).is_empty());
    }

    #[test]
    fn test_single_pixel_region() {
        let img = canvas(5, 5, |x, y| if (x, y) == (2, 3) { BLUE } else { WHITE });
        assert_eq!(find_regions(&img, BLUE), vec![BoundingBox::new(2, 2, 3, 3)]);
    }

    #[test]
    fn test_cross_box_underestimates_l_shape() {
        // L 形：第二個種子 (2, 6) 沿列往左走回到 x = 1，兩個框重疊
        let img = canvas(10, 10, |x, y| {
            if (x == 1 && (1..=6).contains(&y)) || (y == 6 && (1..=6).contains(&x)) {
                BLUE
            } else {
                WHITE
            }
        });

        let boxes = find_regions(&img, BLUE);
        assert_eq!(boxes[0], BoundingBox::new(1, 1, 1, 6));
        assert_eq!(boxes[1], BoundingBox::new(1, 6, 6, 6));
        assert_eq!(boxes.len(), 2);
    }

    #[test]
    fn test_merge_groups_by_top_row() {
        let boxes = [
            BoundingBox::new(5, 20, 10, 15),
            BoundingBox::new(18, 30, 10, 12),
        ];
        assert_eq!(merge_regions(&boxes), vec![BoundingBox::new(5, 30, 10, 15)]);
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let boxes = [
            BoundingBox::new(40, 50, 30, 35),
            BoundingBox::new(5, 9, 10, 15),
            BoundingBox::new(1, 3, 30, 40),
        ];
        assert_eq!(
            merge_regions(&boxes),
            vec![BoundingBox::new(1, 50, 30, 40), BoundingBox::new(5, 9, 10, 15)]
        );
    }
}
