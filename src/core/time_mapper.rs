use crate::domain::model::{BoundingBox, WorkBlock};
use crate::utils::error::{Result, ScheduleError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

/// 標題欄右緣到第 0 小時起點之間的雙線寬度
const START_EDGE_OFFSET: i64 = 3;
/// Block end pixels sit one pixel before the next hour line.
const END_EDGE_OFFSET: i64 = 1;

// 兩位數年份要先試，否則 %Y 會把 "23" 當成西元 23 年
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

fn weekday_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("valid weekday regex")
    })
}

/// 把 OCR 讀到的標題文字解析成日期。
pub fn parse_header_date(text: &str) -> Result<NaiveDate> {
    let unparseable = || ScheduleError::UnparseableDate {
        text: text.to_string(),
    };

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(unparseable());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&collapsed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&collapsed) {
        return Ok(dt.date_naive());
    }

    let cleaned = weekday_prefix().replace(&collapsed, "");
    let cleaned = cleaned.trim_end_matches(['.', ',', ';', ':']);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .ok_or_else(unparseable)
}

/// Converts merged regions into day offsets and fractional hours.
pub fn map_work_blocks(
    regions: &[BoundingBox],
    date_cell: &BoundingBox,
    hour_cell_width: u32,
) -> Vec<WorkBlock> {
    let cell_height = date_cell.y1 as i64 - date_cell.y0 as i64 + 1;
    let hour_width = hour_cell_width as f64;
    let cell_right = date_cell.x1 as i64;

    regions
        .iter()
        .map(|region| WorkBlock {
            day_offset: (region.y0 as i64 - date_cell.y0 as i64).div_euclid(cell_height),
            starts_at: (region.x0 as i64 - cell_right - START_EDGE_OFFSET) as f64 / hour_width,
            ends_at: (region.x1 as i64 - cell_right - END_EDGE_OFFSET) as f64 / hour_width,
        })
        .collect()
}

/// 小時數轉成當天午夜起算的分鐘數；分鐘四捨五入，滿 60 進位。
fn minutes_since_midnight(hours: f64) -> i64 {
    let whole = hours.floor();
    let minutes = (60.0 * (hours - whole)).round();
    whole as i64 * 60 + minutes as i64
}

/// Resolves a block against the anchor date.
///
/// The end time reuses the start's calendar day; a block crossing midnight
/// is not represented as a separate day.
pub fn resolve_interval(
    base_date: NaiveDate,
    block: &WorkBlock,
    offset: FixedOffset,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let day: NaiveDateTime = (base_date + Duration::days(block.day_offset))
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ScheduleError::ConfigError {
            message: format!("invalid midnight for {}", base_date),
        })?;

    let start = day + Duration::minutes(minutes_since_midnight(block.starts_at));
    let end = day + Duration::minutes(minutes_since_midnight(block.ends_at));

    let attach = |local: NaiveDateTime| {
        offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| ScheduleError::ConfigError {
                message: format!("{} is ambiguous at offset {}", local, offset),
            })
    };
    Ok((attach(start)?, attach(end)?))
}
