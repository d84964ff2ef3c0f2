use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use url::form_urlencoded;

pub const CALENDAR_EVENT_ENDPOINT: &str = "https://calendar.google.com/calendar/u/0/r/eventedit";

/// 2023-01-02T09:00:00.000Z → 20230102T090000000Z
pub fn basic_utc_timestamp<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(['-', ':', '.'], "")
}

pub fn dates_param<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String {
    format!("{}/{}", basic_utc_timestamp(start), basic_utc_timestamp(end))
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds a Google Calendar "create event" link.
pub fn build_event_url<Tz: TimeZone>(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    title: &str,
    description: Option<&str>,
    location: Option<&str>,
) -> String {
    let mut url = format!(
        "{}?text={}&dates={}",
        CALENDAR_EVENT_ENDPOINT,
        encode(title),
        dates_param(start, end)
    );
    if let Some(details) = description.filter(|d| !d.is_empty()) {
        url.push_str("&details=");
        url.push_str(&encode(details));
    }
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        url.push_str("&location=");
        url.push_str(&encode(location));
    }
    url
}
