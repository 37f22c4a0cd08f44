use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Offset-less layouts accepted for event timestamps, read as viewer-local time.
const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventList {
    pub total: u64,
    pub items: Vec<CalendarEvent>,
}

/// Parses an ISO-8601 timestamp into the given zone.
///
/// Timestamps carrying an offset are converted; offset-less ones are taken
/// as wall-clock time in `tz`.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Long-form display date, e.g. "Thursday, January 15, 2026".
///
/// Falls back to the raw text when it is not a recognizable timestamp.
pub fn format_long_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(raw, tz) {
        Some(dt) => dt.format(LONG_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

impl CalendarEvent {
    pub fn start_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp(&self.start_date, tz)
    }

    /// True when the event starts on `day` as seen from `tz`.
    pub fn starts_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> bool {
        self.start_in(tz)
            .map(|start| start.date_naive() == day)
            .unwrap_or(false)
    }
}

impl CalendarEventList {
    pub fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn create_test_event(id: &str, start: &str, end: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: "Standup".to_string(),
            description: "Daily sync".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let event = create_test_event("abc", "2026-01-15T09:00:00Z", "2026-01-15T10:00:00Z");

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["startDate"], "2026-01-15T09:00:00Z");
        assert_eq!(json["endDate"], "2026-01-15T10:00:00Z");
        assert!(json.get("start_date").is_none());
    }

    #[test]
    fn event_without_description_parses_as_empty() {
        let json = r#"{"id":"1","title":"T","startDate":"2026-01-15T09:00","endDate":"2026-01-15T10:00"}"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.description, "");
    }

    #[test]
    fn list_without_items_is_rejected() {
        let result = serde_json::from_str::<CalendarEventList>(r#"{"total": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn list_without_total_is_rejected() {
        let result = serde_json::from_str::<CalendarEventList>(r#"{"items": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn list_preserves_provider_order() {
        let json = r#"{"total":2,"items":[
            {"id":"b","title":"Later","description":"","startDate":"2026-01-15T15:00","endDate":"2026-01-15T16:00"},
            {"id":"a","title":"Earlier","description":"","startDate":"2026-01-15T08:00","endDate":"2026-01-15T09:00"}
        ]}"#;

        let list: CalendarEventList = serde_json::from_str(json).unwrap();

        let ids: Vec<&str> = list.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn parse_timestamp_converts_offsets() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();

        let parsed = parse_timestamp("2026-01-15T23:30:00Z", &tz).unwrap();

        assert_eq!(parsed.date_naive(), date(2026, 1, 16));
    }

    #[test]
    fn parse_timestamp_reads_naive_values_as_local_wall_clock() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();

        let parsed = parse_timestamp("2026-01-15T23:30", &tz).unwrap();

        assert_eq!(parsed.date_naive(), date(2026, 1, 15));
        assert_eq!(parsed.format("%H:%M").to_string(), "23:30");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("next tuesday", &Utc).is_none());
    }

    #[test]
    fn format_long_date_uses_weekday_month_day_year() {
        assert_eq!(
            format_long_date("2026-01-15T09:00:00Z", &Utc),
            "Thursday, January 15, 2026"
        );
    }

    #[test]
    fn format_long_date_falls_back_to_raw_text() {
        assert_eq!(format_long_date("soon", &Utc), "soon");
    }

    #[test]
    fn starts_on_matches_calendar_date_not_weekday() {
        let today = date(2026, 1, 15);
        let todays = create_test_event("1", "2026-01-15T09:00:00Z", "2026-01-15T10:00:00Z");
        let next_week = create_test_event("2", "2026-01-22T09:00:00Z", "2026-01-22T10:00:00Z");

        assert!(todays.starts_on(today, &Utc));
        assert!(!next_week.starts_on(today, &Utc));
    }

    #[test]
    fn starts_on_is_false_for_unparseable_start() {
        let event = create_test_event("1", "tbd", "tbd");
        assert!(!event.starts_on(date(2026, 1, 15), &Utc));
    }
}
