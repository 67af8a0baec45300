// File: freedrink-core/src/utils/time.rs

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use freedrink_common::models::StatsRange;

/// Local calendar day an instant falls on. Claims use this for the
/// one-per-phone-per-day rule, so "today" rolls over at local midnight
/// rather than on a 24h sliding window.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Local midnight of the day `now` falls on, as a UTC instant.
pub fn start_of_local_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now.with_timezone(&Local).date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump; the raw instant is close enough.
        None => now,
    }
}

/// Start boundary for a dashboard window ending at `now`.
pub fn window_start(range: StatsRange, now: DateTime<Utc>) -> DateTime<Utc> {
    match range {
        StatsRange::Today => start_of_local_day(now),
        StatsRange::Week => now - Duration::days(7),
        StatsRange::Month => now - Duration::days(30),
    }
}

/// Local hour-of-day an event is bucketed under. Same-hour events from
/// different days share a bucket, which caps the series at 24 entries.
pub fn bucket_hour(ts: DateTime<Utc>) -> u32 {
    ts.with_timezone(&Local).hour()
}

/// Bucket label as the dashboard renders it.
pub fn bucket_label(hour: u32) -> String {
    format!("{}:00", hour)
}

/// Local wall-clock rendering for the recent-activity table.
pub fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
