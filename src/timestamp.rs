//! Conversion between [`DateTime<Utc>`] and the Data API's naive timestamp strings.
//!
//! The remote side emits `YYYY-MM-DD HH:MM:SS[.FFF]` without a zone. Unless the caller
//! opts into local-time semantics those strings are UTC instants.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};

const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ZONED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

/// Renders `value` as `YYYY-MM-DD HH:MM:SS[.FFF]`.
///
/// Calendar fields are taken in UTC, or in the local zone when `treat_as_local` is set.
/// The fractional suffix is left out when the milliseconds are zero.
pub fn format_timestamp(value: &DateTime<Utc>, treat_as_local: bool) -> String {
    if treat_as_local {
        render(&value.with_timezone(&Local).naive_local())
    } else {
        render(&value.naive_utc())
    }
}

fn render(value: &NaiveDateTime) -> String {
    let base = format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        value.year(),
        value.month(),
        value.day(),
        value.hour(),
        value.minute(),
        value.second()
    );
    let millis = (value.nanosecond() % 1_000_000_000) / 1_000_000;
    if millis == 0 {
        base
    } else {
        format!("{base}.{millis:03}")
    }
}

/// Parses a timestamp string returned by the remote side.
///
/// Without `treat_as_local`, a string in the exact wire shape (no zone suffix) is read as
/// UTC. Anything else is parsed as given: an embedded offset is honored and a naive
/// string falls back to the local zone. Returns `None` when nothing matches.
pub fn parse_timestamp(value: &str, treat_as_local: bool) -> Option<DateTime<Utc>> {
    if !treat_as_local {
        if let Some(naive) = parse_wire(value) {
            return Some(naive.and_utc());
        }
    }

    parse_zoned(value).or_else(|| {
        parse_wire(value)
            .or_else(|| NaiveDateTime::parse_from_str(value, ISO_NAIVE_FORMAT).ok())
            .and_then(local_to_utc)
    })
}

/// Resolves a local wall-clock time. A time skipped by a forward DST jump is moved
/// forward across the gap.
fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
}

fn parse_wire(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, WIRE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, WIRE_DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_zoned(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, ZONED_FORMAT))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
