//! Date normalization for WXR timestamps.
//!
//! Exports mix several timestamp styles: `wp:post_date_gmt` is written as
//! `2025-06-01 14:00:51`, `<pubDate>` uses RFC 1123 with a numeric zone, and
//! hand-edited files contain almost anything. [`normalize_date`] maps every
//! format it recognizes onto RFC 3339 (`2025-06-01T14:00:51Z`) and passes
//! everything else through untouched.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const SQL_DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]");
const ISO_DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
const ISO_DATE_TIME_Z: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]Z");
const RFC822_HEAD: &[BorrowedFormatItem<'static>] =
    format_description!("[day] [month repr:short] [year] [hour]:[minute]");
const RFC1123_HEAD: &[BorrowedFormatItem<'static>] =
    format_description!("[day] [month repr:short] [year] [hour]:[minute]:[second][optional [.[subsecond]]]");
const NUMERIC_ZONE: &[BorrowedFormatItem<'static>] = format_description!("[offset_hour sign:mandatory][offset_minute]");

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Timestamp layouts recognized by [`normalize_date`], in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `2006-01-02T15:04:05Z07:00`
    Rfc3339,
    /// `2006-01-02 15:04:05`, read as UTC
    SqlDateTime,
    /// `2006-01-02T15:04:05`, read as UTC
    IsoDateTime,
    /// `02 Jan 06 15:04 MST`
    Rfc822,
    /// `02 Jan 06 15:04 -0700`
    Rfc822Z,
    /// `Mon, 02 Jan 2006 15:04:05 -0700`
    Rfc1123Z,
    /// `Mon, 02 Jan 2006 15:04:05 MST`
    Rfc1123,
}

impl DateLayout {
    pub const ALL: [DateLayout; 7] = [
        DateLayout::Rfc3339,
        DateLayout::SqlDateTime,
        DateLayout::IsoDateTime,
        DateLayout::Rfc822,
        DateLayout::Rfc822Z,
        DateLayout::Rfc1123Z,
        DateLayout::Rfc1123,
    ];

    /// Parse `input` strictly against this layout.
    pub fn parse(self, input: &str) -> Option<OffsetDateTime> {
        match self {
            DateLayout::Rfc3339 => OffsetDateTime::parse(input, &well_known::Rfc3339).ok(),
            DateLayout::SqlDateTime => PrimitiveDateTime::parse(input, SQL_DATE_TIME).ok().map(|dt| dt.assume_utc()),
            DateLayout::IsoDateTime => PrimitiveDateTime::parse(input, ISO_DATE_TIME).ok().map(|dt| dt.assume_utc()),
            DateLayout::Rfc822 => {
                let (head, zone) = input.rsplit_once(' ')?;
                Some(parse_rfc822_head(head)?.assume_offset(named_zone_offset(zone)?))
            }
            DateLayout::Rfc822Z => {
                let (head, zone) = input.rsplit_once(' ')?;
                Some(parse_rfc822_head(head)?.assume_offset(numeric_zone_offset(zone)?))
            }
            DateLayout::Rfc1123Z => {
                let (head, zone) = strip_weekday(input)?.rsplit_once(' ')?;
                let local = PrimitiveDateTime::parse(head, RFC1123_HEAD).ok()?;
                Some(local.assume_offset(numeric_zone_offset(zone)?))
            }
            DateLayout::Rfc1123 => {
                let (head, zone) = strip_weekday(input)?.rsplit_once(' ')?;
                let local = PrimitiveDateTime::parse(head, RFC1123_HEAD).ok()?;
                Some(local.assume_offset(named_zone_offset(zone)?))
            }
        }
    }
}

/// Normalize a WXR date string to RFC 3339.
///
/// The first [`DateLayout`] that parses wins. If none does, the first two
/// whitespace-separated tokens are joined as `{date}T{time}Z` and read as UTC.
/// Input that still cannot be parsed is returned unchanged, so one bad date
/// never fails a whole export.
///
/// # Example
///
/// ```rust
/// use wxr_core::date::normalize_date;
///
/// assert_eq!(normalize_date("2025-06-01 14:00:51"), "2025-06-01T14:00:51Z");
/// assert_eq!(normalize_date("Sun, 01 Jun 2025 14:00:51 +0000"), "2025-06-01T14:00:51Z");
/// assert_eq!(normalize_date("sometime in June"), "sometime in June");
/// ```
pub fn normalize_date(input: &str) -> String {
    DateLayout::ALL
        .iter()
        .find_map(|layout| layout.parse(input))
        .or_else(|| parse_leading_tokens(input))
        .and_then(format_rfc3339)
        .unwrap_or_else(|| input.to_string())
}

/// Last resort for strings like `2025-06-01 14:00:51 extra`
fn parse_leading_tokens(input: &str) -> Option<OffsetDateTime> {
    let mut parts = input.split_whitespace();
    let (date, time) = (parts.next()?, parts.next()?);
    let combined = format!("{}T{}Z", date, time);
    PrimitiveDateTime::parse(&combined, ISO_DATE_TIME_Z).ok().map(|dt| dt.assume_utc())
}

/// RFC 3339 with whole seconds; `Z` for a zero offset
fn format_rfc3339(dt: OffsetDateTime) -> Option<String> {
    dt.replace_nanosecond(0).ok()?.format(&well_known::Rfc3339).ok()
}

/// Parse `02 Jan 06 15:04`. Two-digit years 69-99 are 19xx, 00-68 are 20xx.
fn parse_rfc822_head(head: &str) -> Option<PrimitiveDateTime> {
    let mut fields = head.split(' ');
    let (day, month, year, clock) = (fields.next()?, fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() || year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let short: u16 = year.parse().ok()?;
    let full = if short >= 69 { 1900 + short } else { 2000 + short };
    let expanded = format!("{} {} {} {}", day, month, full, clock);
    PrimitiveDateTime::parse(&expanded, RFC822_HEAD).ok()
}

/// Drop a leading `Mon, ` day name
fn strip_weekday(input: &str) -> Option<&str> {
    let (weekday, rest) = input.split_once(", ")?;
    WEEKDAYS.contains(&weekday).then_some(rest)
}

fn numeric_zone_offset(zone: &str) -> Option<UtcOffset> {
    UtcOffset::parse(zone, NUMERIC_ZONE).ok()
}

/// Offsets for zone abbreviations. RFC 822 names its North American zones;
/// any other all-caps abbreviation is taken as UTC.
fn named_zone_offset(zone: &str) -> Option<UtcOffset> {
    let hours = match zone {
        "UT" | "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ if zone.len() >= 3 && zone.bytes().all(|b| b.is_ascii_uppercase()) => 0,
        _ => return None,
    };
    UtcOffset::from_hms(hours, 0, 0).ok()
}
