//! Timestamps, temporal bucketing units, and the date bucket formatter used
//! when a bucketed date becomes a link parameter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    util::days_in_year_month,
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Weekday,
};

use crate::{Error, Value};

const DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const YEAR_MONTH: &[FormatItem<'static>] = format_description!("[year]-[month]");
const DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE_TIME_SUBSECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DATE_TIME_MINUTES: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// The unit by which a temporal column has been bucketed (or from which an
/// ordinal has been extracted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateTimeUnit {
    Default,
    Minute,
    Hour,
    #[serde(alias = "date")]
    Day,
    Week,
    Month,
    Quarter,
    Year,
    MinuteOfHour,
    HourOfDay,
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    WeekOfYear,
    MonthOfYear,
    QuarterOfYear,
    /// Any unit name we don't recognize.
    #[serde(other)]
    Unknown,
}

impl DateTimeUnit {
    /// Extraction units produce ordinals (e.g. day 3 of the week) rather than
    /// timestamps.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Self::MinuteOfHour
                | Self::HourOfDay
                | Self::DayOfWeek
                | Self::DayOfMonth
                | Self::DayOfYear
                | Self::WeekOfYear
                | Self::MonthOfYear
                | Self::QuarterOfYear
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::MinuteOfHour => "minute-of-hour",
            Self::HourOfDay => "hour-of-day",
            Self::DayOfWeek => "day-of-week",
            Self::DayOfMonth => "day-of-month",
            Self::DayOfYear => "day-of-year",
            Self::WeekOfYear => "week-of-year",
            Self::MonthOfYear => "month-of-year",
            Self::QuarterOfYear => "quarter-of-year",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for DateTimeUnit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "default" => Self::Default,
            "minute" => Self::Minute,
            "hour" => Self::Hour,
            "day" | "date" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "quarter" => Self::Quarter,
            "year" => Self::Year,
            "minute-of-hour" => Self::MinuteOfHour,
            "hour-of-day" => Self::HourOfDay,
            "day-of-week" => Self::DayOfWeek,
            "day-of-month" => Self::DayOfMonth,
            "day-of-year" => Self::DayOfYear,
            "week-of-year" => Self::WeekOfYear,
            "month-of-year" => Self::MonthOfYear,
            "quarter-of-year" => Self::QuarterOfYear,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for DateTimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The first day of a week bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOfWeek {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<StartOfWeek> for Weekday {
    fn from(s: StartOfWeek) -> Self {
        match s {
            StartOfWeek::Sunday => Weekday::Sunday,
            StartOfWeek::Monday => Weekday::Monday,
            StartOfWeek::Tuesday => Weekday::Tuesday,
            StartOfWeek::Wednesday => Weekday::Wednesday,
            StartOfWeek::Thursday => Weekday::Thursday,
            StartOfWeek::Friday => Weekday::Friday,
            StartOfWeek::Saturday => Weekday::Saturday,
        }
    }
}

/// A wall-clock date and time parsed from a clicked value.
///
/// Values carrying an offset are kept at the wall-clock time of that offset;
/// we never convert between time zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    /// Attempts to interpret a value as a timestamp. Strings are parsed,
    /// numbers are taken as Unix epoch milliseconds (UTC).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_str(s).ok(),
            Value::Signed(_) | Value::Unsigned(_) | Value::Float(_) => {
                let millis = value.as_f64()?;
                if !millis.is_finite() {
                    return None;
                }
                let nanos = (millis * 1_000_000.0) as i128;
                let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
                Some(Self(PrimitiveDateTime::new(dt.date(), dt.time())))
            }
            _ => None,
        }
    }

    pub fn date(&self) -> Date {
        self.0.date()
    }

    pub fn hour(&self) -> u8 {
        self.0.hour()
    }

    pub fn minute(&self) -> u8 {
        self.0.minute()
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp(s)
            .map(Self)
            .ok_or_else(|| Error::InvalidTimestamp(s.to_string()))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.format(DATE_TIME).map_err(|_| std::fmt::Error)?
        )
    }
}

impl From<Timestamp> for PrimitiveDateTime {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(dt: PrimitiveDateTime) -> Self {
        Self(dt)
    }
}

fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let s = s.trim();
    // Accept "2022-01-01 14:00" as well as "2022-01-01T14:00".
    let normalized = s.replacen(' ', "T", 1);
    if let Ok(dt) = OffsetDateTime::parse(&normalized, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    for fmt in [DATE_TIME_SUBSECONDS, DATE_TIME, DATE_TIME_MINUTES] {
        if let Ok(dt) = PrimitiveDateTime::parse(&normalized, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = Date::parse(s, DATE) {
        return Some(d.midnight());
    }
    if let Ok(d) = Date::parse(&format!("{}-01", s), DATE) {
        return Some(d.midnight());
    }
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        let year = s.parse::<i32>().ok()?;
        return Date::from_calendar_date(year, Month::January, 1)
            .ok()
            .map(Date::midnight);
    }
    None
}

/// The quarter (1-4) in which the given date falls.
pub fn quarter_of(date: Date) -> u8 {
    (u8::from(date.month()) - 1) / 3 + 1
}

/// Computes the first and last day of the bucket of the given unit that
/// contains `date`. Returns `None` for units that have no calendar bucket, or
/// if a boundary falls outside the representable range.
pub fn bucket_bounds(
    date: Date,
    unit: DateTimeUnit,
    start_of_week: StartOfWeek,
) -> Option<(Date, Date)> {
    match unit {
        DateTimeUnit::Default | DateTimeUnit::Minute | DateTimeUnit::Hour | DateTimeUnit::Day => {
            Some((date, date))
        }
        DateTimeUnit::Week => {
            let first = Weekday::from(start_of_week).number_days_from_sunday();
            let offset = (7 + date.weekday().number_days_from_sunday() - first) % 7;
            let start = date.checked_sub(Duration::days(offset as i64))?;
            let end = start.checked_add(Duration::days(6))?;
            Some((start, end))
        }
        DateTimeUnit::Month => month_bounds(date.year(), date.month(), date.month()),
        DateTimeUnit::Quarter => {
            let first = (quarter_of(date) - 1) * 3 + 1;
            month_bounds(
                date.year(),
                Month::try_from(first).ok()?,
                Month::try_from(first + 2).ok()?,
            )
        }
        DateTimeUnit::Year => month_bounds(date.year(), Month::January, Month::December),
        _ => None,
    }
}

fn month_bounds(year: i32, first: Month, last: Month) -> Option<(Date, Date)> {
    let start = Date::from_calendar_date(year, first, 1).ok()?;
    let end = Date::from_calendar_date(year, last, days_in_year_month(year, last)).ok()?;
    Some((start, end))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: Date) -> Option<String> {
    date.format(DATE).ok()
}

/// Produces the canonical parameter form of a bucketed timestamp, using
/// Sunday as the first day of the week.
///
/// See [`format_date_time_for_parameter_with`].
pub fn format_date_time_for_parameter(value: &Value, unit: DateTimeUnit) -> String {
    format_date_time_for_parameter_with(value, unit, StartOfWeek::default())
}

/// Produces the canonical parameter form of a bucketed timestamp, so that a
/// click on a bucketed axis becomes a parameter describing the whole bucket:
///
/// - `month` gives `YYYY-MM`
/// - `quarter` gives `Q{n}-YYYY`
/// - `day` (and `default`) gives `YYYY-MM-DD`
/// - `minute`, `hour`, `week` and `year` give `{start}~{end}` as
///   `YYYY-MM-DD` dates
///
/// Values that cannot be parsed, and units without a calendar bucket, are
/// passed through in their raw string form.
pub fn format_date_time_for_parameter_with(
    value: &Value,
    unit: DateTimeUnit,
    start_of_week: StartOfWeek,
) -> String {
    let raw = || value.to_string();
    if unit.is_extraction() || unit == DateTimeUnit::Unknown {
        return raw();
    }
    let date = match Timestamp::from_value(value) {
        Some(ts) => ts.date(),
        None => return raw(),
    };
    match unit {
        DateTimeUnit::Month => date.format(YEAR_MONTH).unwrap_or_else(|_| raw()),
        DateTimeUnit::Quarter => format!("Q{}-{:04}", quarter_of(date), date.year()),
        DateTimeUnit::Day | DateTimeUnit::Default => format_iso_date(date).unwrap_or_else(raw),
        _ => match bucket_bounds(date, unit, start_of_week)
            .and_then(|(start, end)| Some((format_iso_date(start)?, format_iso_date(end)?)))
        {
            Some((start, end)) => format!("{}~{}", start, end),
            None => raw(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lazy_static::lazy_static;
    use time::macros::{date, datetime};

    lazy_static! {
        static ref PARAMETERS: Vec<(Value, DateTimeUnit, &'static str)> = vec![
            ("2024-03-15T10:30:00".into(), DateTimeUnit::Month, "2024-03"),
            ("2024-03-15".into(), DateTimeUnit::Quarter, "Q1-2024"),
            ("2024-11-02T00:00:00Z".into(), DateTimeUnit::Quarter, "Q4-2024"),
            ("2024-03-15T10:30:00+02:00".into(), DateTimeUnit::Day, "2024-03-15"),
            ("2024-03-15".into(), DateTimeUnit::Default, "2024-03-15"),
            // Friday, so the Sunday-based week starts on the 10th.
            ("2024-03-15".into(), DateTimeUnit::Week, "2024-03-10~2024-03-16"),
            ("2024-02-10".into(), DateTimeUnit::Year, "2024-01-01~2024-12-31"),
            ("2024-03-15 23:59".into(), DateTimeUnit::Hour, "2024-03-15~2024-03-15"),
            ("2024-03-15T10:30:00".into(), DateTimeUnit::Minute, "2024-03-15~2024-03-15"),
            ("not a date".into(), DateTimeUnit::Month, "not a date"),
            (3_i64.into(), DateTimeUnit::DayOfWeek, "3"),
            ("2024-03-15".into(), DateTimeUnit::Unknown, "2024-03-15"),
            (Value::Null, DateTimeUnit::Month, ""),
        ];
    }

    #[test]
    fn date_time_for_parameter() {
        for (value, unit, expected) in PARAMETERS.iter() {
            assert_eq!(
                format_date_time_for_parameter(value, *unit),
                *expected,
                "formatting {:?} with unit {}",
                value,
                unit
            );
        }
    }

    #[test]
    fn week_respects_start_of_week() {
        let value = Value::from("2024-03-15");
        assert_eq!(
            format_date_time_for_parameter_with(&value, DateTimeUnit::Week, StartOfWeek::Monday),
            "2024-03-11~2024-03-17"
        );
        // A date that is itself the first day of the week.
        let value = Value::from("2024-03-11");
        assert_eq!(
            format_date_time_for_parameter_with(&value, DateTimeUnit::Week, StartOfWeek::Monday),
            "2024-03-11~2024-03-17"
        );
    }

    #[test]
    fn timestamp_parsing() {
        assert_eq!(
            PrimitiveDateTime::from(Timestamp::from_str("2022-01-01T14:00").unwrap()),
            datetime!(2022-01-01 14:00)
        );
        assert_eq!(
            PrimitiveDateTime::from(Timestamp::from_str("2022-01-01T14:00:05.250").unwrap()),
            datetime!(2022-01-01 14:00:05.25)
        );
        assert_eq!(
            Timestamp::from_str("2022-06").unwrap().date(),
            date!(2022-06-01)
        );
        assert_eq!(Timestamp::from_str("2022").unwrap().date(), date!(2022-01-01));
        assert!(Timestamp::from_str("2022-13-01").is_err());
        assert!(Timestamp::from_str("14:00").is_err());
    }

    #[test]
    fn epoch_milliseconds() {
        let ts = Timestamp::from_value(&Value::from(1_710_460_800_000_u64)).unwrap();
        assert_eq!(ts.date(), date!(2024-03-15));
        assert_eq!(
            format_date_time_for_parameter(&Value::from(1_710_460_800_000_u64), DateTimeUnit::Month),
            "2024-03"
        );
    }

    #[test]
    fn quarter_bounds() {
        assert_eq!(
            bucket_bounds(date!(2023-08-20), DateTimeUnit::Quarter, StartOfWeek::Sunday),
            Some((date!(2023-07-01), date!(2023-09-30)))
        );
        assert_eq!(
            bucket_bounds(date!(2024-02-20), DateTimeUnit::Month, StartOfWeek::Sunday),
            Some((date!(2024-02-01), date!(2024-02-29)))
        );
        assert_eq!(
            bucket_bounds(date!(2024-02-20), DateTimeUnit::DayOfWeek, StartOfWeek::Sunday),
            None
        );
    }

    #[test]
    fn unit_names() {
        assert_eq!(DateTimeUnit::from_str("date").unwrap(), DateTimeUnit::Day);
        assert_eq!(
            serde_json::from_str::<DateTimeUnit>(r#""day-of-week""#).unwrap(),
            DateTimeUnit::DayOfWeek
        );
        assert_eq!(
            serde_json::from_str::<DateTimeUnit>(r#""fortnight""#).unwrap(),
            DateTimeUnit::Unknown
        );
    }
}
