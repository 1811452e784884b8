use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DataError, DataResult};

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

// `H:MM` or `HH:MM`, optionally followed by an AM/PM marker.
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-5][0-9])(?:\s*([AaPp][Mm]))?$").expect("valid time regex")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// A date followed by a time of day without an offset, split on `T` or whitespace.
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(.+?)(?:T|,?\s+)([0-9]{1,2}):([0-9]{2})(?::([0-9]{2})(?:\.[0-9]+)?)?(?:\s*([AaPp][Mm]))?$",
    )
    .expect("valid date time regex")
});

static ZONE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)$").expect("valid zone name regex"));

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})$").expect("valid year month regex"));

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%a %b %d %Y %H:%M:%S GMT%z",
];

const DATE_FORMATS: [&str; 16] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%A %m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%a %b %d %Y",
    "%a, %d %b %Y",
    "%d-%b-%Y",
];

pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    NON_SLUG_RE
        .replace_all(lowered.trim(), "-")
        .trim_matches('-')
        .to_string()
}

pub fn normalize_date(value: &str) -> DataResult<String> {
    let cleaned = clean_text(value);
    parse_calendar_date(&cleaned)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| DataError::InvalidDate(value.trim().to_string()))
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    let zoned = ZONE_NAME_RE.replace(input, "");
    for fmt in ZONED_FORMATS.iter() {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    let date_part = strip_time_of_day(input).unwrap_or(input);
    for fmt in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(date);
        }
    }
    let caps = YEAR_MONTH_RE.captures(input)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 1)
}

fn strip_time_of_day(input: &str) -> Option<&str> {
    let caps = DATE_TIME_RE.captures(input)?;
    let hour: u32 = caps[2].parse().ok()?;
    let minute: u32 = caps[3].parse().ok()?;
    let second: u32 = match caps.get(4) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    let hour_ok = match caps.get(5) {
        Some(_) => (1..=12).contains(&hour),
        None => hour < 24,
    };
    if !hour_ok || minute > 59 || second > 59 {
        return None;
    }
    caps.get(1).map(|m| m.as_str())
}

pub fn normalize_time(value: &str) -> DataResult<String> {
    let trimmed = value.trim();
    let invalid = || DataError::InvalidTime(trimmed.to_string());

    let caps = TIME_RE.captures(trimmed).ok_or_else(invalid)?;
    let mut hours: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minutes = &caps[2];

    match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hours) {
                return Err(invalid());
            }
            if hours == 12 {
                hours = if meridiem == "am" { 0 } else { 12 };
            } else if meridiem == "pm" {
                hours += 12;
            }
        }
        None if hours > 23 => return Err(invalid()),
        None => {}
    }

    Ok(format!("{hours:02}:{minutes}"))
}

pub fn normalize_email(value: &str) -> DataResult<String> {
    let normalized = value.trim().to_lowercase();
    if EMAIL_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(DataError::InvalidEmail(value.trim().to_string()))
    }
}

pub(crate) fn required_string(field: &'static str, value: Option<&str>) -> DataResult<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(DataError::RequiredField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn required_list(field: &'static str, value: Option<&[String]>) -> DataResult<Vec<String>> {
    let items = value.unwrap_or_default();
    if items.is_empty() {
        return Err(DataError::RequiredField(field));
    }
    items
        .iter()
        .map(|item| required_string(field, Some(item.as_str())))
        .collect()
}
