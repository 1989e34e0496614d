//! Mapping calendar dates onto chart buckets.

use chrono::{Datelike, NaiveDate};
use core_types::{parse_date, Granularity, Locale, DATE_FORMAT};

/// Key returned for dates that cannot be parsed.
pub const INVALID_PERIOD_KEY: &str = "Invalid";

/// Key of the synthetic first curve point.
pub const START_PERIOD_KEY: &str = "Start";

/// Derives the bucket key for a persisted date string.
///
/// Unparseable input yields [`INVALID_PERIOD_KEY`] instead of an error.
pub fn period_key(date: &str, granularity: Granularity) -> String {
    match parse_date(date) {
        Some(date) => period_key_for(date, granularity),
        None => INVALID_PERIOD_KEY.to_string(),
    }
}

/// Derives the bucket key for an already parsed date.
pub fn period_key_for(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format(DATE_FORMAT).to_string(),
        Granularity::Weekly => format!("{}-W{:02}", date.year(), week_of_year(date)),
        Granularity::Monthly => format!("{}-{:02}", date.year(), date.month()),
        Granularity::Quarterly => format!("{}-Q{}", date.year(), quarter(date)),
        Granularity::Yearly => date.year().to_string(),
    }
}

/// Week number as `ceil((day_of_year0 + jan1_weekday + 1) / 7)`, weeks starting on Sunday.
///
/// This is not ISO-8601 numbering: week 1 always contains January 1, and the
/// year is the calendar year of `date`.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan1_weekday = date
        .with_ordinal(1)
        .map(|jan1| jan1.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal0() + jan1_weekday + 1).div_ceil(7)
}

fn quarter(date: NaiveDate) -> u32 {
    date.month().div_ceil(3)
}

/// Human-readable label for the bucket that ends on `date`.
pub fn period_label(date: NaiveDate, granularity: Granularity, locale: Locale) -> String {
    let (year, month, day) = (date.year(), date.month(), date.day());
    match (granularity, locale) {
        (Granularity::Daily, Locale::En) => date.format("%b %-d").to_string(),
        (Granularity::Daily, Locale::Zh) => format!("{month}月{day}日"),
        (Granularity::Weekly, Locale::En) => format!("{year} W{:02}", week_of_year(date)),
        (Granularity::Weekly, Locale::Zh) => format!("{year}年第{}周", week_of_year(date)),
        (Granularity::Monthly, Locale::En) => date.format("%b %Y").to_string(),
        (Granularity::Monthly, Locale::Zh) => format!("{year}年{month}月"),
        (Granularity::Quarterly, Locale::En) => format!("Q{} {year}", quarter(date)),
        (Granularity::Quarterly, Locale::Zh) => format!("{year}年Q{}", quarter(date)),
        (Granularity::Yearly, Locale::En) => year.to_string(),
        (Granularity::Yearly, Locale::Zh) => format!("{year}年"),
    }
}

/// Label of the synthetic Start point.
pub fn start_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Start",
        Locale::Zh => "起点",
    }
}
