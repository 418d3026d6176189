use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Words that mean "the current date". `hoje` is Portuguese for today.
const TODAY_TOKENS: &[&str] = &["today", "hoje"];

static DAY_MONTH_YEAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").ok());
static DAY_MONTH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})$").ok());
static ISO: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").ok());

/// Turn user-typed date text into a calendar date.
///
/// Accepted forms, first match wins:
/// `today`, `DD/MM/YYYY`, `DD/MM` (year of `today`), `YYYY-MM-DD`.
/// Returns `None` for anything else, including impossible dates like `31/02`.
pub(crate) fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();

    if TODAY_TOKENS.contains(&text.as_str()) {
        return Some(today);
    }
    if let Some([d, m, y]) = captures::<3>(&DAY_MONTH_YEAR, &text) {
        return ymd(y, m, d);
    }
    if let Some([d, m]) = captures::<2>(&DAY_MONTH, &text) {
        return ymd(i64::from(today.year()), m, d);
    }
    if let Some([y, m, d]) = captures::<3>(&ISO, &text) {
        return ymd(y, m, d);
    }
    None
}

/// Format a date the way the parser's primary form reads it back.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn captures<const N: usize>(re: &LazyLock<Option<Regex>>, text: &str) -> Option<[i64; N]> {
    let caps = re.as_ref()?.captures(text)?;
    let mut out = [0i64; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = caps.get(i + 1)?.as_str().parse().ok()?;
    }
    Some(out)
}

fn ymd(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

#[cfg(test)]
#[path = "date_tests.rs"]
mod tests;
