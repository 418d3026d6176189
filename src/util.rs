use rust_decimal::{Decimal, RoundingStrategy};

/// Money as shown to the user: rounded half-up to cents, with thousand
/// separators. `1234567.891` becomes `"$1,234,567.89"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let cents = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if cents < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", cents.abs());
    let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}${grouped}.{frac}")
}

/// Cut `s` down to `max` characters, the last one becoming "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) if max == 0 => String::new(),
        Some(_) => {
            let kept: String = s.chars().take(max - 1).collect();
            format!("{kept}…")
        }
    }
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod tests;
