//! Brazilian real amounts as the dashboard writes them (`R$ 1.234,56`).

use serde::{de, Deserialize, Deserializer};

/// Parses a BRL-formatted amount. Accepts an optional `R$` prefix, `.` as the
/// thousands separator and `,` as the decimal separator.
pub fn parse_brl(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return None;
    }
    let normalized = digits.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats an amount with two decimals, `.` thousands and `,` decimals.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02}")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Serde helper for amount fields that may arrive as a number or a BRL string.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(value) => Ok(value),
        RawAmount::Text(text) => parse_brl(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid amount: {text}"))),
    }
}
