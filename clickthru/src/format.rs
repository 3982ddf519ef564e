//! Display formatting of clicked values, as used for link text.

use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Month, PrimitiveDateTime};

use crate::datetime::{bucket_bounds, quarter_of, Timestamp};
use crate::{Column, Config, DateTimeUnit, Value};

const DAY: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
const MONTH: &[FormatItem<'static>] = format_description!("[month repr:long], [year]");
const YEAR: &[FormatItem<'static>] = format_description!("[year]");
const HOUR: &[FormatItem<'static>] = format_description!(
    "[month repr:long] [day padding:none], [year], [hour repr:12 padding:none] [period]"
);
const MINUTE: &[FormatItem<'static>] = format_description!(
    "[month repr:long] [day padding:none], [year], [hour repr:12 padding:none]:[minute] [period]"
);

// Fraction digits beyond this carry no information for an f64.
const MAX_DECIMALS: u32 = 20;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// How numbers are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    Scientific,
    Currency,
}

/// How the currency of a currency-styled number is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyStyle {
    /// `$1,234.50`
    #[default]
    Symbol,
    /// `USD 1,234.50`
    Code,
    /// `1,234.50 US dollars`
    Name,
}

/// Format a value for display, according to its column's type, unit and
/// settings.
pub fn format_value(value: &Value, column: &Column, config: &Config) -> String {
    match value {
        Value::Null => String::new(),
        Value::Boolean(b) => b.to_string(),
        _ => match column.unit {
            Some(unit) if unit.is_extraction() => format_extracted(value, unit, config),
            _ if column.is_temporal() => {
                format_timestamp(value, column.unit.unwrap_or(DateTimeUnit::Default), config)
            }
            _ => match value.as_f64() {
                Some(n) if n.is_finite() && !column.is_identifier() => {
                    format_number(n, column, config)
                }
                _ => value.to_string(),
            },
        },
    }
}

fn format_extracted(value: &Value, unit: DateTimeUnit, config: &Config) -> String {
    let n = match value
        .as_signed()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
    {
        Some(n) => n,
        None => return value.to_string(),
    };
    let named = match unit {
        DateTimeUnit::DayOfWeek if (1..=7).contains(&n) => {
            // Day 1 is the configured first day of the week.
            let first = time::Weekday::from(config.start_of_week).number_days_from_sunday() as i64;
            Some(WEEKDAYS[((first + n - 1) % 7) as usize].to_string())
        }
        DateTimeUnit::MonthOfYear => u8::try_from(n)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.to_string()),
        DateTimeUnit::QuarterOfYear if (1..=4).contains(&n) => Some(format!("Q{}", n)),
        _ => Some(n.to_string()),
    };
    named.unwrap_or_else(|| value.to_string())
}

fn format_timestamp(value: &Value, unit: DateTimeUnit, config: &Config) -> String {
    let ts = match Timestamp::from_value(value) {
        Some(ts) => ts,
        None => return value.to_string(),
    };
    let dt = PrimitiveDateTime::from(ts);
    let date = dt.date();
    let formatted = match unit {
        DateTimeUnit::Month => dt.format(MONTH).ok(),
        DateTimeUnit::Year => dt.format(YEAR).ok(),
        DateTimeUnit::Quarter => Some(format!("Q{} - {}", quarter_of(date), date.year())),
        DateTimeUnit::Week => bucket_bounds(date, unit, config.start_of_week).and_then(
            |(start, end)| Some(format!("{} – {}", start.format(DAY).ok()?, end.format(DAY).ok()?)),
        ),
        DateTimeUnit::Hour => dt.format(HOUR).ok(),
        DateTimeUnit::Minute => dt.format(MINUTE).ok(),
        DateTimeUnit::Default if ts.hour() != 0 || ts.minute() != 0 => dt.format(MINUTE).ok(),
        _ => dt.format(DAY).ok(),
    };
    formatted.unwrap_or_else(|| value.to_string())
}

fn format_number(n: f64, column: &Column, config: &Config) -> String {
    let settings = &column.settings;
    let n = n * settings.scale.unwrap_or(1.0);
    let decimals = settings.decimals.map(|d| d.min(MAX_DECIMALS));
    let body = match settings.number_style.unwrap_or_default() {
        NumberStyle::Decimal => format_decimal(n, decimals, config),
        NumberStyle::Percent => format!("{}%", format_decimal(n * 100.0, decimals, config)),
        NumberStyle::Scientific => format_scientific(n, decimals.unwrap_or(2)),
        NumberStyle::Currency => {
            let code = settings.currency.as_deref().unwrap_or(&config.currency);
            let style = settings.currency_style.unwrap_or(config.currency_style);
            format_currency(n, code, style, decimals, config)
        }
    };
    format!(
        "{}{}{}",
        settings.prefix.as_deref().unwrap_or(""),
        body,
        settings.suffix.as_deref().unwrap_or("")
    )
}

// Fixed decimals if given, otherwise at most two fraction digits with
// trailing zeros dropped.
fn format_decimal(n: f64, decimals: Option<u32>, config: &Config) -> String {
    let digits = match decimals {
        Some(d) => format!("{:.*}", d as usize, n.abs()),
        None => {
            let s = format!("{:.2}", n.abs());
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };
    let mut out = String::new();
    if n < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, &config.grouping_separator));
    if let Some(frac) = frac_part {
        out.push_str(&config.decimal_separator);
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn format_scientific(n: f64, decimals: u32) -> String {
    let s = format!("{:.*e}", decimals as usize, n);
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => s,
    }
}

fn format_currency(
    n: f64,
    code: &str,
    style: CurrencyStyle,
    decimals: Option<u32>,
    config: &Config,
) -> String {
    let amount = format_decimal(n.abs(), Some(decimals.unwrap_or(2)), config);
    let sign = if n < 0.0 && amount.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let code = code.to_uppercase();
    match style {
        CurrencyStyle::Symbol => match currency_symbol(&code) {
            Some(symbol) => format!("{}{}{}", sign, symbol, amount),
            None => format!("{}{} {}", sign, code, amount),
        },
        CurrencyStyle::Code => format!("{}{} {}", sign, code, amount),
        CurrencyStyle::Name => format!(
            "{}{} {}",
            sign,
            amount,
            currency_name(&code).unwrap_or(code.as_str())
        ),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    Some(match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "CAD" => "CA$",
        "AUD" => "A$",
        "BRL" => "R$",
        _ => return None,
    })
}

fn currency_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "USD" => "US dollars",
        "EUR" => "euros",
        "GBP" => "British pounds",
        "JPY" => "Japanese yen",
        "CNY" => "Chinese yuan",
        "INR" => "Indian rupees",
        "CAD" => "Canadian dollars",
        "AUD" => "Australian dollars",
        "BRL" => "Brazilian reals",
        _ => return None,
    })
}
