//! Field-level constraint checks shared by the tool handlers
//!
//! Structural shape (types, required vs. optional) is enforced by the tool
//! argument structs; everything finer-grained lands here and is rejected
//! before any upstream call is issued.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

pub const ACCOUNT_TYPES: [&str; 5] = [
    "BANK_ACCOUNT",
    "WALLET",
    "SAVINGS_ACCOUNT",
    "INVESTMENT_ACCOUNT",
    "OTHER",
];
pub const TRANSACTION_TYPES: [&str; 2] = ["INCOME", "EXPENSE"];
pub const PAYMENT_METHODS: [&str; 4] = ["CASH", "PIX", "DEBIT", "CREDIT"];
pub const CURRENCIES: [&str; 8] = ["BRL", "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF"];
pub const LANGUAGES: [&str; 2] = ["pt-BR", "en-US"];
pub const EDIT_MODES: [&str; 3] = ["SINGLE", "PENDING", "ALL"];
pub const IMPORT_MODES: [&str; 2] = ["reset", "increment"];
pub const RECURRENCE_FREQUENCIES: [&str; 3] = ["MONTHLY", "WEEKLY", "YEARLY"];

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid month pattern"))
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color pattern"))
}

pub fn date(value: &str, field: &str) -> Result<(), AppError> {
    if !date_pattern().is_match(value) {
        return Err(AppError::validation(
            "invalid_date",
            format!("{field} must be in YYYY-MM-DD format"),
        ));
    }
    Ok(())
}

pub fn month(value: &str, field: &str) -> Result<(), AppError> {
    if !month_pattern().is_match(value) {
        return Err(AppError::validation(
            "invalid_month",
            format!("{field} must be in YYYY-MM format"),
        ));
    }
    Ok(())
}

pub fn hex_color(value: &str, field: &str) -> Result<(), AppError> {
    if !color_pattern().is_match(value) {
        return Err(AppError::validation(
            "invalid_color",
            format!("{field} must be a hex color like #1A2B3C"),
        ));
    }
    Ok(())
}

pub fn one_of(
    value: &str,
    allowed: &[&str],
    code: &'static str,
    field: &str,
) -> Result<(), AppError> {
    if !allowed.contains(&value) {
        return Err(AppError::validation(
            code,
            format!("{field} must be one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

pub fn day_of_month(value: u32, field: &str) -> Result<(), AppError> {
    if !(1..=31).contains(&value) {
        return Err(AppError::validation(
            "invalid_day",
            format!("{field} must be between 1 and 31"),
        ));
    }
    Ok(())
}

pub fn positive_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::validation(
            "invalid_amount",
            format!("{field} must be greater than 0"),
        ));
    }
    Ok(())
}

pub fn non_negative_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(
            "invalid_amount",
            format!("{field} must be greater than or equal to 0"),
        ));
    }
    Ok(())
}

pub fn at_least_one(value: u32, field: &str) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::validation(
            "invalid_count",
            format!("{field} must be at least 1"),
        ));
    }
    Ok(())
}

pub fn opt_date(value: Option<&str>, field: &str) -> Result<(), AppError> {
    value.map(|value| date(value, field)).transpose()?;
    Ok(())
}

pub fn opt_month(value: Option<&str>, field: &str) -> Result<(), AppError> {
    value.map(|value| month(value, field)).transpose()?;
    Ok(())
}

pub fn opt_hex_color(value: Option<&str>, field: &str) -> Result<(), AppError> {
    value.map(|value| hex_color(value, field)).transpose()?;
    Ok(())
}

pub fn opt_one_of(
    value: Option<&str>,
    allowed: &[&str],
    code: &'static str,
    field: &str,
) -> Result<(), AppError> {
    value
        .map(|value| one_of(value, allowed, code, field))
        .transpose()?;
    Ok(())
}

pub fn opt_day_of_month(value: Option<u32>, field: &str) -> Result<(), AppError> {
    value.map(|value| day_of_month(value, field)).transpose()?;
    Ok(())
}

pub fn opt_positive_amount(value: Option<f64>, field: &str) -> Result<(), AppError> {
    value
        .map(|value| positive_amount(value, field))
        .transpose()?;
    Ok(())
}

pub fn opt_non_negative_amount(value: Option<f64>, field: &str) -> Result<(), AppError> {
    value
        .map(|value| non_negative_amount(value, field))
        .transpose()?;
    Ok(())
}

pub fn opt_at_least_one(value: Option<u32>, field: &str) -> Result<(), AppError> {
    value.map(|value| at_least_one(value, field)).transpose()?;
    Ok(())
}
