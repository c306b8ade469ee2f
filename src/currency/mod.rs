//! Money handling: validated positive amounts and locale-aware display.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Largest accepted amount. Keeps any month of totals far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A strictly positive monetary amount in the ledger currency.
///
/// Backed by a fixed-point [`Decimal`] so monthly sums never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if value > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge);
        }
        Ok(Self(value))
    }

    /// Builds an amount from integer minor units (cents).
    pub fn from_minor_units(minor: i64) -> Result<Self, ValidationError> {
        Self::new(Decimal::new(minor, 2))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Parses user input such as `12.50`, `12,50`, `1,234.56` or `1.234,56`.
    ///
    /// When both separators appear, the right-most one is the decimal mark.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidAmount(input.to_string()));
        }
        let normalized = match (trimmed.rfind('.'), trimmed.rfind(',')) {
            (Some(dot), Some(comma)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => trimmed.replace(',', ""),
            (None, Some(_)) => trimmed.replace(',', "."),
            _ => trimmed.to_string(),
        };
        let value = Decimal::from_str_exact(&normalized)
            .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locale-aware currency rendering preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub symbol_spacing: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::for_locale("en-US", "USD")
    }
}

impl CurrencyFormat {
    pub fn for_locale(locale: &str, currency: &str) -> Self {
        let code = currency.trim().to_uppercase();
        let symbol = match code.as_str() {
            "USD" => "$",
            "BRL" => "R$",
            "EUR" => "€",
            "GBP" => "£",
            other => other,
        }
        .to_string();
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let comma_decimal = matches!(language.as_str(), "pt" | "de" | "es" | "it" | "fr" | "nl");
        let (decimal_separator, grouping_separator) =
            if comma_decimal { (',', '.') } else { ('.', ',') };
        let symbol_spacing = comma_decimal || symbol == code;
        Self {
            symbol,
            decimal_separator,
            grouping_separator,
            symbol_spacing,
        }
    }

    /// Renders `value` rounded to two decimal places.
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value.round_dp(2);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let mut magnitude = rounded.abs();
        magnitude.rescale(2);
        let digits = magnitude.to_string();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(ch);
        }

        let spacing = if self.symbol_spacing { " " } else { "" };
        format!(
            "{}{}{}{}{}{}",
            if negative { "-" } else { "" },
            self.symbol,
            spacing,
            grouped,
            self.decimal_separator,
            fraction
        )
    }
}
