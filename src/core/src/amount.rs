//! Conversion between human-unit amounts and on-chain integer amounts.

use crate::errors::CoreError;
use crate::types::Balance;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// The largest scale a route may declare.
pub const MAX_SCALE: u32 = 18;

/// Parses a human-entered amount such as `10.5`.
pub fn parse_amount(input: &str) -> Result<Decimal, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAmount("amount is empty".to_string()));
    }
    Decimal::from_str(trimmed).map_err(|e| CoreError::InvalidAmount(format!("{}: {}", input, e)))
}

/// Scales a human amount to the smallest on-chain unit: `amount * 10^scale`.
///
/// The amount must be strictly positive and must not carry more fractional
/// digits than `scale`.
pub fn scale_amount(amount: Decimal, scale: u32) -> Result<Balance, CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "{} (must be greater than zero)",
            amount
        )));
    }
    if scale > MAX_SCALE {
        return Err(CoreError::InvalidAmount(format!(
            "scale {} exceeds {}",
            scale, MAX_SCALE
        )));
    }

    let factor = Decimal::from(10u64.pow(scale));
    let scaled = amount
        .checked_mul(factor)
        .ok_or_else(|| CoreError::AmountOverflow(amount.to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(CoreError::TooManyDecimals {
            amount: amount.to_string(),
            scale,
        });
    }

    scaled
        .trunc()
        .to_u128()
        .ok_or_else(|| CoreError::AmountOverflow(amount.to_string()))
}

/// Renders an on-chain amount with `decimals` fractional digits.
///
/// `format_units(1_234_567, 6)` is `"1.234567"` and `format_units(5, 6)` is
/// `"0.000005"`.
pub fn format_units(balance: Balance, decimals: u32) -> String {
    let digits = balance.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    if digits.len() <= decimals {
        return format!("0.{}{}", "0".repeat(decimals - digits.len()), digits);
    }

    let split = digits.len() - decimals;
    format!("{}.{}", &digits[..split], &digits[split..])
}
