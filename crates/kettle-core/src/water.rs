//! Water amount parsing and range validation.
//!
//! Validation is the drivers' responsibility: the console re-prompts and
//! the web form redisplays until [`parse_water_amount`] accepts the input.
//! [`Kettle::create`](crate::kettle::Kettle::create) checks the range once
//! more so no kettle can exist with an impossible amount.

use crate::config::PhysicsConfig;

/// Rejected water amount input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaterAmountError {
    /// The input is not a finite real number.
    #[error("water amount is not a number: {input:?}")]
    NotANumber {
        /// The raw input as received.
        input: String,
    },

    /// The amount lies outside the accepted range.
    #[error("water amount {amount} is outside [{min}, {max}]")]
    OutOfRange {
        /// The rejected amount in litres.
        amount: f64,
        /// Smallest accepted amount.
        min: f64,
        /// Largest accepted amount.
        max: f64,
    },
}

/// Parse user input into a water amount within the configured range.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`WaterAmountError::NotANumber`] for unparsable or non-finite
/// input and [`WaterAmountError::OutOfRange`] when the value falls outside
/// `[min_water_amount, max_water_amount]`.
pub fn parse_water_amount(input: &str, physics: &PhysicsConfig) -> Result<f64, WaterAmountError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_err: std::num::ParseFloatError| WaterAmountError::NotANumber {
            input: input.to_owned(),
        })?;
    check_water_amount(amount, physics)
}

/// Check an already-parsed amount against the configured range.
///
/// # Errors
///
/// Returns [`WaterAmountError::NotANumber`] for NaN or infinities and
/// [`WaterAmountError::OutOfRange`] when the value falls outside the range.
pub fn check_water_amount(amount: f64, physics: &PhysicsConfig) -> Result<f64, WaterAmountError> {
    if !amount.is_finite() {
        return Err(WaterAmountError::NotANumber {
            input: amount.to_string(),
        });
    }
    if amount < physics.min_water_amount || amount > physics.max_water_amount {
        return Err(WaterAmountError::OutOfRange {
            amount,
            min: physics.min_water_amount,
            max: physics.max_water_amount,
        });
    }
    Ok(amount)
}
