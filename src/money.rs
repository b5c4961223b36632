use crate::error::PaymentError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const MAX_EXPONENT: u32 = 18;

/// Exact conversion between caller-facing decimal amounts and the integer
/// units a gateway API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyConverter {
    exponent: u32,
    max_minor_units: i64,
}

impl MoneyConverter {
    /// `exponent` is the number of minor-unit digits (0 for VND, 2 for USD).
    pub fn new(exponent: u32, max_minor_units: i64) -> Self {
        Self {
            exponent: exponent.min(MAX_EXPONENT),
            max_minor_units: max_minor_units.max(0),
        }
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    pub fn to_minor_units(&self, amount: Decimal) -> Result<i64, PaymentError> {
        if amount < Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(format!("{amount} is negative")));
        }

        let factor = Decimal::from(10_i64.pow(self.exponent));
        let scaled = amount
            .checked_mul(factor)
            .ok_or_else(|| PaymentError::InvalidAmount(format!("{amount} overflows")))?;

        if !scaled.fract().is_zero() {
            return Err(PaymentError::InvalidAmount(format!(
                "{amount} has more than {} fractional digits",
                self.exponent
            )));
        }

        match scaled.to_i64() {
            Some(minor) if minor <= self.max_minor_units => Ok(minor),
            _ => Err(PaymentError::InvalidAmount(format!(
                "{amount} exceeds the gateway limit of {} minor units",
                self.max_minor_units
            ))),
        }
    }

    pub fn to_decimal(&self, minor_units: i64) -> Result<Decimal, PaymentError> {
        if minor_units < 0 || minor_units > self.max_minor_units {
            return Err(PaymentError::InvalidAmount(format!(
                "{minor_units} minor units is outside 0..={}",
                self.max_minor_units
            )));
        }
        Ok(Decimal::new(minor_units, self.exponent).normalize())
    }
}
