//! Currency rounding and checked amount arithmetic.
//!
//! Every statutory line item is floored to whole currency units on its own;
//! no correction is carried between line items. Amount arithmetic reports
//! overflow as `InvalidAmount` instead of panicking.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Multiplies `amount` by `rate` and floors the product to whole currency
/// units.
///
/// `field` names the amount in the error returned when the product overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::floor_product;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = floor_product("health_insurance", Decimal::from(2_500_000),
///     Decimal::from_str("0.03545").unwrap()).unwrap();
/// assert_eq!(amount, Decimal::from(88_625));
/// ```
pub fn floor_product(field: &str, amount: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    amount
        .checked_mul(rate)
        .map(|product| product.floor())
        .ok_or_else(|| EngineError::InvalidAmount {
            field: field.to_string(),
            amount,
            message: format!("product with rate {} overflows", rate),
        })
}

fn overflow(field: &str, amount: Decimal, message: String) -> EngineError {
    EngineError::InvalidAmount {
        field: field.to_string(),
        amount,
        message,
    }
}

/// Adds two amounts.
pub fn add_amounts(field: &str, amount: Decimal, other: Decimal) -> EngineResult<Decimal> {
    amount
        .checked_add(other)
        .ok_or_else(|| overflow(field, amount, format!("sum with {} overflows", other)))
}

/// Subtracts `other` from `amount`.
pub fn subtract_amounts(field: &str, amount: Decimal, other: Decimal) -> EngineResult<Decimal> {
    amount
        .checked_sub(other)
        .ok_or_else(|| overflow(field, amount, format!("difference with {} overflows", other)))
}

/// Sums amounts, failing on the first overflow.
pub fn sum_amounts<I>(field: &str, amounts: I) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| add_amounts(field, total, amount))
}
