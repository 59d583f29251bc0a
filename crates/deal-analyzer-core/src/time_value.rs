use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Divide, returning `default` when the denominator is exactly zero.
///
/// Every ratio in the deal engine goes through this helper; the default is
/// chosen per call site (0, 1 or the DSCR sentinel).
pub fn safe_divide(numerator: Decimal, denominator: Decimal, default: Decimal) -> Decimal {
    if denominator.is_zero() {
        default
    } else {
        numerator / denominator
    }
}

/// [`safe_divide`] that reports a quotient outside the Decimal range as
/// `None` instead of panicking.
pub fn checked_safe_divide(
    numerator: Decimal,
    denominator: Decimal,
    default: Decimal,
) -> Option<Decimal> {
    if denominator.is_zero() {
        Some(default)
    } else {
        numerator.checked_div(denominator)
    }
}

/// Convert a nominal annual percentage rate into a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / dec!(100) / MONTHS_PER_YEAR
}

/// Interest-only monthly payment: principal is deferred entirely.
pub fn interest_only_payment(principal: Money, monthly_rate: Decimal) -> Money {
    principal * monthly_rate
}

/// Level (annuity) monthly payment: P * r(1+r)^n / ((1+r)^n - 1).
///
/// Zero rate falls back to straight-line principal `P / n`, and `n == 0`
/// yields a zero payment. If `(1+r)^n` exceeds the Decimal range the payment
/// is within rounding of its limit `P * r`, which is returned instead.
pub fn level_payment(principal: Money, monthly_rate: Decimal, total_months: u32) -> Money {
    if monthly_rate <= Decimal::ZERO {
        return safe_divide(principal, Decimal::from(total_months), Decimal::ZERO);
    }

    let compound = match (Decimal::ONE + monthly_rate).checked_powi(total_months as i64) {
        Some(c) => c,
        None => return interest_only_payment(principal, monthly_rate),
    };

    // Divided through by (1+r)^n so large compounds never multiply the principal
    let denominator = Decimal::ONE - Decimal::ONE / compound;
    if denominator.is_zero() {
        return safe_divide(principal, Decimal::from(total_months), Decimal::ZERO);
    }

    principal * monthly_rate / denominator
}
