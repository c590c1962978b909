//! Loan-capacity calculator
//!
//! Estimates the largest loan a client can carry from their monthly income.
//! The monthly payment may not exceed a share of income that grows with the
//! income bracket, and interest is flat over a fixed twelve-month term.

use serde::Serialize;

/// Term used for every estimate
pub const TERM_MONTHS: u32 = 12;
/// Largest amount the calculator will ever suggest
pub const MAX_AMOUNT: f64 = 20_000.0;

/// Share of monthly income that may go to the installment
pub fn payment_share(income: f64) -> f64 {
    if income < 2300.0 {
        0.32
    } else if income <= 3600.0 {
        0.34
    } else if income <= 6000.0 {
        0.35
    } else {
        0.40
    }
}

/// Monthly interest rate in percent
pub fn monthly_rate(income: f64) -> f64 {
    if income <= 3600.0 {
        1.5
    } else if income <= 6000.0 {
        1.3
    } else {
        1.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanEstimate {
    pub income: f64,
    /// Largest affordable installment
    pub max_payment: f64,
    /// Monthly rate in percent
    pub monthly_rate: f64,
    pub term_months: u32,
    /// Suggested principal, a multiple of 100
    pub amount: f64,
    /// Principal plus flat interest
    pub total: f64,
}

/// Estimates the loan capacity for `income`; `None` unless income is positive
pub fn estimate(income: f64) -> Option<LoanEstimate> {
    if !income.is_finite() || income <= 0.0 {
        return None;
    }

    let rate = monthly_rate(income);
    let term = f64::from(TERM_MONTHS);
    let max_payment = income * payment_share(income);
    let factor = 1.0 + rate / 100.0 * term;

    let raw = max_payment * term / factor;
    let amount = ((raw / 100.0).round() * 100.0).min(MAX_AMOUNT);

    Some(LoanEstimate {
        income,
        max_payment: round2(max_payment),
        monthly_rate: rate,
        term_months: TERM_MONTHS,
        amount,
        total: round2(amount * factor),
    })
}

pub(crate) fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
