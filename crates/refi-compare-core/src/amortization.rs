//! Fixed-rate amortization engine.
//!
//! Maps a principal, an annual percentage rate and a term in years to a level
//! monthly payment and the full month-by-month schedule. Malformed numeric
//! input is clamped, never rejected, so every call yields a schedule. All math
//! in `rust_decimal::Decimal`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;

/// Longest term accepted; longer terms are clamped to this.
pub const MAX_TERM_YEARS: u32 = 1_000;

/// Residual balance below which the loan is considered fully paid.
const BALANCE_DUST: Decimal = dec!(0.000000000001);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Raw loan parameters as supplied by a caller. Nothing here is trusted;
/// [`LoanInputs::sanitize`] produces the values the engine actually uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual rate in percent (e.g., 6.35 = 6.35%).
    pub annual_rate_percent: Percent,
    /// Term in years; fractional terms are floored.
    pub term_years: Decimal,
}

/// Loan parameters after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

impl LoanInputs {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years: Decimal::from(term_years),
        }
    }

    /// Build inputs from plain floating-point values. NaN, infinities and
    /// values outside the `Decimal` range are treated as zero.
    pub fn from_f64(principal: f64, annual_rate_percent: f64, term_years: f64) -> Self {
        Self {
            principal: finite_or_zero(principal),
            annual_rate_percent: finite_or_zero(annual_rate_percent),
            term_years: finite_or_zero(term_years),
        }
    }

    pub fn sanitize(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal.max(Decimal::ZERO),
            annual_rate_percent: self.annual_rate_percent.max(Decimal::ZERO),
            term_years: clamp_term(self.term_years),
        }
    }

    /// Human-readable notes for every field that sanitization changed.
    pub fn adjustments(&self) -> Vec<String> {
        let terms = self.sanitize();
        let mut notes = Vec::new();
        if terms.principal != self.principal {
            notes.push(format!("Principal {} clamped to 0", self.principal));
        }
        if terms.annual_rate_percent != self.annual_rate_percent {
            notes.push(format!(
                "Annual rate {}% clamped to 0%",
                self.annual_rate_percent
            ));
        }
        if Decimal::from(terms.term_years) != self.term_years {
            notes.push(format!(
                "Term of {} years adjusted to {} years",
                self.term_years, terms.term_years
            ));
        }
        notes
    }
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
    }

    pub fn total_months(&self) -> u32 {
        self.term_years * MONTHS_PER_YEAR
    }
}

fn finite_or_zero(value: f64) -> Decimal {
    if value.is_finite() {
        Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

fn clamp_term(term_years: Decimal) -> u32 {
    let floored = term_years.floor();
    if floored < Decimal::ONE {
        return 1;
    }
    floored
        .to_u32()
        .map_or(MAX_TERM_YEARS, |years| years.min(MAX_TERM_YEARS))
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPoint {
    /// Month number, starting at 1.
    pub month: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
    /// Running sum of `interest_paid` through this month.
    pub cumulative_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    /// Principal after sanitization.
    pub principal: Money,
    pub monthly_rate: Rate,
    pub total_months: u32,
    pub monthly_payment: Money,
    /// `total_paid - principal`; not summed from the schedule.
    pub total_interest: Money,
    /// `monthly_payment * total_months`.
    pub total_paid: Money,
    /// Months in which the payment did not reduce an outstanding balance.
    pub shortfall_months: u32,
    pub schedule: Vec<AmortizationPoint>,
}

impl MortgageResult {
    /// Outstanding balance after `month` payments. Month 0 is the principal;
    /// months past the end of the schedule hold the final balance.
    pub fn balance_at(&self, month: u32) -> Money {
        if month == 0 {
            return self.principal;
        }
        self.schedule
            .get(month as usize - 1)
            .or_else(|| self.schedule.last())
            .map_or(self.principal, |p| p.ending_balance)
    }

    pub fn final_balance(&self) -> Money {
        self.balance_at(self.total_months)
    }

    /// Interest accumulated month by month, as opposed to `total_interest`.
    pub fn scheduled_interest(&self) -> Money {
        self.schedule
            .last()
            .map_or(Decimal::ZERO, |p| p.cumulative_interest)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the level payment and full amortization schedule for a loan.
///
/// Pure: identical inputs always produce identical output. The schedule has
/// `term_years * 12` rows, with terms longer than [`MAX_TERM_YEARS`] clamped
/// to it first.
pub fn compute_schedule(inputs: &LoanInputs) -> MortgageResult {
    let terms = inputs.sanitize();
    let monthly_rate = terms.monthly_rate();
    let total_months = terms.total_months();
    let monthly_payment = level_payment(terms.principal, monthly_rate, total_months);

    let mut schedule = Vec::with_capacity(total_months as usize);
    let mut balance = terms.principal;
    let mut cumulative_interest = Decimal::ZERO;
    let mut shortfall_months = 0u32;

    for month in 1..=total_months {
        let interest = balance.saturating_mul(monthly_rate);
        if monthly_payment <= interest && balance > Decimal::ZERO {
            shortfall_months += 1;
        }

        let principal_paid = monthly_payment.saturating_sub(interest).max(Decimal::ZERO);
        balance = (balance - principal_paid).max(Decimal::ZERO);
        if balance < BALANCE_DUST {
            balance = Decimal::ZERO;
        }
        cumulative_interest = cumulative_interest.saturating_add(interest);

        schedule.push(AmortizationPoint {
            month,
            principal_paid,
            interest_paid: interest,
            ending_balance: balance,
            cumulative_interest,
        });
    }

    let total_paid = monthly_payment.saturating_mul(Decimal::from(total_months));
    let total_interest = total_paid.saturating_sub(terms.principal);

    MortgageResult {
        principal: terms.principal,
        monthly_rate,
        total_months,
        monthly_payment,
        total_interest,
        total_paid,
        shortfall_months,
        schedule,
    }
}

/// Level monthly payment for a fully amortizing loan.
///
/// Zero rate pays the principal off in equal parts. If `(1 + r)^n` leaves the
/// `Decimal` range the payment takes its limit value, interest only.
pub fn level_payment(principal: Money, monthly_rate: Rate, total_months: u32) -> Money {
    let total_months = total_months.max(1);
    if monthly_rate <= Decimal::ZERO {
        return principal / Decimal::from(total_months);
    }

    let one_plus_r = Decimal::ONE.saturating_add(monthly_rate);
    match one_plus_r.checked_powu(u64::from(total_months)) {
        Some(factor) if factor > Decimal::ONE => {
            let annuity = monthly_rate
                .checked_mul(factor)
                .map(|rf| rf / (factor - Decimal::ONE))
                .unwrap_or_else(|| monthly_rate / (Decimal::ONE - Decimal::ONE / factor));
            principal.saturating_mul(annuity)
        }
        // Rate too small to register over the term.
        Some(_) => principal / Decimal::from(total_months),
        None => principal.saturating_mul(monthly_rate),
    }
}
