//! Fixed-rate annuity amortization schedule, one record per monthly payment

use serde::{Deserialize, Serialize};

use super::yearly::YearlyMortgageSummary;
use crate::errors::{ensure_non_negative, InvalidInput, Result};

/// Payments per year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Loan parameters for the amortization engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed (NOK)
    pub principal: f64,

    /// Annual nominal rate in percent (5.79 means 5.79%)
    pub annual_rate_percent: f64,

    /// Loan term in whole years
    pub term_years: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self { principal, annual_rate_percent, term_years }
    }

    /// Check the terms before any arithmetic runs on them
    pub fn validate(&self) -> std::result::Result<(), InvalidInput> {
        ensure_non_negative("principal", self.principal)?;
        ensure_non_negative("annual_rate_percent", self.annual_rate_percent)?;
        if self.term_years == 0 {
            return Err(InvalidInput::InvalidLoanTerm(self.term_years));
        }
        Ok(())
    }

    /// Total number of monthly payments
    pub fn num_payments(&self) -> u32 {
        self.term_years * MONTHS_PER_YEAR
    }

    /// Monthly periodic rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64
    }

    /// Level monthly payment for these terms
    ///
    /// Zero-rate loans are repaid straight-line.
    pub fn monthly_payment(&self) -> f64 {
        let n = self.num_payments() as f64;
        if self.annual_rate_percent == 0.0 {
            return self.principal / n;
        }

        let r = self.monthly_rate();
        let growth = (1.0 + r).powf(n);
        self.principal * (r * growth) / (growth - 1.0)
    }
}

/// A single monthly payment in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment number (1-indexed)
    pub payment_number: u32,

    /// Loan year the payment falls in (1-indexed)
    pub year: u32,

    pub monthly_payment: f64,
    pub principal_payment: f64,
    pub interest_payment: f64,

    /// Balance after this payment, never negative
    pub remaining_balance: f64,
}

/// Monthly payment via the annuity formula, validating inputs first
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> Result<f64> {
    let terms = LoanTerms::new(principal, annual_rate_percent, term_years);
    terms.validate()?;
    Ok(terms.monthly_payment())
}

/// Build the full payment-by-payment schedule
pub fn compute_schedule(principal: f64, annual_rate_percent: f64, term_years: u32) -> Result<Vec<PaymentRecord>> {
    schedule_for(&LoanTerms::new(principal, annual_rate_percent, term_years))
}

/// Build the schedule from prepared loan terms
pub fn schedule_for(terms: &LoanTerms) -> Result<Vec<PaymentRecord>> {
    terms.validate()?;

    let monthly_rate = terms.monthly_rate();
    let level_payment = terms.monthly_payment();
    let total = terms.num_payments();

    let mut balance = terms.principal;
    let mut schedule = Vec::with_capacity(total as usize);

    for payment_number in 1..=total {
        let interest_payment = balance * monthly_rate;
        let mut principal_payment = level_payment - interest_payment;
        let mut payment = level_payment;

        // Final payment: never pay down more than is owed
        if principal_payment > balance {
            principal_payment = balance;
            payment = principal_payment + interest_payment;
        }

        balance = (balance - principal_payment).max(0.0);

        schedule.push(PaymentRecord {
            payment_number,
            year: (payment_number - 1) / MONTHS_PER_YEAR + 1,
            monthly_payment: payment,
            principal_payment,
            interest_payment,
            remaining_balance: balance,
        });
    }

    log::debug!(
        "Amortized {:.0} NOK at {}% over {} years: payment {:.2}",
        terms.principal,
        terms.annual_rate_percent,
        terms.term_years,
        level_payment,
    );

    Ok(schedule)
}

/// Lifetime totals of a schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageTotals {
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_paid: f64,
}

impl MortgageTotals {
    pub fn from_schedule(schedule: &[PaymentRecord]) -> Self {
        let total_principal: f64 = schedule.iter().map(|p| p.principal_payment).sum();
        let total_interest: f64 = schedule.iter().map(|p| p.interest_payment).sum();
        Self {
            total_principal,
            total_interest,
            total_paid: total_principal + total_interest,
        }
    }

    pub fn from_yearly(yearly: &[YearlyMortgageSummary]) -> Self {
        let total_principal: f64 = yearly.iter().map(|y| y.annual_principal).sum();
        let total_interest: f64 = yearly.iter().map(|y| y.annual_interest).sum();
        Self {
            total_principal,
            total_interest,
            total_paid: total_principal + total_interest,
        }
    }

    /// Interest as a share of everything paid (0 when nothing was paid)
    pub fn interest_share(&self) -> f64 {
        if self.total_paid > 0.0 {
            self.total_interest / self.total_paid
        } else {
            0.0
        }
    }
}
