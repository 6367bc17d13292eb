//! Yearly output records for projections

use serde::{Deserialize, Serialize};

use crate::mortgage::{MortgageTotals, PaymentRecord, YearlyMortgageSummary};
use crate::tax::TaxResult;

/// Current-year amount for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub name: String,
    pub monthly: f64,
}

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    // Timing
    pub year: u32,
    /// Tax year whose tables were applied (progressive model only)
    pub tax_year: Option<u16>,

    // Income
    pub gross_salary: f64,
    pub net_salary: f64,
    pub gross_monthly: f64,
    pub net_monthly: f64,
    pub total_tax: f64,
    pub effective_tax_rate: f64,

    // Living expenses
    pub expenses: Vec<ExpenseLine>,
    pub monthly_expenses: f64,
    pub annual_expenses: f64,

    // Mortgage
    pub monthly_mortgage: f64,
    pub annual_mortgage: f64,
    pub annual_principal: f64,
    pub annual_interest: f64,
    pub remaining_balance: f64,

    // Cash flow
    pub monthly_outflow: f64,
    pub annual_outflow: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub cumulative_savings: f64,
    /// Gross wealth fed to the tax calculation
    pub wealth: f64,

    // Inflation adjusted (year-1 NOK)
    pub inflation_factor: f64,
    pub real_net_salary: f64,
    pub real_gross_monthly: f64,
    pub real_monthly_income: f64,
    pub real_monthly_expenses: f64,
    pub real_monthly_mortgage: f64,
    pub real_monthly_savings: f64,
    pub real_cumulative_savings: f64,

    /// Full tax breakdown when the progressive model is used
    pub tax: Option<TaxResult>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One record per projected year, ascending
    pub years: Vec<YearRecord>,

    /// Monthly mortgage schedule over the full loan term
    pub schedule: Vec<PaymentRecord>,

    /// Schedule rolled up by loan year
    pub mortgage_yearly: Vec<YearlyMortgageSummary>,
}

impl ProjectionResult {
    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let first = self.years.first();
        let last = self.years.last();

        let within_horizon = self.mortgage_yearly.len().min(self.years.len());

        ProjectionSummary {
            total_years: self.years.len() as u32,
            first_year_net_monthly: first.map(|r| r.net_monthly).unwrap_or(0.0),
            first_year_monthly_expenses: first.map(|r| r.monthly_expenses).unwrap_or(0.0),
            first_year_monthly_mortgage: first.map(|r| r.monthly_mortgage).unwrap_or(0.0),
            first_year_monthly_savings: first.map(|r| r.monthly_savings).unwrap_or(0.0),
            final_cumulative_savings: last.map(|r| r.cumulative_savings).unwrap_or(0.0),
            final_real_cumulative_savings: last.map(|r| r.real_cumulative_savings).unwrap_or(0.0),
            total_tax: self.years.iter().map(|r| r.total_tax).sum(),
            deficit_years: self.years.iter().filter(|r| r.annual_savings < 0.0).count() as u32,
            mortgage: MortgageTotals::from_yearly(&self.mortgage_yearly[..within_horizon]),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub first_year_net_monthly: f64,
    pub first_year_monthly_expenses: f64,
    pub first_year_monthly_mortgage: f64,
    pub first_year_monthly_savings: f64,
    pub final_cumulative_savings: f64,
    pub final_real_cumulative_savings: f64,
    pub total_tax: f64,
    /// Years where outflow exceeded net income
    pub deficit_years: u32,
    /// Mortgage paid within the projection horizon
    pub mortgage: MortgageTotals,
}
