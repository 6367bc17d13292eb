//! Batch tax runs over income/wealth grids and mortgage levels
//!
//! Every grid point is an independent calculator call, so points are
//! evaluated in parallel and collected back in grid order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::calculator::{calculate_tax_with, TaxInput, TaxResult};
use super::profile::{IncomeType, TaxProfiles};
use crate::errors::{InvalidInput, Result};

/// Inclusive stepped range of NOK amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub start: u64,
    pub end: u64,
    pub step: u64,
}

impl AmountRange {
    pub fn new(start: u64, end: u64, step: u64) -> Self {
        Self { start, end, step }
    }

    pub fn values(&self) -> std::result::Result<Vec<f64>, InvalidInput> {
        if self.step == 0 {
            return Err(InvalidInput::ZeroStep("range"));
        }
        Ok((self.start..=self.end)
            .step_by(self.step as usize)
            .map(|v| v as f64)
            .collect())
    }
}

/// Inputs held fixed across a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepBase {
    pub other_loans: f64,
    pub mortgage_balance: f64,
    pub bank_balance: f64,
    pub tax_year: u16,
    pub income_type: IncomeType,
    pub mortgage_rate: f64,
    pub other_loan_rate: f64,
}

impl Default for SweepBase {
    fn default() -> Self {
        let defaults = TaxInput::default();
        Self {
            other_loans: 0.0,
            mortgage_balance: 0.0,
            bank_balance: 0.0,
            tax_year: defaults.tax_year,
            income_type: defaults.income_type,
            mortgage_rate: defaults.mortgage_rate,
            other_loan_rate: defaults.other_loan_rate,
        }
    }
}

impl SweepBase {
    fn input(&self, income: f64, gross_wealth: f64, mortgage_balance: f64) -> TaxInput {
        TaxInput {
            income,
            gross_wealth,
            other_loans: self.other_loans,
            mortgage_balance,
            tax_year: self.tax_year,
            primary_home_value: 0.0,
            bank_balance: self.bank_balance,
            income_type: self.income_type,
            mortgage_rate: self.mortgage_rate,
            other_loan_rate: self.other_loan_rate,
        }
    }
}

/// Flat output row for one sweep point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSweepRow {
    pub income: f64,
    pub gross_wealth: f64,
    pub net_wealth: f64,
    pub bank_balance: f64,
    pub loans: f64,
    pub mortgage: f64,
    pub mortgage_interest: f64,
    pub total_interest: f64,
    pub total_tax: f64,
    pub effective_tax_rate: f64,
    pub income_tax: f64,
    pub bracket_tax: f64,
    pub social_security: f64,
    pub interest_deduction: f64,
    pub municipal_wealth_tax: f64,
    pub state_wealth_tax: f64,
}

impl TaxSweepRow {
    fn from_result(input: &TaxInput, result: &TaxResult) -> Self {
        let c = &result.components;
        Self {
            income: input.income,
            gross_wealth: input.gross_wealth,
            // Unfloored, unlike net_wealth_for_tax
            net_wealth: input.gross_wealth - input.other_loans - input.mortgage_balance,
            bank_balance: input.bank_balance,
            loans: input.other_loans,
            mortgage: input.mortgage_balance,
            mortgage_interest: result.interest.mortgage_interest,
            total_interest: result.interest.total_interest,
            total_tax: result.total_tax,
            effective_tax_rate: result.effective_tax_rate,
            income_tax: c.income_tax,
            bracket_tax: c.bracket_tax,
            social_security: c.social_security,
            interest_deduction: c.interest_deduction,
            municipal_wealth_tax: c.municipal_wealth_tax,
            state_wealth_tax: c.state_wealth_tax,
        }
    }
}

fn run_points(inputs: Vec<TaxInput>, profiles: &TaxProfiles) -> Result<Vec<TaxSweepRow>> {
    inputs
        .par_iter()
        .map(|input| -> Result<TaxSweepRow> {
            let result = calculate_tax_with(input, profiles)?;
            Ok(TaxSweepRow::from_result(input, &result))
        })
        .collect()
}

/// Tax for every income × wealth combination, income-major order
pub fn tax_grid(
    incomes: AmountRange,
    wealth: AmountRange,
    base: &SweepBase,
    profiles: &TaxProfiles,
) -> Result<Vec<TaxSweepRow>> {
    let incomes = incomes.values()?;
    let wealth = wealth.values()?;

    let inputs: Vec<TaxInput> = incomes
        .iter()
        .flat_map(|&income| wealth.iter().map(move |&w| (income, w)))
        .map(|(income, w)| base.input(income, w, base.mortgage_balance))
        .collect();

    log::info!("Running tax grid with {} points", inputs.len());
    run_points(inputs, profiles)
}

/// Tax at fixed income and wealth across a list of mortgage balances
pub fn mortgage_impact(
    income: f64,
    gross_wealth: f64,
    mortgages: &[f64],
    base: &SweepBase,
    profiles: &TaxProfiles,
) -> Result<Vec<TaxSweepRow>> {
    let inputs = mortgages
        .iter()
        .map(|&mortgage| base.input(income, gross_wealth, mortgage))
        .collect();

    log::info!("Running mortgage impact over {} mortgage levels", mortgages.len());
    run_points(inputs, profiles)
}
