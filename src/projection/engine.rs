//! Core projection engine for yearly household cash flow projections

use serde::{Deserialize, Serialize};

use super::params::{ProjectionParams, TaxModel};
use super::records::{ExpenseLine, ProjectionResult, YearRecord};
use super::state::ProjectionState;
use crate::errors::Result;
use crate::mortgage::{aggregate_by_year, schedule_for, YearlyMortgageSummary, MONTHS_PER_YEAR};
use crate::tax::{calculate_tax_with, TaxInput, TaxProfiles};

/// Default projection horizon in years
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

const MONTHS: f64 = MONTHS_PER_YEAR as f64;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub horizon_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    profiles: TaxProfiles,
    config: ProjectionConfig,
}

/// Run a projection with the built-in tax tables and a 30 year horizon
pub fn project(params: &ProjectionParams) -> Result<ProjectionResult> {
    ProjectionEngine::default().project(params)
}

impl ProjectionEngine {
    /// Create a new projection engine with given tax tables and config
    pub fn new(profiles: TaxProfiles, config: ProjectionConfig) -> Self {
        Self { profiles, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn profiles(&self) -> &TaxProfiles {
        &self.profiles
    }

    /// Run the full projection
    ///
    /// Years are strictly sequential: each year starts from the state the
    /// previous year produced. Any invalid input aborts the run.
    pub fn project(&self, params: &ProjectionParams) -> Result<ProjectionResult> {
        params.validate()?;

        let schedule = schedule_for(&params.mortgage.loan_terms())?;
        let mortgage_yearly = aggregate_by_year(&schedule);

        log::info!(
            "Projecting {} years from salary {:.0} NOK ({:?} tax)",
            self.config.horizon_years,
            params.salary.base_salary,
            params.tax.model,
        );
        self.warn_on_capped_tax_years(params);

        let initial = ProjectionState::from_params(params);
        let (_, years) = (1..=self.config.horizon_years).try_fold(
            (initial, Vec::with_capacity(self.config.horizon_years as usize)),
            |(state, mut years), _| -> Result<_> {
                let (next, record) = self.project_year(params, &mortgage_yearly, &state)?;
                years.push(record);
                Ok((next, years))
            },
        )?;

        if let Some(last) = years.last() {
            log::info!(
                "Projection complete: cumulative savings {:.0} NOK ({:.0} NOK real)",
                last.cumulative_savings,
                last.real_cumulative_savings,
            );
        }

        Ok(ProjectionResult {
            years,
            schedule,
            mortgage_yearly,
        })
    }

    /// Advance one year: returns the next state and the year's record
    pub fn project_year(
        &self,
        params: &ProjectionParams,
        mortgage_yearly: &[YearlyMortgageSummary],
        state: &ProjectionState,
    ) -> Result<(ProjectionState, YearRecord)> {
        let year = state.year + 1;
        let economic = &params.economic;
        let savings_growth = 1.0 + economic.savings_return_rate();

        let mortgage = YearlyMortgageSummary::for_year(mortgage_yearly, year);

        // Wealth grows by last year's savings, not this year's
        let wealth = if year > 1 {
            state.wealth + state.prior_annual_savings * savings_growth
        } else {
            state.wealth
        };

        let gross_salary = state.salary;
        let (tax, tax_year) = match params.tax.model {
            TaxModel::Progressive => {
                let tax_year = params.tax.year_policy.tax_year(year, &self.profiles);
                let input = TaxInput {
                    income: gross_salary,
                    // A drawn-down household has no taxable wealth
                    gross_wealth: wealth.max(0.0),
                    other_loans: params.tax.other_loans,
                    mortgage_balance: mortgage.year_end_balance,
                    tax_year,
                    primary_home_value: params.tax.primary_home_value,
                    bank_balance: params.tax.bank_balance,
                    income_type: params.tax.income_type,
                    mortgage_rate: params.mortgage.interest_rate(),
                    other_loan_rate: params.tax.other_loan_rate,
                };
                (Some(calculate_tax_with(&input, &self.profiles)?), Some(tax_year))
            }
            TaxModel::Flat => (None, None),
        };

        let effective_tax_rate = match &tax {
            Some(result) => result.effective_tax_rate,
            None => params.tax.flat_rate_percent / 100.0,
        };
        let net_salary = gross_salary * (1.0 - effective_tax_rate);
        let gross_monthly = gross_salary / MONTHS;
        let net_monthly = net_salary / MONTHS;

        // Year 1 uses the base budget
        let expenses: Vec<f64> = if year > 1 {
            let growth = 1.0 + economic.cost_of_living_rate();
            state.expenses.iter().map(|e| e * growth).collect()
        } else {
            state.expenses.clone()
        };
        let monthly_expenses: f64 = expenses.iter().sum();
        let annual_expenses = monthly_expenses * MONTHS;

        let monthly_mortgage = mortgage.monthly_payment();
        let monthly_outflow = monthly_expenses + monthly_mortgage;
        let annual_outflow = monthly_outflow * MONTHS;

        let monthly_savings = net_monthly - monthly_outflow;
        let annual_savings = monthly_savings * MONTHS;

        let inflation_factor = 1.0 / (1.0 + economic.inflation_rate()).powi(year as i32 - 1);

        // Returns apply to the existing balance before this year's contribution
        let cumulative_savings = if year == 1 {
            annual_savings
        } else {
            state.cumulative_savings * savings_growth + annual_savings
        };

        if annual_savings < 0.0 {
            log::warn!("Year {}: outflow exceeds net income by {:.0} NOK", year, -annual_savings);
        }
        log::debug!(
            "Year {}: gross {:.0}, net {:.0}, outflow {:.0}/month, cumulative savings {:.0}",
            year,
            gross_salary,
            net_salary,
            monthly_outflow,
            cumulative_savings,
        );

        let record = YearRecord {
            year,
            tax_year,
            gross_salary,
            net_salary,
            gross_monthly,
            net_monthly,
            total_tax: gross_salary - net_salary,
            effective_tax_rate,
            expenses: params
                .budget
                .categories
                .iter()
                .zip(&expenses)
                .map(|(category, &monthly)| ExpenseLine {
                    name: category.name.clone(),
                    monthly,
                })
                .collect(),
            monthly_expenses,
            annual_expenses,
            monthly_mortgage,
            annual_mortgage: mortgage.annual_payment,
            annual_principal: mortgage.annual_principal,
            annual_interest: mortgage.annual_interest,
            remaining_balance: mortgage.year_end_balance,
            monthly_outflow,
            annual_outflow,
            monthly_savings,
            annual_savings,
            cumulative_savings,
            wealth,
            inflation_factor,
            real_net_salary: net_salary * inflation_factor,
            real_gross_monthly: gross_monthly * inflation_factor,
            real_monthly_income: net_monthly * inflation_factor,
            real_monthly_expenses: monthly_expenses * inflation_factor,
            real_monthly_mortgage: monthly_mortgage * inflation_factor,
            real_monthly_savings: monthly_savings * inflation_factor,
            real_cumulative_savings: cumulative_savings * inflation_factor,
            tax,
        };

        let next = ProjectionState {
            year,
            salary: gross_salary * (1.0 + params.salary.annual_increase_percent / 100.0),
            expenses,
            wealth,
            cumulative_savings,
            prior_annual_savings: annual_savings,
        };

        Ok((next, record))
    }

    fn warn_on_capped_tax_years(&self, params: &ProjectionParams) {
        if params.tax.model != TaxModel::Progressive || self.config.horizon_years == 0 {
            return;
        }
        let policy = &params.tax.year_policy;
        let last = policy.tax_year(self.config.horizon_years, &self.profiles);
        let uncapped = u32::from(policy.first_year) + self.config.horizon_years - 1;
        if u32::from(last) < uncapped {
            log::warn!(
                "Tax tables end at {}; later projection years reuse the {} profile",
                last,
                last,
            );
        }
    }
}
