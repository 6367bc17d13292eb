//! Projection inputs
//!
//! Every section deserializes with defaults, so a parameter file only needs
//! the values that differ from the baseline household.

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, InvalidInput};
use crate::mortgage::LoanTerms;
use crate::tax::{IncomeType, TaxYearPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryParams {
    /// Gross annual salary in year 1 (NOK)
    pub base_salary: f64,
    /// Yearly raise in percent
    pub annual_increase_percent: f64,
}

impl Default for SalaryParams {
    fn default() -> Self {
        Self {
            base_salary: 675_000.0,
            annual_increase_percent: 3.0,
        }
    }
}

/// How gross salary becomes net salary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxModel {
    /// Full income/wealth tax calculation each year
    #[default]
    Progressive,
    /// Single flat rate on gross salary
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxParams {
    pub model: TaxModel,
    /// Used only by `TaxModel::Flat`
    pub flat_rate_percent: f64,
    pub income_type: IncomeType,
    /// Gross wealth at the start of year 1 (NOK)
    pub initial_wealth: f64,
    pub other_loans: f64,
    /// Annual rate on other loans as a decimal
    pub other_loan_rate: f64,
    pub primary_home_value: f64,
    pub bank_balance: f64,
    pub year_policy: TaxYearPolicy,
}

impl Default for TaxParams {
    fn default() -> Self {
        Self {
            model: TaxModel::Progressive,
            flat_rate_percent: 21.0,
            income_type: IncomeType::Wage,
            initial_wealth: 0.0,
            other_loans: 0.0,
            other_loan_rate: 0.06,
            primary_home_value: 0.0,
            bank_balance: 0.0,
            year_policy: TaxYearPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicParams {
    pub inflation_rate_percent: f64,
    /// Yearly growth of living expenses, often a little above inflation
    pub cost_of_living_increase_percent: f64,
    /// Yearly compound return on accumulated savings
    pub savings_return_rate_percent: f64,
}

impl Default for EconomicParams {
    fn default() -> Self {
        Self {
            inflation_rate_percent: 2.0,
            cost_of_living_increase_percent: 2.5,
            savings_return_rate_percent: 3.0,
        }
    }
}

impl EconomicParams {
    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate_percent / 100.0
    }

    pub fn cost_of_living_rate(&self) -> f64 {
        self.cost_of_living_increase_percent / 100.0
    }

    pub fn savings_return_rate(&self) -> f64 {
        self.savings_return_rate_percent / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageParams {
    pub loan_amount: f64,
    pub interest_rate_percent: f64,
    pub term_years: u32,
}

impl Default for MortgageParams {
    fn default() -> Self {
        Self {
            loan_amount: 2_000_000.0,
            interest_rate_percent: 5.79,
            term_years: 30,
        }
    }
}

impl MortgageParams {
    pub fn loan_terms(&self) -> LoanTerms {
        LoanTerms::new(self.loan_amount, self.interest_rate_percent, self.term_years)
    }

    /// Annual rate as a decimal, as the tax calculator expects it
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate_percent / 100.0
    }
}

/// A monthly living expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub name: String,
    /// NOK per month in year 1
    pub monthly: f64,
}

impl ExpenseCategory {
    pub fn new(name: impl Into<String>, monthly: f64) -> Self {
        Self { name: name.into(), monthly }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetParams {
    pub categories: Vec<ExpenseCategory>,
}

impl Default for BudgetParams {
    fn default() -> Self {
        Self {
            categories: vec![
                ExpenseCategory::new("joint_debt", 2_750.0),
                ExpenseCategory::new("groceries", 5_000.0),
                ExpenseCategory::new("utilities", 2_000.0),
                ExpenseCategory::new("transportation", 1_500.0),
                ExpenseCategory::new("entertainment", 2_000.0),
                ExpenseCategory::new("other", 3_000.0),
            ],
        }
    }
}

/// Complete input for one projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    pub salary: SalaryParams,
    pub tax: TaxParams,
    pub economic: EconomicParams,
    pub mortgage: MortgageParams,
    pub budget: BudgetParams,
}

impl ProjectionParams {
    /// Reject amounts that cannot be negative. Loan terms and tax inputs
    /// are checked again by their own components.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        ensure_non_negative("base_salary", self.salary.base_salary)?;
        ensure_non_negative("initial_wealth", self.tax.initial_wealth)?;
        ensure_non_negative("flat_rate_percent", self.tax.flat_rate_percent)?;
        for category in &self.budget.categories {
            ensure_non_negative("monthly expense", category.monthly)?;
        }
        self.mortgage.loan_terms().validate()
    }
}
