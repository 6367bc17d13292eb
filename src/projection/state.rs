//! Household state carried from one projection year to the next

use super::params::ProjectionParams;

/// State of the household at the end of a projection year
///
/// Each year is computed from the previous state and produces a new one;
/// nothing is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionState {
    /// Last completed projection year (0 before year 1)
    pub year: u32,

    /// Gross salary for the coming year
    pub salary: f64,

    /// Monthly amount per expense category, in budget order
    pub expenses: Vec<f64>,

    /// Gross wealth as last assessed
    pub wealth: f64,

    /// Savings balance including compounded returns
    pub cumulative_savings: f64,

    /// Savings potential of the last completed year (drives wealth growth)
    pub prior_annual_savings: f64,
}

impl ProjectionState {
    /// Initialize state before year 1
    pub fn from_params(params: &ProjectionParams) -> Self {
        Self {
            year: 0,
            salary: params.salary.base_salary,
            expenses: params.budget.categories.iter().map(|c| c.monthly).collect(),
            wealth: params.tax.initial_wealth,
            cumulative_savings: 0.0,
            prior_annual_savings: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let params = ProjectionParams::default();
        let state = ProjectionState::from_params(&params);

        assert_eq!(state.year, 0);
        assert_eq!(state.salary, 675_000.0);
        assert_eq!(state.expenses.len(), params.budget.categories.len());
        assert_eq!(state.expenses.iter().sum::<f64>(), 16_250.0);
        assert_eq!(state.cumulative_savings, 0.0);
    }
}
