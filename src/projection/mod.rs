//! Year-by-year household projection

mod engine;
mod params;
mod records;
mod state;

pub use engine::{project, ProjectionConfig, ProjectionEngine, DEFAULT_HORIZON_YEARS};
pub use params::{
    BudgetParams, EconomicParams, ExpenseCategory, MortgageParams, ProjectionParams, SalaryParams, TaxModel,
    TaxParams,
};
pub use records::{ExpenseLine, ProjectionResult, ProjectionSummary, YearRecord};
pub use state::ProjectionState;
