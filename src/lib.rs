//! Household Projection - 30-year personal finance projection in NOK
//!
//! This library provides:
//! - Fixed-rate mortgage amortization and yearly roll-ups
//! - Norwegian income, bracket, social security and wealth tax (2024/2025 tables)
//! - Year-by-year salary, expense, mortgage and savings projection
//! - Batch scenario runs and tax sweeps

pub mod errors;
pub mod mortgage;
pub mod tax;
pub mod projection;
pub mod scenario;
pub mod loader;
pub mod output;

// Re-export commonly used types
pub use errors::{Error, InvalidInput, Result};
pub use mortgage::{compute_schedule, aggregate_by_year, LoanTerms, PaymentRecord, YearlyMortgageSummary};
pub use tax::{calculate_tax, IncomeType, TaxInput, TaxResult};
pub use projection::{project, ProjectionEngine, ProjectionParams, ProjectionResult, YearRecord};
pub use scenario::ScenarioRunner;
