//! Mortgage amortization and yearly aggregation

mod amortization;
mod yearly;

pub use amortization::{
    compute_schedule, monthly_payment, schedule_for, LoanTerms, MortgageTotals, PaymentRecord,
    MONTHS_PER_YEAR,
};
pub use yearly::{aggregate_by_year, YearlyMortgageSummary};
