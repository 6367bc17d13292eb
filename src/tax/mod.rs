//! Norwegian income and wealth tax: year tables, calculator and batch sweeps

mod calculator;
mod profile;
mod simulation;

pub use calculator::{
    calculate_tax, calculate_tax_with, InterestBreakdown, TaxComponent, TaxComponents, TaxInput, TaxResult,
};
pub use profile::{
    progressive_tax, Bracket, IncomeType, SocialSecurityRates, TaxProfile, TaxProfiles, TaxYearPolicy,
};
pub use simulation::{mortgage_impact, tax_grid, AmountRange, SweepBase, TaxSweepRow};
