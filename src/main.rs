//! Household Projection CLI
//!
//! Runs a 30-year projection and prints the yearly overview

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use household_projection::{
    loader, output,
    projection::{ProjectionConfig, ProjectionEngine, ProjectionParams, TaxModel, DEFAULT_HORIZON_YEARS},
    tax::{IncomeType, TaxProfiles},
    ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "household_projection", version, about = "Salary, mortgage and savings projection in NOK")]
struct Args {
    /// JSON parameter file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of extra tax year profiles
    #[arg(long)]
    tax_profiles: Option<PathBuf>,

    /// Gross annual salary in year 1 (NOK)
    #[arg(long)]
    salary: Option<f64>,

    /// Annual salary increase (%)
    #[arg(long)]
    annual_increase: Option<f64>,

    /// Use a flat tax rate (%) instead of the full Norwegian tax calculation
    #[arg(long)]
    flat_tax: Option<f64>,

    /// wage, self_employment or pension
    #[arg(long)]
    income_type: Option<IncomeType>,

    /// Tax year applied to projection year 1
    #[arg(long)]
    first_tax_year: Option<u16>,

    /// Last tax year to advance to; later years reuse it
    #[arg(long)]
    cap_tax_year: Option<u16>,

    /// Gross wealth at the start of year 1 (NOK)
    #[arg(long)]
    initial_wealth: Option<f64>,

    /// Annual inflation rate (%)
    #[arg(long)]
    inflation: Option<f64>,

    /// Annual cost of living increase (%)
    #[arg(long)]
    cost_of_living: Option<f64>,

    /// Annual return on savings (%)
    #[arg(long)]
    savings_return: Option<f64>,

    /// Mortgage principal (NOK)
    #[arg(long)]
    loan_amount: Option<f64>,

    /// Mortgage interest rate (%)
    #[arg(long)]
    interest_rate: Option<f64>,

    /// Mortgage term in years
    #[arg(long)]
    loan_term: Option<u32>,

    /// Years to project
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    years: u32,

    /// Write yearly records as CSV
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the monthly amortization schedule as CSV
    #[arg(long)]
    schedule_output: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Compare final savings across mortgage interest rates (%)
    #[arg(long, value_delimiter = ',')]
    compare_rates: Vec<f64>,
}

impl Args {
    fn params(&self) -> anyhow::Result<ProjectionParams> {
        let mut params = match &self.config {
            Some(path) => loader::load_params(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => ProjectionParams::default(),
        };

        if let Some(v) = self.salary {
            params.salary.base_salary = v;
        }
        if let Some(v) = self.annual_increase {
            params.salary.annual_increase_percent = v;
        }
        if let Some(v) = self.flat_tax {
            params.tax.model = TaxModel::Flat;
            params.tax.flat_rate_percent = v;
        }
        if let Some(v) = self.income_type {
            params.tax.income_type = v;
        }
        if let Some(v) = self.first_tax_year {
            params.tax.year_policy.first_year = v;
        }
        if let Some(v) = self.cap_tax_year {
            params.tax.year_policy.cap_year = Some(v);
        }
        if let Some(v) = self.initial_wealth {
            params.tax.initial_wealth = v;
        }
        if let Some(v) = self.inflation {
            params.economic.inflation_rate_percent = v;
        }
        if let Some(v) = self.cost_of_living {
            params.economic.cost_of_living_increase_percent = v;
        }
        if let Some(v) = self.savings_return {
            params.economic.savings_return_rate_percent = v;
        }
        if let Some(v) = self.loan_amount {
            params.mortgage.loan_amount = v;
        }
        if let Some(v) = self.interest_rate {
            params.mortgage.interest_rate_percent = v;
        }
        if let Some(v) = self.loan_term {
            params.mortgage.term_years = v;
        }

        Ok(params)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = args.params()?;
    let profiles = match &args.tax_profiles {
        Some(path) => loader::load_profiles(path)
            .with_context(|| format!("Failed to load tax profiles from {}", path.display()))?,
        None => TaxProfiles::builtin(),
    };
    let config = ProjectionConfig { horizon_years: args.years };

    println!("Household Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");

    let engine = ProjectionEngine::new(profiles.clone(), config);
    let result = engine.project(&params).context("Projection failed")?;

    println!("Salary: {:.0} NOK (+{}%/yr), tax: {:?}", params.salary.base_salary, params.salary.annual_increase_percent, params.tax.model);
    println!(
        "Mortgage: {:.0} NOK at {}% over {} years",
        params.mortgage.loan_amount, params.mortgage.interest_rate_percent, params.mortgage.term_years
    );
    println!();

    println!(
        "{:>4} {:>12} {:>10} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}",
        "Year", "Gross", "TaxRate", "NetMonthly", "Expenses", "Mortgage", "Savings", "Balance", "Cumulative"
    );
    println!("{}", "-".repeat(112));
    for row in &result.years {
        println!(
            "{:>4} {:>12.0} {:>9.2}% {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>14.0} {:>14.0}",
            row.year,
            row.gross_salary,
            row.effective_tax_rate * 100.0,
            row.net_monthly,
            row.monthly_expenses,
            row.monthly_mortgage,
            row.monthly_savings,
            row.remaining_balance,
            row.cumulative_savings,
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Monthly Net Income (year 1):        {:.0} NOK", summary.first_year_net_monthly);
    println!("  Monthly Expenses (year 1):          {:.0} NOK", summary.first_year_monthly_expenses);
    println!("  Monthly Mortgage (year 1):          {:.0} NOK", summary.first_year_monthly_mortgage);
    println!("  Monthly Savings Potential (year 1): {:.0} NOK", summary.first_year_monthly_savings);
    println!("  Total Principal Paid:               {:.0} NOK", summary.mortgage.total_principal);
    println!("  Total Interest Paid:                {:.0} NOK", summary.mortgage.total_interest);
    println!("  Interest as % of Payments:          {:.1}%", summary.mortgage.interest_share() * 100.0);
    println!("  Total Tax:                          {:.0} NOK", summary.total_tax);
    println!("  Final Cumulative Savings:           {:.0} NOK", summary.final_cumulative_savings);
    println!("  Final Savings (year-1 NOK):         {:.0} NOK", summary.final_real_cumulative_savings);
    if summary.deficit_years > 0 {
        println!("  Years with negative savings:        {}", summary.deficit_years);
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        output::write_year_records(file, &result.years)?;
        println!("\nYearly results written to: {}", path.display());
    }

    if let Some(path) = &args.schedule_output {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        output::write_schedule(file, &result.schedule)?;
        println!("Amortization schedule written to: {}", path.display());
    }

    if let Some(path) = &args.json_output {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        output::write_json(file, &result)?;
        println!("JSON result written to: {}", path.display());
    }

    if !args.compare_rates.is_empty() {
        let runner = ScenarioRunner::with_profiles(profiles, config);
        let sweep = runner
            .run_sweep(&params, &args.compare_rates, |p, rate| p.mortgage.interest_rate_percent = rate)
            .context("Rate comparison failed")?;

        println!("\nInterest rate comparison:");
        println!("{:>8} {:>12} {:>16} {:>16}", "Rate", "Payment", "FinalSavings", "RealSavings");
        for (rate, scenario) in &sweep {
            let s = scenario.summary();
            println!(
                "{:>7.2}% {:>12.0} {:>16.0} {:>16.0}",
                rate, s.first_year_monthly_mortgage, s.final_cumulative_savings, s.final_real_cumulative_savings
            );
        }
    }

    Ok(())
}
