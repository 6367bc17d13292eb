//! Tax sweeps over income/wealth grids and mortgage levels
//!
//! Writes one CSV row per calculation, to a file or stdout

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use household_projection::{
    loader, output,
    tax::{mortgage_impact, tax_grid, AmountRange, IncomeType, SweepBase, TaxProfiles, TaxSweepRow},
};

#[derive(Debug, Parser)]
#[command(name = "tax_sweep", about = "Norwegian tax across ranges of income, wealth and mortgage")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    base: BaseArgs,

    /// Output CSV path (stdout when omitted)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// JSON array of extra tax year profiles
    #[arg(long, global = true)]
    tax_profiles: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Every income x wealth combination
    Grid {
        #[arg(long, default_value_t = 300_000)]
        income_min: u64,
        #[arg(long, default_value_t = 1_500_000)]
        income_max: u64,
        #[arg(long, default_value_t = 100_000)]
        income_step: u64,
        #[arg(long, default_value_t = 0)]
        wealth_min: u64,
        #[arg(long, default_value_t = 10_000_000)]
        wealth_max: u64,
        #[arg(long, default_value_t = 1_000_000)]
        wealth_step: u64,
    },
    /// Fixed income and wealth across mortgage balances
    Mortgage {
        #[arg(long)]
        income: f64,
        #[arg(long, default_value_t = 0.0)]
        wealth: f64,
        /// Comma separated mortgage balances (NOK)
        #[arg(long, value_delimiter = ',', required = true)]
        mortgages: Vec<f64>,
    },
}

#[derive(Debug, Args)]
struct BaseArgs {
    #[arg(long, global = true, default_value_t = 2025)]
    year: u16,
    #[arg(long, global = true, default_value_t = IncomeType::Wage)]
    income_type: IncomeType,
    /// Non-mortgage loans (NOK)
    #[arg(long, global = true, default_value_t = 0.0)]
    loans: f64,
    /// Mortgage balance for grid runs (NOK)
    #[arg(long, global = true, default_value_t = 0.0)]
    mortgage_balance: f64,
    #[arg(long, global = true, default_value_t = 0.0)]
    bank_balance: f64,
    /// Mortgage interest rate as a decimal
    #[arg(long, global = true, default_value_t = 0.04)]
    mortgage_rate: f64,
    /// Other loan interest rate as a decimal
    #[arg(long, global = true, default_value_t = 0.06)]
    other_loan_rate: f64,
}

impl BaseArgs {
    fn sweep_base(&self) -> SweepBase {
        SweepBase {
            other_loans: self.loans,
            mortgage_balance: self.mortgage_balance,
            bank_balance: self.bank_balance,
            tax_year: self.year,
            income_type: self.income_type,
            mortgage_rate: self.mortgage_rate,
            other_loan_rate: self.other_loan_rate,
        }
    }
}

fn write_rows(path: Option<&PathBuf>, rows: &[TaxSweepRow]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
            output::write_sweep(file, rows)?;
            eprintln!("{} rows written to {}", rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            output::write_sweep(&mut handle, rows)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let base = cli.base.sweep_base();
    let profiles = match &cli.tax_profiles {
        Some(path) => loader::load_profiles(path)
            .with_context(|| format!("Failed to load tax profiles from {}", path.display()))?,
        None => TaxProfiles::builtin(),
    };

    let start = Instant::now();
    let rows = match cli.command {
        Command::Grid { income_min, income_max, income_step, wealth_min, wealth_max, wealth_step } => tax_grid(
            AmountRange::new(income_min, income_max, income_step),
            AmountRange::new(wealth_min, wealth_max, wealth_step),
            &base,
            &profiles,
        )
        .context("Tax grid failed")?,
        Command::Mortgage { income, wealth, mortgages } => {
            mortgage_impact(income, wealth, &mortgages, &base, &profiles).context("Mortgage impact failed")?
        }
    };
    log::info!("Computed {} rows in {:?}", rows.len(), start.elapsed());

    write_rows(cli.output.as_ref(), &rows)
}
