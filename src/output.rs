//! CSV and JSON writers for projection, schedule and sweep output

use std::io::Write;

use crate::errors::Result;
use crate::mortgage::PaymentRecord;
use crate::projection::{ProjectionResult, YearRecord};
use crate::tax::{TaxComponent, TaxSweepRow};

const LEADING_COLUMNS: [&str; 8] = [
    "Year",
    "TaxYear",
    "GrossSalary",
    "NetSalary",
    "GrossMonthly",
    "NetMonthly",
    "TotalTax",
    "EffectiveTaxRate",
];

const TRAILING_COLUMNS: [&str; 21] = [
    "MonthlyExpenses",
    "AnnualExpenses",
    "MonthlyMortgage",
    "AnnualMortgage",
    "AnnualPrincipal",
    "AnnualInterest",
    "RemainingBalance",
    "MonthlyOutflow",
    "AnnualOutflow",
    "MonthlySavings",
    "AnnualSavings",
    "CumulativeSavings",
    "Wealth",
    "InflationFactor",
    "RealNetSalary",
    "RealGrossMonthly",
    "RealMonthlyIncome",
    "RealMonthlyExpenses",
    "RealMonthlyMortgage",
    "RealMonthlySavings",
    "RealCumulativeSavings",
];

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Write one row per projected year
///
/// Expense categories become columns named after the first record's budget.
/// Tax component columns are left empty for flat-tax projections.
pub fn write_year_records<W: Write>(writer: W, years: &[YearRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let categories: Vec<&str> = years
        .first()
        .map(|r| r.expenses.iter().map(|e| e.name.as_str()).collect())
        .unwrap_or_default();

    let mut header: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(categories.iter().map(|c| c.to_string()));
    header.extend(TRAILING_COLUMNS.iter().map(|c| c.to_string()));
    header.extend(TaxComponent::ALL.iter().map(|c| c.as_str().to_string()));
    csv.write_record(&header)?;

    for r in years {
        let mut row = vec![
            r.year.to_string(),
            r.tax_year.map(|y| y.to_string()).unwrap_or_default(),
            money(r.gross_salary),
            money(r.net_salary),
            money(r.gross_monthly),
            money(r.net_monthly),
            money(r.total_tax),
            format!("{:.6}", r.effective_tax_rate),
        ];
        row.extend(r.expenses.iter().map(|e| money(e.monthly)));
        row.extend([
            money(r.monthly_expenses),
            money(r.annual_expenses),
            money(r.monthly_mortgage),
            money(r.annual_mortgage),
            money(r.annual_principal),
            money(r.annual_interest),
            money(r.remaining_balance),
            money(r.monthly_outflow),
            money(r.annual_outflow),
            money(r.monthly_savings),
            money(r.annual_savings),
            money(r.cumulative_savings),
            money(r.wealth),
            format!("{:.8}", r.inflation_factor),
            money(r.real_net_salary),
            money(r.real_gross_monthly),
            money(r.real_monthly_income),
            money(r.real_monthly_expenses),
            money(r.real_monthly_mortgage),
            money(r.real_monthly_savings),
            money(r.real_cumulative_savings),
        ]);
        match &r.tax {
            Some(tax) => row.extend(tax.components.iter().map(|(_, amount)| money(amount))),
            None => row.extend(TaxComponent::ALL.iter().map(|_| String::new())),
        }
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the monthly amortization schedule
pub fn write_schedule<W: Write>(writer: W, schedule: &[PaymentRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in schedule {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write tax grid or mortgage impact rows
pub fn write_sweep<W: Write>(writer: W, rows: &[TaxSweepRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the full result, including tax breakdowns, as pretty JSON
pub fn write_json<W: Write>(writer: W, result: &ProjectionResult) -> Result<()> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}
