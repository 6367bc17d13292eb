//! Roll the monthly schedule up into loan years

use serde::{Deserialize, Serialize};

use super::amortization::{PaymentRecord, MONTHS_PER_YEAR};

/// Mortgage totals for one loan year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyMortgageSummary {
    pub year: u32,
    pub annual_payment: f64,
    pub annual_principal: f64,
    pub annual_interest: f64,
    pub year_end_balance: f64,
}

impl YearlyMortgageSummary {
    /// Zero-payment, zero-balance summary for a year past the loan term
    pub fn paid_off(year: u32) -> Self {
        Self { year, ..Default::default() }
    }

    /// Look up a year, falling back to a paid-off summary outside the schedule
    pub fn for_year(summaries: &[YearlyMortgageSummary], year: u32) -> Self {
        summaries
            .iter()
            .find(|s| s.year == year)
            .copied()
            .unwrap_or_else(|| Self::paid_off(year))
    }

    /// Average monthly payment over the year
    pub fn monthly_payment(&self) -> f64 {
        self.annual_payment / MONTHS_PER_YEAR as f64
    }
}

/// Group payments by year, ascending
///
/// The year-end balance is taken from the December payment, or from the
/// schedule's final payment when the last year is partial.
pub fn aggregate_by_year(schedule: &[PaymentRecord]) -> Vec<YearlyMortgageSummary> {
    let mut summaries: Vec<YearlyMortgageSummary> = Vec::new();

    for record in schedule {
        let needs_new = summaries.last().map_or(true, |s| s.year != record.year);
        if needs_new {
            summaries.push(YearlyMortgageSummary::paid_off(record.year));
        }

        if let Some(summary) = summaries.last_mut() {
            summary.annual_payment += record.monthly_payment;
            summary.annual_principal += record.principal_payment;
            summary.annual_interest += record.interest_payment;

            if record.payment_number % MONTHS_PER_YEAR == 0 {
                summary.year_end_balance = record.remaining_balance;
            }
        }
    }

    // Partial final year has no December record
    if let (Some(last_record), Some(last_summary)) = (schedule.last(), summaries.last_mut()) {
        if last_record.payment_number % MONTHS_PER_YEAR != 0 {
            last_summary.year_end_balance = last_record.remaining_balance;
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::compute_schedule;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn record(payment_number: u32, balance: f64) -> PaymentRecord {
        PaymentRecord {
            payment_number,
            year: (payment_number - 1) / 12 + 1,
            monthly_payment: 100.0,
            principal_payment: 90.0,
            interest_payment: 10.0,
            remaining_balance: balance,
        }
    }

    #[test]
    fn test_one_summary_per_year() {
        let schedule = compute_schedule(2_000_000.0, 5.79, 30).unwrap();
        let yearly = aggregate_by_year(&schedule);

        assert_eq!(yearly.len(), 30);
        assert!(yearly.windows(2).all(|w| w[0].year + 1 == w[1].year));

        // Year 1 matches the 12th payment
        assert_relative_eq!(yearly[0].year_end_balance, schedule[11].remaining_balance);
        assert_abs_diff_eq!(yearly[0].year_end_balance, 1_974_461.41, epsilon = 0.01);
        assert_abs_diff_eq!(yearly[29].year_end_balance, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sums_within_year() {
        let schedule = compute_schedule(300_000.0, 3.0, 3).unwrap();
        let yearly = aggregate_by_year(&schedule);

        for summary in &yearly {
            let months: Vec<_> = schedule.iter().filter(|r| r.year == summary.year).collect();
            let payment: f64 = months.iter().map(|r| r.monthly_payment).sum();
            let principal: f64 = months.iter().map(|r| r.principal_payment).sum();
            let interest: f64 = months.iter().map(|r| r.interest_payment).sum();
            assert_relative_eq!(summary.annual_payment, payment);
            assert_relative_eq!(summary.annual_principal, principal);
            assert_relative_eq!(summary.annual_interest, interest);
            assert_relative_eq!(summary.annual_principal + summary.annual_interest, summary.annual_payment, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_partial_final_year_uses_last_record() {
        let schedule: Vec<_> = (1..=18).map(|n| record(n, 1_800.0 - n as f64 * 100.0)).collect();
        let yearly = aggregate_by_year(&schedule);

        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].year_end_balance, 600.0);
        assert_eq!(yearly[1].year_end_balance, 0.0);
        assert_eq!(yearly[1].annual_payment, 600.0);
    }

    #[test]
    fn test_years_past_term_are_paid_off() {
        let schedule = compute_schedule(100_000.0, 4.0, 2).unwrap();
        let yearly = aggregate_by_year(&schedule);

        let beyond = YearlyMortgageSummary::for_year(&yearly, 5);
        assert_eq!(beyond, YearlyMortgageSummary::paid_off(5));
        assert_eq!(beyond.monthly_payment(), 0.0);

        let first = YearlyMortgageSummary::for_year(&yearly, 1);
        assert_relative_eq!(first.monthly_payment(), schedule[0].monthly_payment, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_schedule() {
        assert!(aggregate_by_year(&[]).is_empty());
    }
}
