//! Norwegian personal income and wealth tax

use serde::{Deserialize, Serialize};

use super::profile::{progressive_tax, IncomeType, TaxProfiles};
use crate::errors::{ensure_non_negative, InvalidInput, Result};

/// Everything the calculator needs for one person and one tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInput {
    /// Personal income (NOK)
    pub income: f64,
    /// Gross wealth before debt (NOK)
    pub gross_wealth: f64,
    /// Non-mortgage loans (NOK)
    pub other_loans: f64,
    pub mortgage_balance: f64,
    pub tax_year: u16,
    /// Market value of the primary residence
    pub primary_home_value: f64,
    pub bank_balance: f64,
    pub income_type: IncomeType,
    /// Annual mortgage rate as a decimal
    pub mortgage_rate: f64,
    /// Annual rate on other loans as a decimal
    pub other_loan_rate: f64,
}

impl Default for TaxInput {
    fn default() -> Self {
        Self {
            income: 0.0,
            gross_wealth: 0.0,
            other_loans: 0.0,
            mortgage_balance: 0.0,
            tax_year: 2025,
            primary_home_value: 0.0,
            bank_balance: 0.0,
            income_type: IncomeType::Wage,
            mortgage_rate: 0.04,
            other_loan_rate: 0.06,
        }
    }
}

impl TaxInput {
    fn validate(&self) -> std::result::Result<(), InvalidInput> {
        ensure_non_negative("income", self.income)?;
        ensure_non_negative("gross_wealth", self.gross_wealth)?;
        ensure_non_negative("other_loans", self.other_loans)?;
        ensure_non_negative("mortgage_balance", self.mortgage_balance)?;
        ensure_non_negative("primary_home_value", self.primary_home_value)?;
        ensure_non_negative("bank_balance", self.bank_balance)?;
        Ok(())
    }
}

/// Named parts of the tax bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxComponent {
    IncomeTax,
    BracketTax,
    SocialSecurity,
    MunicipalWealthTax,
    StateWealthTax,
    InterestDeduction,
}

impl TaxComponent {
    pub const ALL: [TaxComponent; 6] = [
        TaxComponent::InterestDeduction,
        TaxComponent::SocialSecurity,
        TaxComponent::IncomeTax,
        TaxComponent::BracketTax,
        TaxComponent::MunicipalWealthTax,
        TaxComponent::StateWealthTax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxComponent::IncomeTax => "income_tax",
            TaxComponent::BracketTax => "bracket_tax",
            TaxComponent::SocialSecurity => "social_security",
            TaxComponent::MunicipalWealthTax => "municipal_wealth_tax",
            TaxComponent::StateWealthTax => "state_wealth_tax",
            TaxComponent::InterestDeduction => "interest_deduction",
        }
    }
}

/// Signed amount per component; the interest deduction is negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxComponents {
    pub income_tax: f64,
    pub bracket_tax: f64,
    pub social_security: f64,
    pub municipal_wealth_tax: f64,
    pub state_wealth_tax: f64,
    pub interest_deduction: f64,
}

impl TaxComponents {
    pub fn get(&self, component: TaxComponent) -> f64 {
        match component {
            TaxComponent::IncomeTax => self.income_tax,
            TaxComponent::BracketTax => self.bracket_tax,
            TaxComponent::SocialSecurity => self.social_security,
            TaxComponent::MunicipalWealthTax => self.municipal_wealth_tax,
            TaxComponent::StateWealthTax => self.state_wealth_tax,
            TaxComponent::InterestDeduction => self.interest_deduction,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaxComponent, f64)> + '_ {
        TaxComponent::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }

    pub fn wealth_tax(&self) -> f64 {
        self.municipal_wealth_tax + self.state_wealth_tax
    }
}

/// Interest expense assumed for the year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestBreakdown {
    pub mortgage_interest_rate: f64,
    pub other_loans_interest_rate: f64,
    pub mortgage_interest: f64,
    pub other_loans_interest: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: u16,
    pub income_type: IncomeType,
    pub income: f64,
    pub gross_wealth: f64,
    pub components: TaxComponents,
    pub total_tax: f64,
    /// total_tax / income, 0 when there is no income
    pub effective_tax_rate: f64,
    pub net_wealth_for_tax: f64,
    pub total_debt: f64,
    /// Reported only; not part of `net_wealth_for_tax`
    pub taxable_primary_home_value: f64,
    /// Reported only; not part of `net_wealth_for_tax`
    pub bank_balance: f64,
    pub interest: InterestBreakdown,
}

/// Calculate tax using the built-in 2024/2025 tables
pub fn calculate_tax(input: &TaxInput) -> Result<TaxResult> {
    calculate_tax_with(input, &TaxProfiles::builtin())
}

/// Calculate tax against a caller-supplied set of profiles
pub fn calculate_tax_with(input: &TaxInput, profiles: &TaxProfiles) -> Result<TaxResult> {
    input.validate()?;
    let profile = profiles.get(input.tax_year)?;

    let total_debt = input.other_loans + input.mortgage_balance;

    // Net wealth is taken straight from the caller's gross figure; the home
    // valuation discount and bank balance are reported but not applied here.
    let taxable_primary_home_value = profile.taxable_primary_home_value(input.primary_home_value);
    let net_wealth_for_tax = (input.gross_wealth - total_debt).max(0.0);

    let mortgage_interest = input.mortgage_balance * input.mortgage_rate;
    let other_loans_interest = input.other_loans * input.other_loan_rate;
    let total_interest = mortgage_interest + other_loans_interest;

    let interest_deduction = -(total_interest * profile.interest_deduction_rate);

    let social_security = input.income * profile.social_security.rate(input.income_type);

    let taxable_ordinary_income = (input.income - profile.personal_deduction - total_interest).max(0.0);
    let income_tax = taxable_ordinary_income * profile.income_tax_rate;

    // Trinnskatt is levied on personal income, unaffected by interest
    let bracket_tax = progressive_tax(input.income, &profile.bracket_tax);

    let municipal_wealth_tax =
        ((net_wealth_for_tax - profile.wealth_tax_threshold) * profile.municipal_wealth_tax_rate).max(0.0);
    let state_wealth_tax = progressive_tax(net_wealth_for_tax, &profile.state_wealth_tax);

    let components = TaxComponents {
        income_tax,
        bracket_tax,
        social_security,
        municipal_wealth_tax,
        state_wealth_tax,
        interest_deduction,
    };
    let total_tax = components.total();

    let effective_tax_rate = if input.income > 0.0 { total_tax / input.income } else { 0.0 };

    Ok(TaxResult {
        tax_year: profile.year,
        income_type: input.income_type,
        income: input.income,
        gross_wealth: input.gross_wealth,
        components,
        total_tax,
        effective_tax_rate,
        net_wealth_for_tax,
        total_debt,
        taxable_primary_home_value,
        bank_balance: input.bank_balance,
        interest: InterestBreakdown {
            mortgage_interest_rate: input.mortgage_rate,
            other_loans_interest_rate: input.other_loan_rate,
            mortgage_interest,
            other_loans_interest,
            total_interest,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::tax::TaxProfile;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn wage_input(income: f64) -> TaxInput {
        TaxInput { income, ..Default::default() }
    }

    #[test]
    fn test_reference_wage_earner_2025() {
        let result = calculate_tax(&wage_input(675_000.0)).unwrap();
        let c = result.components;

        assert_abs_diff_eq!(c.social_security, 54_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.income_tax, 131_076.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.bracket_tax, 16_265.05, epsilon = 1e-6);
        assert_eq!(c.municipal_wealth_tax, 0.0);
        assert_eq!(c.state_wealth_tax, 0.0);
        assert_eq!(c.interest_deduction, 0.0);

        assert_abs_diff_eq!(result.total_tax, 201_341.05, epsilon = 1e-6);
        assert_abs_diff_eq!(result.effective_tax_rate, 201_341.05 / 675_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_debts_wealth_and_interest_2024() {
        let input = TaxInput {
            income: 1_000_000.0,
            gross_wealth: 5_000_000.0,
            other_loans: 100_000.0,
            mortgage_balance: 2_000_000.0,
            tax_year: 2024,
            mortgage_rate: 0.05,
            ..Default::default()
        };
        let result = calculate_tax(&input).unwrap();
        let c = result.components;

        assert_eq!(result.total_debt, 2_100_000.0);
        assert_eq!(result.net_wealth_for_tax, 2_900_000.0);
        assert_abs_diff_eq!(result.interest.mortgage_interest, 100_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.interest.other_loans_interest, 6_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.interest.total_interest, 106_000.0, epsilon = 1e-9);

        assert_abs_diff_eq!(c.interest_deduction, -23_320.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.social_security, 80_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.income_tax, 179_586.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.bracket_tax, 64_887.35, epsilon = 1e-6);
        assert_abs_diff_eq!(c.municipal_wealth_tax, 8_400.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.state_wealth_tax, 6_300.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.total_tax, 315_853.35, epsilon = 1e-6);
    }

    #[test]
    fn test_high_wealth_self_employed() {
        let input = TaxInput {
            income: 1_500_000.0,
            gross_wealth: 25_000_000.0,
            income_type: IncomeType::SelfEmployment,
            ..Default::default()
        };
        let c = calculate_tax(&input).unwrap().components;

        assert_abs_diff_eq!(c.social_security, 168_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.bracket_tax, 144_762.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.municipal_wealth_tax, 162_680.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.state_wealth_tax, 145_427.5, epsilon = 1e-6);
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let input = TaxInput {
            income: 820_000.0,
            gross_wealth: 3_300_000.0,
            other_loans: 250_000.0,
            mortgage_balance: 1_200_000.0,
            income_type: IncomeType::Pension,
            ..Default::default()
        };
        let result = calculate_tax(&input).unwrap();
        let sum: f64 = result.components.iter().map(|(_, amount)| amount).sum();
        assert_relative_eq!(result.total_tax, sum);
        assert_eq!(result.components.iter().count(), 6);
        assert_eq!(result.components.get(TaxComponent::InterestDeduction), result.components.interest_deduction);
        assert!(result.components.interest_deduction < 0.0);
    }

    #[test]
    fn test_zero_income_has_zero_effective_rate() {
        let input = TaxInput { income: 0.0, gross_wealth: 30_000_000.0, ..Default::default() };
        let result = calculate_tax(&input).unwrap();
        assert!(result.total_tax > 0.0);
        assert_eq!(result.effective_tax_rate, 0.0);
    }

    #[test]
    fn test_debt_above_wealth_floors_net_wealth() {
        let input = TaxInput {
            income: 500_000.0,
            gross_wealth: 1_000_000.0,
            mortgage_balance: 3_000_000.0,
            ..Default::default()
        };
        let result = calculate_tax(&input).unwrap();
        assert_eq!(result.net_wealth_for_tax, 0.0);
        assert_eq!(result.components.wealth_tax(), 0.0);
    }

    #[test]
    fn test_home_value_and_bank_balance_reported_only() {
        let base = TaxInput { income: 600_000.0, gross_wealth: 4_000_000.0, ..Default::default() };
        let with_home = TaxInput { primary_home_value: 6_000_000.0, bank_balance: 250_000.0, ..base.clone() };

        let plain = calculate_tax(&base).unwrap();
        let reported = calculate_tax(&with_home).unwrap();

        assert_abs_diff_eq!(reported.taxable_primary_home_value, 1_500_000.0);
        assert_eq!(reported.bank_balance, 250_000.0);
        assert_eq!(reported.net_wealth_for_tax, plain.net_wealth_for_tax);
        assert_eq!(reported.total_tax, plain.total_tax);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let negative = TaxInput { gross_wealth: -1.0, ..wage_input(100.0) };
        match calculate_tax(&negative) {
            Err(Error::InvalidInput(InvalidInput::NegativeAmount { field, .. })) => assert_eq!(field, "gross_wealth"),
            other => panic!("expected negative amount error, got {:?}", other),
        }

        let year = TaxInput { tax_year: 2023, ..wage_input(100.0) };
        assert!(matches!(
            calculate_tax(&year),
            Err(Error::InvalidInput(InvalidInput::UnsupportedTaxYear { year: 2023, .. }))
        ));

        let json = r#"{"income": 100.0, "income_type": "capital"}"#;
        assert!(serde_json::from_str::<TaxInput>(json).is_err());
    }

    #[test]
    fn test_custom_profile_year() {
        let mut profiles = TaxProfiles::builtin();
        let mut next = TaxProfile::norway_2025();
        next.year = 2026;
        next.personal_deduction = 80_000.0;
        profiles.insert(next).unwrap();

        let input = TaxInput { tax_year: 2026, ..wage_input(675_000.0) };
        let result = calculate_tax_with(&input, &profiles).unwrap();
        assert_eq!(result.tax_year, 2026);
        assert_abs_diff_eq!(result.components.income_tax, (675_000.0 - 80_000.0) * 0.22, epsilon = 1e-6);
        assert!(calculate_tax(&input).is_err());
    }
}
