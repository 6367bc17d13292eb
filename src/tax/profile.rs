//! Per-year Norwegian tax tables
//!
//! Each supported tax year is one `TaxProfile` record. Supporting a new year
//! means registering another profile; the calculator has no year-specific
//! branches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, InvalidInput};

/// Kind of personal income, which decides the social security rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    #[default]
    Wage,
    SelfEmployment,
    Pension,
}

impl IncomeType {
    pub const ALL: [IncomeType; 3] = [IncomeType::Wage, IncomeType::SelfEmployment, IncomeType::Pension];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Wage => "wage",
            IncomeType::SelfEmployment => "self_employment",
            IncomeType::Pension => "pension",
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeType {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wage" => Ok(IncomeType::Wage),
            "self_employment" => Ok(IncomeType::SelfEmployment),
            "pension" => Ok(IncomeType::Pension),
            other => Err(InvalidInput::UnsupportedIncomeType(other.to_string())),
        }
    }
}

/// One step of a progressive table: `rate` applies to the slice above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub threshold: f64,
    pub rate: f64,
}

impl Bracket {
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }
}

/// Progressive tax over a table sorted ascending by threshold
///
/// Walks from the highest bracket down. Each bracket taxes only the part of
/// the amount above its threshold, then the amount is clamped to that
/// threshold before the next lower bracket is considered.
pub fn progressive_tax(amount: f64, brackets: &[Bracket]) -> f64 {
    let mut remaining = amount;
    let mut tax = 0.0;

    for bracket in brackets.iter().rev() {
        if remaining > bracket.threshold {
            tax += (remaining - bracket.threshold) * bracket.rate;
            remaining = bracket.threshold;
        }
    }

    tax
}

fn validate_brackets(field: &'static str, year: u16, brackets: &[Bracket]) -> Result<(), InvalidInput> {
    for bracket in brackets {
        ensure_non_negative(field, bracket.threshold)?;
        ensure_non_negative(field, bracket.rate)?;
    }
    if brackets.windows(2).any(|pair| pair[1].threshold <= pair[0].threshold) {
        return Err(InvalidInput::UnsortedBrackets { field, year });
    }
    Ok(())
}

/// Trygdeavgift rates by income type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurityRates {
    pub wage: f64,
    pub self_employment: f64,
    pub pension: f64,
}

impl SocialSecurityRates {
    pub fn rate(&self, income_type: IncomeType) -> f64 {
        match income_type {
            IncomeType::Wage => self.wage,
            IncomeType::SelfEmployment => self.self_employment,
            IncomeType::Pension => self.pension,
        }
    }
}

/// Tax constants for a single income year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxProfile {
    pub year: u16,

    /// Flat tax on ordinary income (alminnelig inntekt)
    pub income_tax_rate: f64,

    /// Personfradrag
    pub personal_deduction: f64,

    pub social_security: SocialSecurityRates,

    /// Trinnskatt, ascending by threshold
    pub bracket_tax: Vec<Bracket>,

    /// Net wealth exempt from wealth tax
    pub wealth_tax_threshold: f64,
    pub municipal_wealth_tax_rate: f64,

    /// State wealth tax, ascending by threshold
    pub state_wealth_tax: Vec<Bracket>,

    /// Share of primary home market value counted as wealth
    pub primary_home_valuation: f64,
    /// Valuation share above `primary_home_high_value_threshold`
    pub primary_home_high_valuation: f64,
    pub primary_home_high_value_threshold: f64,
    pub secondary_home_valuation: f64,

    /// Tax value of deductible interest
    pub interest_deduction_rate: f64,
}

const SOCIAL_SECURITY: SocialSecurityRates = SocialSecurityRates {
    wage: 0.080,
    self_employment: 0.112,
    pension: 0.051,
};

impl TaxProfile {
    pub fn norway_2024() -> Self {
        Self {
            year: 2024,
            income_tax_rate: 0.22,
            personal_deduction: 77_700.0,
            social_security: SOCIAL_SECURITY,
            bracket_tax: vec![
                Bracket::new(208_050.0, 0.017),
                Bracket::new(293_250.0, 0.040),
                Bracket::new(667_650.0, 0.137),
                Bracket::new(902_300.0, 0.167),
                Bracket::new(1_350_000.0, 0.177),
            ],
            wealth_tax_threshold: 1_700_000.0,
            municipal_wealth_tax_rate: 0.007,
            state_wealth_tax: vec![
                Bracket::new(1_700_000.0, 0.00525),
                Bracket::new(19_970_000.0, 0.01),
            ],
            primary_home_valuation: 0.25,
            primary_home_high_valuation: 0.50,
            primary_home_high_value_threshold: 10_000_000.0,
            secondary_home_valuation: 0.95,
            interest_deduction_rate: 0.22,
        }
    }

    pub fn norway_2025() -> Self {
        Self {
            year: 2025,
            personal_deduction: 79_200.0,
            bracket_tax: vec![
                Bracket::new(217_400.0, 0.017),
                Bracket::new(306_050.0, 0.040),
                Bracket::new(697_150.0, 0.137),
                Bracket::new(942_400.0, 0.167),
                Bracket::new(1_410_750.0, 0.177),
            ],
            wealth_tax_threshold: 1_760_000.0,
            state_wealth_tax: vec![
                Bracket::new(1_760_000.0, 0.00525),
                Bracket::new(20_070_000.0, 0.01),
            ],
            ..Self::norway_2024()
        }
    }

    /// Reject tables the calculator cannot walk correctly
    ///
    /// Every rate and amount must be finite and non-negative, and both
    /// progressive tables must be strictly ascending by threshold.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        ensure_non_negative("income_tax_rate", self.income_tax_rate)?;
        ensure_non_negative("personal_deduction", self.personal_deduction)?;
        ensure_non_negative("social_security.wage", self.social_security.wage)?;
        ensure_non_negative("social_security.self_employment", self.social_security.self_employment)?;
        ensure_non_negative("social_security.pension", self.social_security.pension)?;
        ensure_non_negative("wealth_tax_threshold", self.wealth_tax_threshold)?;
        ensure_non_negative("municipal_wealth_tax_rate", self.municipal_wealth_tax_rate)?;
        ensure_non_negative("primary_home_valuation", self.primary_home_valuation)?;
        ensure_non_negative("primary_home_high_valuation", self.primary_home_high_valuation)?;
        ensure_non_negative("primary_home_high_value_threshold", self.primary_home_high_value_threshold)?;
        ensure_non_negative("secondary_home_valuation", self.secondary_home_valuation)?;
        ensure_non_negative("interest_deduction_rate", self.interest_deduction_rate)?;

        validate_brackets("bracket_tax", self.year, &self.bracket_tax)?;
        validate_brackets("state_wealth_tax", self.year, &self.state_wealth_tax)
    }

    /// Assessed wealth value of a primary residence
    pub fn taxable_primary_home_value(&self, market_value: f64) -> f64 {
        if market_value <= 0.0 {
            return 0.0;
        }
        let cap = self.primary_home_high_value_threshold;
        if market_value <= cap {
            market_value * self.primary_home_valuation
        } else {
            cap * self.primary_home_valuation + (market_value - cap) * self.primary_home_high_valuation
        }
    }
}

/// The set of tax years the calculator knows about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxProfiles {
    /// Sorted ascending by year, one profile per year
    profiles: Vec<TaxProfile>,
}

impl TaxProfiles {
    /// Built-in 2024 and 2025 tables
    pub fn builtin() -> Self {
        Self {
            profiles: vec![TaxProfile::norway_2024(), TaxProfile::norway_2025()],
        }
    }

    /// Register a profile, replacing any existing profile for the same year
    pub fn insert(&mut self, profile: TaxProfile) -> Result<(), InvalidInput> {
        profile.validate()?;
        match self.profiles.binary_search_by_key(&profile.year, |p| p.year) {
            Ok(idx) => self.profiles[idx] = profile,
            Err(idx) => self.profiles.insert(idx, profile),
        }
        Ok(())
    }

    pub fn get(&self, year: u16) -> Result<&TaxProfile, InvalidInput> {
        self.profiles
            .iter()
            .find(|p| p.year == year)
            .ok_or_else(|| InvalidInput::UnsupportedTaxYear {
                year,
                supported: self.supported_years(),
            })
    }

    pub fn supported_years(&self) -> Vec<u16> {
        self.profiles.iter().map(|p| p.year).collect()
    }

    pub fn latest_year(&self) -> Option<u16> {
        self.profiles.last().map(|p| p.year)
    }
}

impl Default for TaxProfiles {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Maps projection years onto tax years
///
/// Projection year 1 uses `first_year`, each later year the next tax year,
/// until `cap_year` (or the latest registered profile when unset) is reached.
/// Later years keep reusing the capped profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxYearPolicy {
    pub first_year: u16,
    pub cap_year: Option<u16>,
}

impl TaxYearPolicy {
    pub fn fixed(year: u16) -> Self {
        Self { first_year: year, cap_year: Some(year) }
    }

    /// Tax year for a 1-indexed projection year
    pub fn tax_year(&self, projection_year: u32, profiles: &TaxProfiles) -> u16 {
        let offset = u16::try_from(projection_year.saturating_sub(1)).unwrap_or(u16::MAX);
        let year = self.first_year.saturating_add(offset);
        match self.cap_year.or_else(|| profiles.latest_year()) {
            Some(cap) => year.min(cap.max(self.first_year)),
            None => year,
        }
    }
}

impl Default for TaxYearPolicy {
    fn default() -> Self {
        Self { first_year: 2025, cap_year: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_progressive_tax_slices() {
        let table = TaxProfile::norway_2025().bracket_tax;
        // (306_050 - 217_400) * 1.7% + (675_000 - 306_050) * 4.0%
        assert_abs_diff_eq!(progressive_tax(675_000.0, &table), 16_265.05, epsilon = 1e-6);
        assert_eq!(progressive_tax(0.0, &table), 0.0);
        assert_eq!(progressive_tax(200_000.0, &table), 0.0);
    }

    #[test]
    fn test_progressive_tax_zero_at_threshold() {
        let table = TaxProfile::norway_2024().bracket_tax;
        let at_first = progressive_tax(208_050.0, &table);
        assert_eq!(at_first, 0.0);

        // At the third threshold only the lower two brackets contribute
        let at_third = progressive_tax(667_650.0, &table);
        let expected = (293_250.0 - 208_050.0) * 0.017 + (667_650.0 - 293_250.0) * 0.040;
        assert_abs_diff_eq!(at_third, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_progressive_tax_non_decreasing() {
        for profile in [TaxProfile::norway_2024(), TaxProfile::norway_2025()] {
            let mut prior = 0.0;
            for step in 0..300 {
                let wealth = step as f64 * 100_000.0;
                let tax = progressive_tax(wealth, &profile.state_wealth_tax);
                assert!(tax >= prior, "wealth tax decreased at {}", wealth);
                prior = tax;
            }

            let mut prior = 0.0;
            for step in 0..400 {
                let income = step as f64 * 5_000.0;
                let tax = progressive_tax(income, &profile.bracket_tax);
                assert!(tax >= prior, "bracket tax decreased at {}", income);
                prior = tax;
            }
        }
    }

    #[test]
    fn test_builtin_profiles_validate() {
        assert!(TaxProfile::norway_2024().validate().is_ok());
        assert!(TaxProfile::norway_2025().validate().is_ok());
    }

    #[test]
    fn test_reversed_bracket_table_rejected() {
        let mut profile = TaxProfile::norway_2025();
        profile.year = 2026;
        profile.bracket_tax.reverse();
        assert_eq!(
            profile.validate(),
            Err(InvalidInput::UnsortedBrackets { field: "bracket_tax", year: 2026 })
        );

        let mut profiles = TaxProfiles::builtin();
        assert!(profiles.insert(profile).is_err());
        assert_eq!(profiles.supported_years(), vec![2024, 2025]);

        let mut duplicate = TaxProfile::norway_2024();
        duplicate.state_wealth_tax.push(Bracket::new(19_970_000.0, 0.011));
        assert!(matches!(
            duplicate.validate(),
            Err(InvalidInput::UnsortedBrackets { field: "state_wealth_tax", .. })
        ));
    }

    #[test]
    fn test_negative_profile_rate_rejected() {
        let mut profile = TaxProfile::norway_2025();
        profile.municipal_wealth_tax_rate = -0.007;
        assert!(matches!(
            profile.validate(),
            Err(InvalidInput::NegativeAmount { field: "municipal_wealth_tax_rate", .. })
        ));

        let mut profile = TaxProfile::norway_2025();
        profile.bracket_tax[0].rate = f64::NAN;
        assert_eq!(profile.validate(), Err(InvalidInput::NonFinite { field: "bracket_tax" }));
    }

    #[test]
    fn test_income_type_parsing() {
        assert_eq!("wage".parse::<IncomeType>(), Ok(IncomeType::Wage));
        assert_eq!("self_employment".parse::<IncomeType>(), Ok(IncomeType::SelfEmployment));
        assert_eq!("pension".parse::<IncomeType>(), Ok(IncomeType::Pension));
        assert_eq!(
            "dividend".parse::<IncomeType>(),
            Err(InvalidInput::UnsupportedIncomeType("dividend".to_string()))
        );
        for income_type in IncomeType::ALL {
            assert_eq!(income_type.to_string().parse::<IncomeType>(), Ok(income_type));
        }
    }

    #[test]
    fn test_primary_home_valuation() {
        let profile = TaxProfile::norway_2025();
        assert_eq!(profile.taxable_primary_home_value(0.0), 0.0);
        assert_abs_diff_eq!(profile.taxable_primary_home_value(4_000_000.0), 1_000_000.0);
        assert_abs_diff_eq!(profile.taxable_primary_home_value(12_000_000.0), 3_500_000.0);
    }

    #[test]
    fn test_profile_registry() {
        let mut profiles = TaxProfiles::builtin();
        assert_eq!(profiles.supported_years(), vec![2024, 2025]);
        assert_eq!(profiles.get(2024).unwrap().personal_deduction, 77_700.0);
        assert!(matches!(profiles.get(2023), Err(InvalidInput::UnsupportedTaxYear { year: 2023, .. })));

        let mut next = TaxProfile::norway_2025();
        next.year = 2026;
        profiles.insert(next).unwrap();
        assert_eq!(profiles.latest_year(), Some(2026));
        assert!(profiles.get(2026).is_ok());
    }

    #[test]
    fn test_tax_year_policy_caps() {
        let profiles = TaxProfiles::builtin();

        let policy = TaxYearPolicy { first_year: 2024, cap_year: None };
        assert_eq!(policy.tax_year(1, &profiles), 2024);
        assert_eq!(policy.tax_year(2, &profiles), 2025);
        assert_eq!(policy.tax_year(30, &profiles), 2025);

        let pinned = TaxYearPolicy::fixed(2024);
        assert_eq!(pinned.tax_year(10, &profiles), 2024);

        assert_eq!(TaxYearPolicy::default().tax_year(1, &profiles), 2025);
    }
}
