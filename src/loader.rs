//! JSON parameter and tax table loading

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::errors::Result;
use crate::projection::ProjectionParams;
use crate::tax::{IncomeType, TaxProfile, TaxProfiles};

/// Load projection parameters; missing fields keep their defaults
///
/// An unknown `tax.income_type` is reported as
/// `InvalidInput::UnsupportedIncomeType`, not as a JSON error.
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<ProjectionParams> {
    let file = File::open(path.as_ref())?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    if let Some(income_type) = value.pointer("/tax/income_type").and_then(Value::as_str) {
        income_type.parse::<IncomeType>()?;
    }
    let params = serde_json::from_value(value)?;
    log::info!("Loaded projection parameters from {}", path.as_ref().display());
    Ok(params)
}

/// Load extra tax years from a JSON array of profiles
///
/// Profiles are layered over the built-in tables, replacing any year that is
/// already present. Each profile is validated before it is registered.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<TaxProfiles> {
    let file = File::open(path.as_ref())?;
    let extra: Vec<TaxProfile> = serde_json::from_reader(BufReader::new(file))?;

    let mut profiles = TaxProfiles::builtin();
    for profile in extra {
        log::info!("Registering tax profile for {}", profile.year);
        profiles.insert(profile)?;
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, InvalidInput};
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("household_projection_{}_{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_params() {
        let path = temp_file("params.json", r#"{ "mortgage": { "loan_amount": 3500000, "term_years": 25 } }"#);
        let params = load_params(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(params.mortgage.loan_amount, 3_500_000.0);
        assert_eq!(params.mortgage.term_years, 25);
        assert_eq!(params.mortgage.interest_rate_percent, 5.79);
    }

    #[test]
    fn test_load_profiles_adds_year() {
        let mut next = TaxProfile::norway_2025();
        next.year = 2026;
        let json = serde_json::to_string(&vec![next]).unwrap();
        let path = temp_file("profiles.json", &json);
        let profiles = load_profiles(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(profiles.supported_years(), vec![2024, 2025, 2026]);
    }

    #[test]
    fn test_load_profiles_rejects_reversed_brackets() {
        let mut next = TaxProfile::norway_2025();
        next.year = 2026;
        next.bracket_tax.reverse();
        let json = serde_json::to_string(&vec![next]).unwrap();
        let path = temp_file("reversed.json", &json);
        let err = load_profiles(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::UnsortedBrackets { field: "bracket_tax", year: 2026 })
        ));
    }

    #[test]
    fn test_unknown_income_type_is_invalid_input() {
        let path = temp_file("dividend.json", r#"{ "tax": { "income_type": "dividend" } }"#);
        let err = load_params(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(err.is_invalid_input());
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::UnsupportedIncomeType(ref name)) if name == "dividend"
        ));
    }

    #[test]
    fn test_known_income_type_loads() {
        let path = temp_file("pension.json", r#"{ "tax": { "income_type": "pension" } }"#);
        let params = load_params(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(params.tax.income_type, IncomeType::Pension);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_params("/nonexistent/params.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let path = temp_file("bad.json", "{ not json");
        let err = load_params(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Error::Json(_)));
    }
}
