use chrono::{Datelike, NaiveDate};

use super::error::ValidationError;
use super::region::Region;

/// Minimum length of a customer name.
pub const MIN_NAME_LEN: usize = 2;

/// Exact number of digits in a tax id (NIF).
pub const TAX_ID_LEN: usize = 9;

/// Whether a name is at least two characters of letters and spaces.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LEN && name.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// Whether a tax id is exactly nine ASCII digits.
pub fn is_valid_tax_id(tax_id: &str) -> bool {
    tax_id.len() == TAX_ID_LEN && tax_id.chars().all(|c| c.is_ascii_digit())
}

/// Validate the fields of a new or edited customer.
/// Returns all validation errors found (not just the first).
///
/// Tax id uniqueness is a ledger concern and is checked there.
pub fn validate_customer(name: &str, tax_id: &str, region: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_valid_name(name.trim()) {
        errors.push(ValidationError::new(
            "customer.name",
            format!("'{name}' must be at least {MIN_NAME_LEN} characters of letters and spaces"),
        ));
    }

    if !is_valid_tax_id(tax_id.trim()) {
        errors.push(ValidationError::new(
            "customer.tax_id",
            format!("'{tax_id}' must contain exactly {TAX_ID_LEN} digits"),
        ));
    }

    if Region::from_name(region).is_none() {
        errors.push(ValidationError::new(
            "customer.region",
            format!("'{region}' is not one of Continente, Madeira, Açores"),
        ));
    }

    errors
}

/// Validate an issue date against an accepted year range (inclusive).
pub fn validate_issue_year(
    date: NaiveDate,
    earliest_year: i32,
    latest_year: i32,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let year = date.year();
    if year < earliest_year || year > latest_year {
        errors.push(ValidationError::new(
            "invoice.issue_date",
            format!("year {year} outside the allowed range {earliest_year}..={latest_year}"),
        ));
    }
    errors
}
