//! Strict `DD/MM/YYYY` issue dates.

use chrono::NaiveDate;

use super::error::FaturaError;

/// Display/serialization format of an issue date.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `DD/MM/YYYY` date.
///
/// Day and month take one or two digits, the year exactly four. Dates that
/// don't exist on the calendar (31/02, 29/02 outside leap years) are rejected.
pub fn parse_issue_date(input: &str) -> Result<NaiveDate, FaturaError> {
    let input = input.trim();
    let invalid = || FaturaError::Format(format!("invalid date '{input}', expected DD/MM/YYYY"));

    let parts: Vec<&str> = input.split('/').collect();
    let &[day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 1, 2) || !digits(month, 1, 2) || !digits(year, 4, 4) {
        return Err(invalid());
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Format a date as zero-padded `DD/MM/YYYY`.
pub fn format_issue_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_padded_and_unpadded() {
        assert_eq!(parse_issue_date("05/01/2024").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_issue_date("5/1/2024").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_issue_date(" 31/12/1999 ").unwrap(), date(1999, 12, 31));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_issue_date("31/02/2024").is_err());
        assert!(parse_issue_date("29/02/2023").is_err());
        assert!(parse_issue_date("00/01/2024").is_err());
        assert!(parse_issue_date("01/13/2024").is_err());
    }

    #[test]
    fn leap_day() {
        assert_eq!(parse_issue_date("29/02/2024").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn rejects_wrong_shape() {
        for input in ["", "2024-01-05", "05/01/24", "05/01/02024", "05/01", "a/b/cdef", "05/01/2024/1", "+5/01/2024"] {
            assert!(parse_issue_date(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn format_is_zero_padded() {
        assert_eq!(format_issue_date(date(2024, 1, 5)), "05/01/2024");
        assert_eq!(format_issue_date(date(987, 3, 9)), "09/03/0987");
    }
}
