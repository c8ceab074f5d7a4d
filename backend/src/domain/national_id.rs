//! Brazilian taxpayer number (CPF) value type.
//!
//! Input may carry any punctuation; only ASCII digits are kept. Eleven digits
//! are required, all-identical sequences are rejected and both trailing check
//! digits must match the weighted modulo-11 scheme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::Error;

/// Number of digits in a normalised national identifier.
pub const NATIONAL_ID_LENGTH: usize = 11;

/// Validation errors returned by [`NationalId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NationalIdValidationError {
    #[error("national id must not be empty")]
    Empty,
    #[error("national id must have {NATIONAL_ID_LENGTH} digits, got {length}")]
    InvalidLength { length: usize },
    #[error("national id must not repeat a single digit")]
    RepeatedDigits,
    #[error("national id check digits do not match: {input}")]
    ChecksumMismatch { input: String },
}

impl NationalIdValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_national_id",
            Self::InvalidLength { .. } => "national_id_length",
            Self::RepeatedDigits => "national_id_repeated_digits",
            Self::ChecksumMismatch { .. } => "national_id_checksum",
        }
    }
}

/// Validated national identifier stored as eleven digits.
///
/// Equality and hashing use the digit string, so `"123.456.789-09"` and
/// `"12345678909"` produce equal values.
///
/// # Examples
/// ```
/// use user_registry::domain::NationalId;
///
/// let id = NationalId::new("123.456.789-09").expect("valid national id");
/// assert_eq!(id.as_str(), "12345678909");
/// assert_eq!(id.formatted(), "123.456.789-09");
/// assert_eq!(id.masked(), "***.***.789-09");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Strip punctuation and validate the remaining digits.
    ///
    /// # Errors
    /// Returns a [`NationalIdValidationError`] describing the first rule the
    /// input breaks.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NationalIdValidationError> {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            return Err(NationalIdValidationError::Empty);
        }

        let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != NATIONAL_ID_LENGTH {
            return Err(NationalIdValidationError::InvalidLength {
                length: digits.len(),
            });
        }
        if digits.windows(2).all(|pair| pair[0] == pair[1]) {
            return Err(NationalIdValidationError::RepeatedDigits);
        }

        let first = check_digit(&digits[..9]);
        let second = check_digit(&digits[..10]);
        if digits[9] != first || digits[10] != second {
            return Err(NationalIdValidationError::ChecksumMismatch {
                input: raw.to_owned(),
            });
        }

        Ok(Self(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()))
    }

    /// Borrow the eleven-digit form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Render as `XXX.XXX.XXX-XX`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let v = &self.0;
        format!("{}.{}.{}-{}", &v[0..3], &v[3..6], &v[6..9], &v[9..11])
    }

    /// Render with the first six digits hidden, e.g. `***.***.789-09`.
    #[must_use]
    pub fn masked(&self) -> String {
        let v = &self.0;
        format!("***.***.{}-{}", &v[6..9], &v[9..11])
    }
}

/// Weighted modulo-11 check digit over `digits`.
///
/// Weights run from `digits.len() + 1` down to 2. A remainder-derived value of
/// 10 or 11 collapses to 0.
fn check_digit(digits: &[u32]) -> u32 {
    let top_weight = u32::try_from(digits.len()).unwrap_or(0) + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=top_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    match 11 - sum % 11 {
        d if d >= 10 => 0,
        d => d,
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for NationalId {
    type Err = NationalIdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NationalId {
    type Error = NationalIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NationalId> for String {
    fn from(value: NationalId) -> Self {
        value.0
    }
}

impl From<NationalIdValidationError> for Error {
    fn from(err: NationalIdValidationError) -> Self {
        Self::invalid_value(err.to_string()).with_details(json!({
            "field": "nationalId",
            "code": err.code(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123.456.789-09", "12345678909")]
    #[case("12345678909", "12345678909")]
    #[case(" 529.982.247-25 ", "52998224725")]
    #[case("111 444 777 35", "11144477735")]
    fn accepts_valid_numbers(#[case] raw: &str, #[case] digits: &str) {
        let id = NationalId::new(raw).expect("valid national id");
        assert_eq!(id.as_str(), digits);
    }

    #[rstest]
    #[case("", NationalIdValidationError::Empty)]
    #[case("   ", NationalIdValidationError::Empty)]
    #[case("123", NationalIdValidationError::InvalidLength { length: 3 })]
    #[case("123.456.789-091", NationalIdValidationError::InvalidLength { length: 12 })]
    #[case("abc", NationalIdValidationError::InvalidLength { length: 0 })]
    #[case("111.111.111-11", NationalIdValidationError::RepeatedDigits)]
    #[case("00000000000", NationalIdValidationError::RepeatedDigits)]
    #[case(
        "123.456.789-00",
        NationalIdValidationError::ChecksumMismatch { input: "123.456.789-00".to_owned() }
    )]
    #[case(
        "12345678919",
        NationalIdValidationError::ChecksumMismatch { input: "12345678919".to_owned() }
    )]
    fn rejects_invalid_numbers(#[case] raw: &str, #[case] expected: NationalIdValidationError) {
        assert_eq!(NationalId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_every_repeated_digit(
        #[values('0', '1', '2', '3', '4', '5', '6', '7', '8', '9')] digit: char,
    ) {
        let raw = digit.to_string().repeat(NATIONAL_ID_LENGTH);
        assert_eq!(
            NationalId::new(&raw),
            Err(NationalIdValidationError::RepeatedDigits)
        );
    }

    #[rstest]
    #[case("12345678909")]
    #[case("52998224725")]
    #[case("11144477735")]
    #[case("39053344705")]
    #[case("93541134780")]
    #[case("01234567890")]
    #[case("86288366757")]
    fn formatted_form_parses_back_to_the_same_value(#[case] digits: &str) {
        let id = NationalId::new(digits).expect("valid national id");
        let reparsed = NationalId::new(&id.formatted()).expect("formatted form is valid");
        assert_eq!(reparsed, id);
        assert_eq!(reparsed.as_str(), digits);
    }

    #[rstest]
    fn formats_and_masks() {
        let id = NationalId::new("52998224725").expect("valid national id");
        assert_eq!(id.formatted(), "529.982.247-25");
        assert_eq!(id.masked(), "***.***.247-25");
        assert_eq!(id.to_string(), "529.982.247-25");
    }

    #[rstest]
    fn punctuation_does_not_affect_equality() {
        let punctuated = NationalId::new("123.456.789-09").expect("valid national id");
        let bare = NationalId::new("12345678909").expect("valid national id");
        assert_eq!(punctuated, bare);
    }

    #[rstest]
    #[case(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 0)]
    #[case(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0], 9)]
    #[case(&[5, 2, 9, 9, 8, 2, 2, 4, 7], 2)]
    fn computes_check_digits(#[case] digits: &[u32], #[case] expected: u32) {
        assert_eq!(check_digit(digits), expected);
    }

    #[rstest]
    fn serialises_as_digits() {
        let id = NationalId::new("123.456.789-09").expect("valid national id");
        assert_eq!(
            serde_json::to_string(&id).expect("serialise"),
            "\"12345678909\""
        );
    }
}
