//! Order number validation.
//!
//! An order number is a string of ASCII digits whose last digit is a mod-10
//! (Luhn) check digit. Validation is pure and performs no I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest order number accepted; matches the storage column width.
pub const ORDER_NUMBER_MAX_LEN: usize = 64;

/// Reasons an order number is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderNumberError {
    /// The input was empty.
    #[error("order number must not be empty")]
    Empty,
    /// The input exceeded [`ORDER_NUMBER_MAX_LEN`] characters.
    #[error("order number must be at most {max} digits")]
    TooLong { max: usize },
    /// The input contained something other than `0`-`9`.
    #[error("order number must contain digits only")]
    NonDigit,
    /// The check digit did not match.
    #[error("order number fails the check digit test")]
    ChecksumMismatch,
}

/// A syntactically valid order number with a correct check digit.
///
/// # Examples
/// ```
/// use loyalty_backend::domain::OrderNumber;
///
/// assert!(OrderNumber::parse("79927398713").is_ok());
/// assert!(OrderNumber::parse("79927398714").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Validate `raw` and wrap it.
    ///
    /// Whitespace is not trimmed; callers decide whether surrounding blanks
    /// are part of the transport framing.
    pub fn parse(raw: &str) -> Result<Self, OrderNumberError> {
        validate(raw)?;
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the digit string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

/// Return `true` when `raw` is a non-empty digit string with a valid check digit.
pub fn is_valid_order_number(raw: &str) -> bool {
    validate(raw).is_ok()
}

/// Compute the digit that, appended to `payload`, yields a valid order number.
///
/// Returns `None` when `payload` contains anything but ASCII digits.
///
/// # Examples
/// ```
/// use loyalty_backend::domain::{is_valid_order_number, luhn_check_digit};
///
/// let digit = luhn_check_digit("7992739871").expect("digits only");
/// assert_eq!(digit, 3);
/// assert!(is_valid_order_number("79927398713"));
/// ```
pub fn luhn_check_digit(payload: &str) -> Option<u32> {
    let digits = digits_of(payload)?;
    // The check digit will occupy the rightmost slot, so the payload's
    // rightmost digit is the first one to double.
    let total = luhn_total(&digits, true);
    Some((10 - total % 10) % 10)
}

fn validate(raw: &str) -> Result<(), OrderNumberError> {
    if raw.is_empty() {
        return Err(OrderNumberError::Empty);
    }
    if raw.len() > ORDER_NUMBER_MAX_LEN {
        return Err(OrderNumberError::TooLong {
            max: ORDER_NUMBER_MAX_LEN,
        });
    }
    let digits = digits_of(raw).ok_or(OrderNumberError::NonDigit)?;
    if luhn_total(&digits, false) % 10 == 0 {
        Ok(())
    } else {
        Err(OrderNumberError::ChecksumMismatch)
    }
}

fn digits_of(raw: &str) -> Option<Vec<u32>> {
    raw.chars()
        .map(|c| if c.is_ascii_digit() { c.to_digit(10) } else { None })
        .collect()
}

fn luhn_total(digits: &[u32], double_rightmost: bool) -> u32 {
    digits
        .iter()
        .rev()
        .zip([double_rightmost, !double_rightmost].into_iter().cycle())
        .map(|(&digit, double)| {
            if double {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    /// Straightforward textbook implementation used as an oracle.
    fn reference_luhn(raw: &str) -> bool {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let mut sum = 0;
        for (index, byte) in raw.bytes().rev().enumerate() {
            let mut digit = u32::from(byte - b'0');
            if index % 2 == 1 {
                digit *= 2;
                if digit > 9 {
                    digit -= 9;
                }
            }
            sum += digit;
        }
        sum % 10 == 0
    }

    #[rstest]
    #[case("79927398713", true)]
    #[case("79927398714", false)]
    #[case("4561261212345467", true)]
    #[case("4561261212345464", false)]
    #[case("12345678903", true)]
    #[case("0", true)]
    #[case("00", true)]
    #[case("1", false)]
    #[case("18", true)]
    fn validates_known_numbers(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_valid_order_number(raw), expected);
    }

    #[rstest]
    #[case("", OrderNumberError::Empty)]
    #[case("7992 7398713", OrderNumberError::NonDigit)]
    #[case(" 79927398713", OrderNumberError::NonDigit)]
    #[case("79927398713\n", OrderNumberError::NonDigit)]
    #[case("-79927398713", OrderNumberError::NonDigit)]
    #[case("７９９２７３９８７１３", OrderNumberError::NonDigit)]
    #[case("79927398714", OrderNumberError::ChecksumMismatch)]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: OrderNumberError) {
        assert_eq!(OrderNumber::parse(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong_input() {
        let raw = "0".repeat(ORDER_NUMBER_MAX_LEN + 1);
        assert_eq!(
            OrderNumber::parse(&raw),
            Err(OrderNumberError::TooLong {
                max: ORDER_NUMBER_MAX_LEN
            })
        );
    }

    #[test]
    fn agrees_with_reference_over_generated_inputs() {
        // Deterministic LCG keeps the sweep reproducible without extra crates.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..2_000 {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let len = usize::try_from(state % 19).expect("small length") + 1;
            let raw: String = (0..len)
                .map(|offset| {
                    let shifted = state.rotate_left(u32::try_from(offset * 3).expect("small"));
                    char::from(b'0' + u8::try_from(shifted % 10).expect("single digit"))
                })
                .collect();
            assert_eq!(
                is_valid_order_number(&raw),
                reference_luhn(&raw),
                "disagreement on {raw}"
            );
        }
    }

    #[rstest]
    #[case("7992739871")]
    #[case("456126121234546")]
    #[case("1")]
    #[case("")]
    #[case("9999999999999999")]
    fn appending_check_digit_always_validates(#[case] payload: &str) {
        let digit = luhn_check_digit(payload).expect("payload is digits");
        let candidate = format!("{payload}{digit}");
        assert!(is_valid_order_number(&candidate), "{candidate} should validate");
    }

    #[test]
    fn check_digit_rejects_non_digits() {
        assert!(luhn_check_digit("12a4").is_none());
    }

    #[test]
    fn deserialisation_validates() {
        let ok: OrderNumber = serde_json::from_str("\"79927398713\"").expect("valid number");
        assert_eq!(ok.as_str(), "79927398713");
        assert!(serde_json::from_str::<OrderNumber>("\"79927398714\"").is_err());
    }
}
