use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

const MAX_NAME_CHARS: usize = 30;

static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[016789]-?\d{3,4}-?\d{4}$").expect("valid regex"));
static SEOUL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^02-?\d{3,4}-?\d{4}$").expect("valid regex"));
static LANDLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[3-6]\d-?\d{3,4}-?\d{4}$").expect("valid regex"));

pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Name is required");
    }
    if name.chars().count() > MAX_NAME_CHARS {
        bail!("Name is longer than {} characters", MAX_NAME_CHARS);
    }
    Ok(name.to_string())
}

/// Accepts Korean mobile and landline numbers, hyphens optional, and returns
/// the hyphenated form. An empty phone is allowed.
pub fn validate_phone(phone: &str) -> Result<String> {
    let phone = phone.trim().replace(' ', "");
    if phone.is_empty() {
        return Ok(phone);
    }
    if !(MOBILE.is_match(&phone) || SEOUL.is_match(&phone) || LANDLINE.is_match(&phone)) {
        bail!("'{}' is not a valid phone number", phone);
    }
    Ok(format_phone(&phone))
}

/// Hyphenates a phone number by its digit count. Input that is not a
/// plausible number comes back unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let split = |a: usize, b: usize| {
        format!("{}-{}-{}", &digits[..a], &digits[a..a + b], &digits[a + b..])
    };

    match (digits.starts_with("02"), digits.len()) {
        (true, 9) => split(2, 3),
        (true, 10) => split(2, 4),
        (false, 10) => split(3, 3),
        (false, 11) => split(3, 4),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  김농부 ").unwrap(), "김농부");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"가".repeat(31)).is_err());
        assert!(validate_name(&"가".repeat(30)).is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("01012345678").unwrap(), "010-1234-5678");
        assert_eq!(validate_phone("010-123-4567").unwrap(), "010-123-4567");
        assert_eq!(validate_phone("061 470 2114").unwrap(), "061-470-2114");
        assert_eq!(validate_phone("0212345678").unwrap(), "02-1234-5678");
        assert_eq!(validate_phone("").unwrap(), "");
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("010-abcd-5678").is_err());
    }

    #[test]
    fn test_format_phone_passthrough() {
        assert_eq!(format_phone("1588-0000"), "1588-0000");
        assert_eq!(format_phone("029876543"), "02-987-6543");
    }
}
