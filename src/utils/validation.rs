//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for validating company codes (three uppercase letters, e.g. `WWP`)
static COMPANY_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Regex for validating device-type codes (two digits, e.g. `01`)
static DEVICE_TYPE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}$").unwrap());

/// Validate a company code
pub fn validate_company_code(code: &str) -> bool {
    COMPANY_CODE_REGEX.is_match(code)
}

/// Validate a device-type code
pub fn validate_device_type_code(code: &str) -> bool {
    DEVICE_TYPE_CODE_REGEX.is_match(code)
}

/// Validate a phone number: digits with optional `+`, separators allowed
pub fn validate_phone(phone: &str) -> bool {
    if phone.len() < 3 || phone.len() > 32 {
        return false;
    }

    let mut digits = 0;
    for (i, c) in phone.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if i == 0 => {}
            ' ' | '-' | '(' | ')' => {}
            _ => return false,
        }
    }
    digits >= 3
}
