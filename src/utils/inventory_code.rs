//! Inventory-number generation and parsing
//!
//! Inventory numbers follow the fixed format `{company}-{device_type}/{seq}`,
//! e.g. `WWP-01/0030`: a three-letter company code, a two-digit device-type
//! code and a zero-padded four-digit sequence scoped to that prefix. The
//! sequence caps out at 9999 per prefix.

use once_cell::sync::Lazy;
use regex::Regex;

/// Highest sequence number a single `{company}-{device_type}` prefix can hold
pub const MAX_SEQUENCE: u32 = 9999;

/// Regex for a complete inventory number, e.g. `WWP-01/0030`
static INVENTORY_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}-[0-9]{2}/[0-9]{4}$").unwrap());

/// Validate a full inventory number
pub fn validate_inventory_number(code: &str) -> bool {
    INVENTORY_NUMBER_REGEX.is_match(code)
}

/// Prefix shared by all assets of one company/device-type pair, e.g. `WWP-01/`
pub fn code_prefix(company_code: &str, device_type_code: &str) -> String {
    format!("{}-{}/", company_code, device_type_code)
}

/// Render an inventory number from its parts
pub fn format_code(company_code: &str, device_type_code: &str, sequence: u32) -> String {
    format!("{}-{}/{:04}", company_code, device_type_code, sequence)
}

/// Extract the numeric sequence from an inventory number, if well-formed
pub fn sequence_of(code: &str) -> Option<u32> {
    let tail = code.rsplit('/').next()?;
    if tail.len() != 4 {
        return None;
    }
    tail.parse().ok()
}

/// Next free sequence given the codes already issued under one prefix.
/// Returns `None` when the prefix capacity is exhausted.
pub fn next_sequence<'a, I>(existing: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(sequence_of)
        .max()
        .unwrap_or(0);

    let next = max + 1;
    if next > MAX_SEQUENCE {
        None
    } else {
        Some(next)
    }
}
