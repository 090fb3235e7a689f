//! Constants and field validation for the AKN engine.
//!
//! Holds the recognised Akoma Ntoso namespaces, default values used when
//! constructing identifiers, and validators for the low-level URI fields.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AknError, Result};

/// Akoma Ntoso 3.0 namespace (preferred).
pub const AKN_NAMESPACE_30: &str = "http://docs.oasis-open.org/legaldocml/ns/akn/3.0";

/// Akoma Ntoso 2.0 namespace (legacy).
pub const AKN_NAMESPACE_20: &str = "http://www.akomantoso.org/2.0";

/// Recognised namespaces, in order of preference.
pub const AKN_NAMESPACES: [&str; 2] = [AKN_NAMESPACE_30, AKN_NAMESPACE_20];

/// Default expression language for identifiers that don't carry one.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default URI prefix.
pub const DEFAULT_PREFIX: &str = "akn";

/// Default name for the main (unnamed) component during propagation.
pub const DEFAULT_COMPONENT: &str = "main";

/// Placeholder date for metadata elements that require one.
pub const NULL_DATE: &str = "0001-01-01";

/// Pattern for country codes: exactly two lowercase letters.
static COUNTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}$").expect("valid regex"));

/// Pattern for language codes: exactly three lowercase letters.
static LANGUAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}$").expect("valid regex"));

/// Pattern for work dates: YYYY, YYYY-MM or YYYY-MM-DD.
static WORK_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}(-[0-9]{2}(-[0-9]{2})?)?$").expect("valid regex"));

/// Validate a two-letter country code.
///
/// # Errors
///
/// Returns `AknError::InvalidField` if the code is not exactly two
/// lowercase ASCII letters.
pub fn validate_country(value: &str) -> Result<()> {
    if COUNTRY_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(AknError::InvalidField {
            field: "country",
            value: value.to_string(),
            expected: "two lowercase letters (e.g. za)",
        })
    }
}

/// Validate a three-letter language code.
///
/// # Errors
///
/// Returns `AknError::InvalidField` if the code is not exactly three
/// lowercase ASCII letters.
pub fn validate_language(value: &str) -> Result<()> {
    if LANGUAGE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(AknError::InvalidField {
            field: "language",
            value: value.to_string(),
            expected: "three lowercase letters (e.g. eng)",
        })
    }
}

/// Validate a work date: a year with optional month and day parts.
///
/// # Errors
///
/// Returns `AknError::InvalidField` if the date is not YYYY, YYYY-MM or
/// YYYY-MM-DD.
pub fn validate_work_date(value: &str) -> Result<()> {
    if WORK_DATE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(AknError::InvalidField {
            field: "date",
            value: value.to_string(),
            expected: "YYYY, YYYY-MM or YYYY-MM-DD",
        })
    }
}
