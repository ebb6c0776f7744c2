//! Field checks run before any gateway call.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::domain::{ContactType, NewContact};
use thiserror::Error;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ().-]*$").expect("phone pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all fields")]
    MissingFields,
    #[error("Invalid contact value for {contact_type}")]
    InvalidContactValue { contact_type: ContactType },
    #[error("Event group name is required")]
    MissingGroupName,
}

pub fn validate_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Accepts an optional leading `+` followed by digits, allowing spaces,
/// hyphens, dots and parentheses as separators.
pub fn validate_phone(value: &str) -> bool {
    let value = value.trim();
    if !PHONE_PATTERN.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

pub fn validate_contact(draft: &NewContact) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() || draft.value.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let valid = match draft.contact_type {
        ContactType::Email => validate_email(&draft.value),
        phone if phone.expects_phone_number() => validate_phone(&draft.value),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidContactValue {
            contact_type: draft.contact_type,
        })
    }
}

pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::MissingGroupName)
    } else {
        Ok(())
    }
}
