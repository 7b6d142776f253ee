//! Input validation and normalization.

use time::{OffsetDateTime, Time};

use crate::domain::error::DomainError;

/// Trim a title and check it is non-empty and at most `max` characters.
///
/// # Errors
/// [`DomainError::Validation`] on an empty or overlong title.
pub fn validate_title(field: &str, title: &str, max: usize) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("too long: {len} characters (max: {max})"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Accept `#RRGGBB` and return it lowercased.
///
/// # Errors
/// [`DomainError::Validation`] if the value is not a six-digit hex color.
pub fn normalize_color(color: &str) -> Result<String, DomainError> {
    let hex = color
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.bytes().all(|b| b.is_ascii_hexdigit()));
    match hex {
        Some(h) => Ok(format!("#{}", h.to_ascii_lowercase())),
        None => Err(DomainError::validation(
            "color",
            format!("'{color}' is not a #RRGGBB color"),
        )),
    }
}

/// Minimal structural email check: one `@`, a local part, a dotted domain.
///
/// # Errors
/// [`DomainError::Validation`] if the address is malformed.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    let invalid = || DomainError::validation("email", format!("'{email}' is not a valid email"));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(email.to_ascii_lowercase())
}

/// `ends_at` must be after `starts_at`. All-day events must start and end
/// at midnight, so they always cover whole days.
///
/// # Errors
/// [`DomainError::Validation`] on an empty, inverted or misaligned range.
pub fn validate_time_range(
    starts_at: OffsetDateTime,
    ends_at: OffsetDateTime,
    all_day: bool,
) -> Result<(), DomainError> {
    if ends_at <= starts_at {
        return Err(DomainError::validation("ends_at", "must be after starts_at"));
    }
    if all_day && (starts_at.time() != Time::MIDNIGHT || ends_at.time() != Time::MIDNIGHT) {
        return Err(DomainError::validation(
            "all_day",
            "all-day events must start and end at midnight",
        ));
    }
    Ok(())
}

/// Only `image/*` uploads are accepted.
///
/// # Errors
/// [`DomainError::Validation`] for any other media type.
pub fn validate_image_mime(mime_type: &str) -> Result<String, DomainError> {
    let mime = mime_type.trim().to_ascii_lowercase();
    match mime.strip_prefix("image/") {
        Some(subtype) if !subtype.is_empty() => Ok(mime),
        _ => Err(DomainError::validation(
            "mime_type",
            format!("'{mime_type}' is not an image type"),
        )),
    }
}

/// Empty or whitespace-only optional text collapses to `None`.
#[must_use]
pub fn normalize_optional(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}
