pub mod availability;
pub mod deliveries;
pub mod requests;

use chrono::{DateTime, Utc};

use crate::error::AppError;

pub(crate) fn validate_mobile(field: &str, mobile: &str) -> Result<(), AppError> {
    let digits = mobile.trim();
    if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{field} must be exactly 10 digits"
        )))
    }
}

/// Timestamps are only rejected when they fail to parse; a pickup time in
/// the past is allowed since admins routinely backdate adjustments.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| AppError::InvalidInput(format!("{field} is not a valid timestamp: {err}")))
}

pub(crate) fn validate_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::InvalidInput(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_timestamp, validate_mobile};

    #[test]
    fn ten_digit_mobiles_pass() {
        assert!(validate_mobile("customer_mobile", "9876543210").is_ok());
    }

    #[test]
    fn short_or_alphabetic_mobiles_fail() {
        assert!(validate_mobile("customer_mobile", "98765").is_err());
        assert!(validate_mobile("customer_mobile", "987654321x").is_err());
        assert!(validate_mobile("customer_mobile", "+919876543210").is_err());
    }

    #[test]
    fn past_timestamps_are_accepted() {
        assert!(parse_timestamp("pickup_time", "2020-01-01T08:00:00Z").is_ok());
    }

    #[test]
    fn unparseable_timestamps_are_rejected() {
        assert!(parse_timestamp("pickup_time", "tomorrow morning").is_err());
    }
}
