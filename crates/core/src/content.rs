//! Validation for the editable content fields of tenders and bids.
//!
//! A patch payload is a set of optional fields; absent fields are left
//! unchanged by the version store, so only present values are validated.

use crate::error::CoreError;

/// Maximum length of an entity name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an entity description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validate an entity name (non-empty, length-capped).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an entity description (length-capped, may be empty).
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a tender service type (non-empty, length-capped).
pub fn validate_service_type(service_type: &str) -> Result<(), CoreError> {
    if service_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "Service type must not be empty".into(),
        ));
    }
    if service_type.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Service type must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_valid() {
        assert!(validate_name("Office renovation").is_ok());
    }

    #[test]
    fn name_empty_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn name_too_long_rejected() {
        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name(&long).is_err());
    }

    #[test]
    fn description_empty_is_fine() {
        assert!(validate_description("").is_ok());
    }

    #[test]
    fn description_too_long_rejected() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_description(&long).is_err());
    }

    #[test]
    fn service_type_empty_rejected() {
        assert!(validate_service_type("").is_err());
        assert!(validate_service_type("Construction").is_ok());
    }
}
