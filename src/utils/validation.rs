use crate::domain::services::arith::is_prime;
use crate::domain::services::exponents::parse_rational;
use crate::utils::error::{Result, VerifyError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// The root-count trichotomy only holds for an odd prime modulus.
pub fn validate_prime_modulus(field_name: &str, modulus: u64) -> Result<()> {
    validate_positive_number(field_name, modulus, 3)?;
    if !is_prime(modulus) {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: modulus.to_string(),
            reason: "Modulus must be prime".to_string(),
        });
    }
    Ok(())
}

pub fn validate_checkpoints(field_name: &str, checkpoints: &[u64]) -> Result<()> {
    if checkpoints.is_empty() {
        return Err(VerifyError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    // log D must be positive for the asymptotic column
    for &d in checkpoints {
        validate_positive_number(field_name, d, 2)?;
    }
    Ok(())
}

pub fn validate_rationals(field_name: &str, values: &[String]) -> Result<()> {
    for value in values {
        if parse_rational(value).is_none() {
            return Err(VerifyError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: "Expected a decimal (0.98) or a fraction (45/46)".to_string(),
            });
        }
    }
    Ok(())
}
