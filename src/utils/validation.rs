use crate::utils::error::{PredictorError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PredictorError::Config {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PredictorError::Config {
            field: field_name.to_string(),
            message: format!("Path '{}' contains null bytes", path.escape_default()),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PredictorError::Config {
            field: field_name.to_string(),
            message: format!("Value {} must be at least {}", value, min_value),
        });
    }
    Ok(())
}

/// Port 0 would bind an ephemeral port nobody can find.
pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(PredictorError::Config {
            field: field_name.to_string(),
            message: "Port must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

/// Inclusive range check for request fields.
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PredictorError::validation(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PredictorError::validation(
            field_name,
            "Value must be a finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("artifact_path", "models/titanic_model.json").is_ok());
        assert!(validate_path("artifact_path", "").is_err());
        assert!(validate_path("artifact_path", "   ").is_err());
        assert!(validate_path("artifact_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("n_estimators", 100, 1).is_ok());
        assert!(validate_positive_number("n_estimators", 0, 1).is_err());
    }

    #[test]
    fn test_validate_port() {
        assert!(validate_port("port", 8000).is_ok());
        assert!(validate_port("port", 65535).is_ok());
        let err = validate_port("port", 0).unwrap_err();
        assert!(matches!(err, PredictorError::Config { ref field, .. } if field == "port"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("Pclass", 1, 1, 3).is_ok());
        assert!(validate_range("Pclass", 3, 1, 3).is_ok());
        let err = validate_range("Pclass", 4, 1, 3).unwrap_err();
        assert!(err.is_client_error());
        assert!(validate_range("Age", -0.5, 0.0, 150.0).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("Fare", 7.25).is_ok());
        assert!(validate_finite("Fare", f64::NAN).is_err());
        assert!(validate_finite("Fare", f64::INFINITY).is_err());
    }
}
