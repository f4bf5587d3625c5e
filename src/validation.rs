use crate::error::ApiError;

pub fn validate_latitude(operation: &'static str, value: f64) -> Result<f64, ApiError> {
    if value.is_finite() && (-90.0..=90.0).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::InvalidInput {
            operation,
            reason: format!("latitude must be between -90 and 90, got {value}"),
        })
    }
}

pub fn validate_longitude(operation: &'static str, value: f64) -> Result<f64, ApiError> {
    if value.is_finite() && (-180.0..=180.0).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::InvalidInput {
            operation,
            reason: format!("longitude must be between -180 and 180, got {value}"),
        })
    }
}

pub fn validate_distance(operation: &'static str, miles: f64) -> Result<f64, ApiError> {
    if miles.is_finite() && miles > 0.0 {
        Ok(miles)
    } else {
        Err(ApiError::InvalidInput {
            operation,
            reason: format!("distance must be a positive number of miles, got {miles}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude("t", 90.0).is_ok());
        assert!(validate_latitude("t", -90.0).is_ok());
        assert!(validate_latitude("t", 90.5).is_err());
        assert!(validate_latitude("t", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude("t", -97.70429793893).is_ok());
        assert!(validate_longitude("t", 180.1).is_err());
        assert!(validate_longitude("t", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_distance() {
        assert!(validate_distance("t", 0.1).is_ok());
        assert!(validate_distance("t", 0.0).is_err());
        assert!(validate_distance("t", -5.0).is_err());
    }
}
