use crate::error::RegistryError;

/// Reject NaN and infinities before they become stored state.
pub fn finite(name: &str, value: f64) -> Result<(), RegistryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RegistryError::InvalidInput(format!(
            "{name} must be a finite number"
        )))
    }
}

/// Reject negative quantities. Production amounts are exempt: a
/// net-metering producer can legitimately draw from the grid.
pub fn non_negative(name: &str, value: f64) -> Result<(), RegistryError> {
    if value < 0.0 {
        Err(RegistryError::InvalidInput(format!(
            "{name} must be non-negative"
        )))
    } else {
        Ok(())
    }
}
