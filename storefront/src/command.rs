//! Argument checks shared by facade commands.
//!
//! A rejected command logs a warning and returns the error; nothing is
//! dispatched.

use storefront_core::error::ValidationError;

/// Reject blank `value`
pub(crate) fn require(
    operation: &'static str,
    argument: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    ValidationError::require(operation, argument, value).inspect_err(rejected)
}

/// Reject an empty list
pub(crate) fn require_any<T>(
    operation: &'static str,
    argument: &'static str,
    values: &[T],
) -> Result<(), ValidationError> {
    if values.is_empty() {
        let error = ValidationError::missing(operation, argument);
        rejected(&error);
        Err(error)
    } else {
        Ok(())
    }
}

/// Reject a value failing `check`, with `reason` as explanation
pub(crate) fn ensure(
    operation: &'static str,
    argument: &'static str,
    check: bool,
    reason: &str,
) -> Result<(), ValidationError> {
    if check {
        Ok(())
    } else {
        let error = ValidationError::InvalidArgument {
            operation,
            argument,
            reason: reason.to_string(),
        };
        rejected(&error);
        Err(error)
    }
}

fn rejected(error: &ValidationError) {
    tracing::warn!(%error, "Command rejected");
}
