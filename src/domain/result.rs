//! Result type alias for paramsweep
//!
//! This module provides a convenient Result type alias that uses SweepError
//! as the error type.

use super::errors::SweepError;

/// Result type alias for paramsweep operations
///
/// # Examples
///
/// ```
/// use paramsweep::domain::result::Result;
/// use paramsweep::domain::errors::SweepError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SweepError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SweepError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SweepError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
