//! Result type alias for dumpkit

use super::errors::DumpError;

/// Result type alias for dumpkit operations
///
/// # Examples
///
/// ```
/// use dumpkit::domain::result::Result;
/// use dumpkit::domain::errors::DumpError;
///
/// fn failing_function() -> Result<()> {
///     Err(DumpError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DumpError>;

#[cfg(test)]
mod tests {
    use super::*;

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
