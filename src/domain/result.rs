//! Result type alias for Tilepack

use super::errors::TilepackError;

/// Result type alias for Tilepack operations
///
/// # Examples
///
/// ```
/// use tilepack::domain::result::Result;
/// use tilepack::domain::errors::TilepackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TilepackError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TilepackError>;
