//! Configuration traits and validation.

pub mod traits;
pub mod validation;

pub use traits::{parse_value, TrellisConfig};
pub use validation::{ConfigValidationError, ConfigValidator, ValidationResult};
