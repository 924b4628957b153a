//! Data models for Easel
//!
//! This module contains the payload models used throughout the application:
//! draw commands, filter requests, and the validation machinery behind them.

pub mod error;
pub mod event;
pub mod validation;

// Re-export commonly used types
pub use error::{ValidationError, ValidationErrorKind, ValidationErrors};
pub use event::{DrawCommand, FilterRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_exports() {
        // Ensure all key types are accessible
        let _command = DrawCommand::from_value(json!({"x": 1})).expect("valid command");
        let _error = ValidationError::new(ValidationErrorKind::RequiredField, "test");
        let _errors = ValidationErrors::new();
    }
}
