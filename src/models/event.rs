//! Payload models for Easel
//!
//! This module defines the records that flow through the API: draw commands
//! appended to a room's event log, and filter requests routed through the
//! transform registry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use super::validation::{extract_byte_array, extract_dimension, extract_name, require_field};

/// A single draw command submitted by a client
///
/// Commands are structured-but-open records: any well-formed JSON object is
/// accepted and stored verbatim, in append order. Nothing inspects the fields
/// beyond the object check; geometry conventions live entirely in the clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawCommand(Map<String, Value>);

impl DrawCommand {
    /// Parse a draw command from a request body
    ///
    /// The only structural requirement is that the payload is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(DrawCommand(fields)),
            _ => Err(ValidationError::new(
                ValidationErrorKind::NotAnObject,
                "body",
            )),
        }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of fields in the command
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the command has no fields
    ///
    /// An empty object is still a valid command.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DrawCommand> for Value {
    fn from(command: DrawCommand) -> Self {
        Value::Object(command.0)
    }
}

/// A request to run a named transform over an image payload
///
/// `width * height` is deliberately not checked against `image_data.len()`
/// here; only a concrete transform implementation knows its pixel layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Raw image bytes
    pub image_data: Vec<u8>,

    /// Declared image width in pixels
    pub width: u32,

    /// Declared image height in pixels
    pub height: u32,

    /// Name of the transform to apply
    pub filter_name: String,
}

impl FilterRequest {
    /// Parse a filter request from a request body
    ///
    /// All structural problems are collected and reported together, before
    /// any work is dispatched.
    pub fn from_value(value: Value) -> Result<Self, ValidationErrors> {
        let obj = match value {
            Value::Object(fields) => fields,
            _ => {
                return Err(
                    ValidationError::new(ValidationErrorKind::NotAnObject, "body").into(),
                )
            },
        };

        let mut errors = ValidationErrors::new();

        let image_data = require_field(&obj, "image_data")
            .and_then(|v| extract_byte_array(v, "image_data"))
            .map_err(|e| errors.add(e))
            .ok();

        let width = require_field(&obj, "width")
            .and_then(|v| extract_dimension(v, "width"))
            .map_err(|e| errors.add(e))
            .ok();

        let height = require_field(&obj, "height")
            .and_then(|v| extract_dimension(v, "height"))
            .map_err(|e| errors.add(e))
            .ok();

        let filter_name = require_field(&obj, "filter_name")
            .and_then(|v| extract_name(v, "filter_name"))
            .map_err(|e| errors.add(e))
            .ok();

        match (image_data, width, height, filter_name) {
            (Some(image_data), Some(width), Some(height), Some(filter_name))
                if errors.is_empty() =>
            {
                Ok(FilterRequest {
                    image_data,
                    width,
                    height,
                    filter_name,
                })
            },
            _ => Err(errors),
        }
    }
}
