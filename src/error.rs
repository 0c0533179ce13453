//! Structured error types for Vellum.
//!
//! Drawing never fails. Errors only come from the edges of the system: parsing
//! a scene description and registering custom fonts.

use thiserror::Error;

/// The unified error type returned by the public loading API.
#[derive(Debug, Error)]
pub enum VellumError {
    /// JSON input failed to parse as a valid scene.
    #[error("Failed to parse scene: {source}{}", format_hint(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// A custom font could not be decoded or parsed.
    #[error("Font error: {0}")]
    FontError(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for VellumError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the scene schema. Check node `kind.type` tags and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        VellumError::ParseError { source: e, hint }
    }
}
