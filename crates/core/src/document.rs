//! Compliance document constants and validation.
//!
//! Documents own exactly one version lineage. These checks run before any
//! document or version row is written.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a document name.
pub const MAX_DOCUMENT_NAME_LENGTH: usize = 200;

/// Maximum allowed length for a document type label.
pub const MAX_DOCUMENT_TYPE_LENGTH: usize = 100;

/// Default upper bound on the serialized size of a version content snapshot.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a document name: must be non-empty, trimmed, and within
/// [`MAX_DOCUMENT_NAME_LENGTH`].
pub fn validate_document_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Document name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Document name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.chars().count() > MAX_DOCUMENT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Document name must not exceed {MAX_DOCUMENT_NAME_LENGTH} characters, got {}",
            name.chars().count()
        )));
    }
    Ok(())
}

/// Validate a document type label: non-empty and within
/// [`MAX_DOCUMENT_TYPE_LENGTH`].
pub fn validate_document_type(document_type: &str) -> Result<(), CoreError> {
    if document_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "Document type must not be empty".to_string(),
        ));
    }
    if document_type.chars().count() > MAX_DOCUMENT_TYPE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Document type must not exceed {MAX_DOCUMENT_TYPE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a version content snapshot.
///
/// Content is opaque to the engine, but it must be a JSON object and its
/// serialized form must fit within `max_bytes`.
pub fn validate_content(content: &serde_json::Value, max_bytes: usize) -> Result<(), CoreError> {
    if !content.is_object() {
        return Err(CoreError::Validation(
            "Version content must be a JSON object".to_string(),
        ));
    }
    let size = serde_json::to_vec(content)
        .map_err(|e| CoreError::Validation(format!("Version content is not serializable: {e}")))?
        .len();
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Version content is {size} bytes, maximum is {max_bytes}"
        )));
    }
    Ok(())
}
