//! Domain model structs.
//!
//! Each submodule contains a `FromRow` row struct matching the database row
//! and its conversion into the engine's domain type.

pub mod document;
pub mod document_version;
