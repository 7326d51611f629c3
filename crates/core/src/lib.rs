//! Domain types and the document version lineage engine.
//!
//! This crate has no database or HTTP dependencies. Persistence is reached
//! through the [`lineage::store::VersionStore`] trait, implemented by
//! `docvault-db` for Postgres and by [`lineage::memory::MemoryVersionStore`]
//! for tests and local tooling.

pub mod document;
pub mod error;
pub mod lineage;
pub mod types;
