//! Repository layer: where the serialized document lives.
//!
//! # Responsibility
//! - Define the `DocumentRepository` storage seam.
//! - Provide file, SQLite and in-memory implementations.
//!
//! # Invariants
//! - Repositories never parse the document; schema handling belongs to the
//!   store service.

pub mod document_repo;
pub mod file_repo;
pub mod memory_repo;
pub mod sqlite_repo;
