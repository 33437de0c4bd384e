//! Tracker domain model.
//!
//! # Responsibility
//! - Define the habit/item/schedule/profile records and their aggregate.
//! - Own field-level validation for create and replace paths.
//! - Decode stored records forgivingly (`lenient`).
//!
//! # Invariants
//! - The whole application state is one `Document`.
//! - Records carry no identity; collections keep insertion order.

pub mod document;
pub mod lenient;
