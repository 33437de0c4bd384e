//! Core use-case services.
//!
//! # Responsibility
//! - `store_service`: document load/save and the create/replace use-cases.
//! - `responder`: keyword rules answering chat messages.
//!
//! Both stay presentation-agnostic: plain values in, plain values out.

pub mod responder;
pub mod store_service;
