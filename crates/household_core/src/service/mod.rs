//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate schema validation and store calls into use-case APIs.
//! - Return every outcome as a response `Envelope`.
//! - Keep transport layers decoupled from storage details.

pub mod collection_service;
pub mod household_service;
