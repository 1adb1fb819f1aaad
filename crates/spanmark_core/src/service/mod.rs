//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, resolver and compositor into session-level APIs.
//! - Keep UI/FFI layers decoupled from storage and composition details.

pub mod annotation_service;
pub mod highlighting;
