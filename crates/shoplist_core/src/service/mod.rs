//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and scheduler calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod shopping_service;
