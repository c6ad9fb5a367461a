//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the CLI shell decoupled from storage details.

pub mod entry_service;
pub mod project_service;
