//! Domain model for tracked entries and projects.
//!
//! # Responsibility
//! - Define canonical data structures used by store and aggregator logic.
//! - Keep one flat entry shape for all domain collections.
//!
//! # Invariants
//! - Every record is identified by a stable, clock-derived UUID.
//! - Timestamps are UTC; calendar-day views are derived, never stored.

pub mod domain;
pub mod entry;
pub mod project;
