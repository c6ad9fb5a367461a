//! Rolling aggregation over entry collections.
//!
//! # Responsibility
//! - Derive chart series, streaks and summary figures from entries.
//!
//! # Invariants
//! - Every function is pure: output depends only on its arguments, nothing
//!   is cached between calls.
//! - Timestamps become calendar days only through `Entry::local_date`.

pub mod dashboard;
pub mod streak;
pub mod summary;
pub mod window;
