//! Presentation-convenience services
//!
//! Everything here is pure display plumbing over rows already fetched from
//! the backend: in-memory filtering, hierarchical grouping, order-number
//! defaults, duration/percent formatting, form validation and the snapshot
//! cache that preserves the previous rows when a refetch fails.

pub mod filter;
pub mod format;
pub mod grouping;
pub mod listing;
pub mod ordering;
pub mod validate;

pub use listing::{ScreenOutcome, SnapshotStore};
