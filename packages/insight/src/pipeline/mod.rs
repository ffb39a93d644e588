//! The scoring pipeline - the core of the library.
//!
//! Per listing: extract, predict, analyze, then generate. All four stages
//! are deterministic; the batch runner adds per-listing failure isolation
//! and persistence.

pub mod analyze;
pub mod batch;
pub mod extract;
pub mod recommend;

pub use analyze::analyze;
pub use batch::{score_batch, score_listing, BatchFailure, BatchReport};
pub use extract::extract;
pub use recommend::{generate, NO_ISSUES_TEXT, TEMPLATE_TABLE_VERSION};
