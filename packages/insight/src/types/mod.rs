//! Domain data types for the scoring pipeline.

pub mod config;
pub mod deficiency;
pub mod features;
pub mod listing;
pub mod prediction;
pub mod result;
