//! CLI library components for the dataset matcher.

pub mod logging;
pub mod pipeline;
