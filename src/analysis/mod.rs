//! Analysis modules.
//!
//! Aggregation of callback log events into run statistics.

pub mod aggregator;

pub use aggregator::*;
