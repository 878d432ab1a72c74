//! Provides input/output functionality for the tabular files used by a run.
//!
//! Cell catalogs are read lazily, one record at a time, so large sources never need to be
//! held in memory. Ranked configurations are written back out with a fixed header order.

pub mod catalog;
pub mod report;
