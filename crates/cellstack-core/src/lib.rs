//! # CellStack Core Library
//!
//! Evaluates catalogs of battery-cell datasheets and proposes the best physical
//! stacking configurations for a given envelope and thickness window.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`CellRecord`,
//!   `StackConfiguration`) and tabular I/O (catalog parsing, result export).
//!
//! - **[`engine`]: The Logic Core.** Run constraints, the pure configuration deriver,
//!   the concurrent source ingestion coordinator and the bounded top-K selector.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a single
//!   entry point that scans every source and returns the ranked configurations.

pub mod core;
pub mod engine;
pub mod workflows;
