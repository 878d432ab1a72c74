//! # Workflows Module
//!
//! High-level entry points for users of the library. A workflow takes validated run
//! parameters, drives the engine from first source read to final ranking, reports progress
//! along the way and returns a finished result or the error that aborted the run.
//!
//! - **Generation Workflow** ([`generate`]) - Scans every catalog source and returns the
//!   top-K stack configurations.

pub mod generate;
