//! # Core Module
//!
//! Fundamental building blocks shared by the engine: the data carried through a run
//! and the readers/writers for the tabular files at either end of it.
//!
//! - **Data Models** ([`models`]) - Raw cell records and derived stack configurations
//! - **File I/O** ([`io`]) - Cell catalog parsing and ranked result export

pub mod io;
pub mod models;
