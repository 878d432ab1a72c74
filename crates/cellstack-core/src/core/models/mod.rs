//! Data models flowing through a generation run.
//!
//! A [`cell::CellRecord`] is produced for every row of a catalog source. The engine turns
//! qualifying records into [`configuration::StackConfiguration`] values, which are ranked
//! and handed to the exporter.

pub mod cell;
pub mod configuration;
