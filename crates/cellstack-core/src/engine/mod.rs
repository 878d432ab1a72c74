//! # Engine Module
//!
//! Turns catalog sources into a ranked list of stack configurations.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Envelope, thickness window and result count of a run
//! - **Derivation** ([`derive`]) - Pure mapping from one cell record to its best stack
//! - **Ingestion** ([`ingest`]) - Concurrent scanning of all sources into one lazy stream
//! - **Selection** ([`select`]) - Bounded top-K ranking over that stream
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Any failure while scanning a source aborts the whole run; a ranking computed from an
//! incomplete set of sources is never returned.

pub mod config;
pub mod derive;
pub mod error;
pub mod ingest;
pub mod progress;
pub mod select;
