use cellstack::engine::config::Constraints;
use std::path::PathBuf;

#[derive(Debug)]
pub struct AppConfig {
    /// Catalog locations in the order given; may contain blank entries.
    pub sources: Vec<String>,
    pub output: Option<PathBuf>,
    pub constraints: Constraints,
}
