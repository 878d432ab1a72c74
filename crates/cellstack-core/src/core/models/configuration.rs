use serde::Serialize;

/// Column order of an exported result file.
pub const EXPORT_HEADER: [&str; 7] = [
    "Product",
    "Total Capacity",
    "Individual Capacity",
    "Size",
    "Stacks",
    "Config Thickness",
    "Energy Density (Wh/cm³)",
];

/// A stack of identical cells that fits the run's envelope.
///
/// Field order matches [`EXPORT_HEADER`]; the serialized form is exactly one result row.
/// `score` only drives ranking and is never written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackConfiguration {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Total Capacity")]
    pub total_capacity: u64,
    #[serde(rename = "Individual Capacity")]
    pub individual_capacity: u64,
    /// `{width}x{length}x{thickness}` of one cell, each truncated.
    #[serde(rename = "Size")]
    pub size: String,
    /// Cell counts along width, length and thickness.
    #[serde(rename = "Stacks")]
    pub stacks: String,
    #[serde(rename = "Config Thickness")]
    pub config_thickness: u64,
    #[serde(rename = "Energy Density (Wh/cm³)")]
    pub energy_density: f64,
    #[serde(skip)]
    pub score: f64,
}

impl StackConfiguration {
    /// Ranking score: total stack capacity weighted by the (rounded) energy density.
    #[inline]
    pub fn compute_score(total_capacity: u64, energy_density: f64) -> f64 {
        total_capacity as f64 * energy_density
    }
}
