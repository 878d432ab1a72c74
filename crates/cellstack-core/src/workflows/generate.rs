use crate::core::models::configuration::StackConfiguration;
use crate::engine::config::Constraints;
use crate::engine::error::EngineError;
use crate::engine::ingest::{self, SourceSummary};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::select;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Best configurations, highest score first.
    pub configurations: Vec<StackConfiguration>,
    pub sources: Vec<SourceSummary>,
    /// Configurations offered to the selector across all sources.
    pub candidates_considered: u64,
}

/// Scans every source under `constraints` and ranks the resulting configurations.
///
/// Ranking runs as configurations arrive, so the whole run is a single progress phase.
/// Any source failure aborts the run; no partial ranking is ever returned.
#[instrument(skip_all, name = "generation_workflow")]
pub fn run<S: AsRef<str>>(
    constraints: &Constraints,
    sources: &[S],
    reporter: &ProgressReporter,
) -> Result<GenerationResult, EngineError> {
    info!(
        max_width = constraints.max_width,
        max_length = constraints.max_length,
        from = constraints.thickness_range.from,
        to = constraints.thickness_range.to,
        top_k = constraints.top_k,
        "Starting configuration generation."
    );

    reporter.report(Progress::PhaseStart {
        name: "Scanning Sources",
    });

    let mut stream = ingest::ingest(constraints, sources, reporter);
    let configurations = select::try_select(constraints.top_k, stream.by_ref())?;
    let summaries = stream.summaries().to_vec();
    drop(stream);

    reporter.report(Progress::PhaseFinish);

    let candidates_considered: u64 = summaries.iter().map(|s| s.derived).sum();

    info!(
        sources = summaries.len(),
        candidates = candidates_considered,
        selected = configurations.len(),
        "Generation complete."
    );

    Ok(GenerationResult {
        configurations,
        sources: summaries,
        candidates_considered,
    })
}
