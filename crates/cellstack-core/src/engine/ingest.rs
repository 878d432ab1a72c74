//! Concurrent ingestion of catalog sources.
//!
//! Every non-blank source is scanned by one task on the rayon pool, which parses and
//! derives records in source order and forwards configurations through a bounded channel.
//! The single consumer sees them as one lazy [`ConfigurationStream`]. Sources are started in
//! list order, but their output interleaves in no particular order.
//!
//! The first failure wins: the stream yields that error and ends, and a shared flag keeps
//! sources that have not started yet from being scanned at all. Workers already running
//! stop at their next record.
//!
//! A worker that panics is reported as [`EngineError::WorkerLost`] for its source.
//!
//! The stream blocks while waiting for workers, so it must not be consumed from inside the
//! rayon pool itself.

use crate::core::io::catalog;
use crate::core::models::configuration::StackConfiguration;
use crate::engine::config::Constraints;
use crate::engine::derive::derive;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::iter::FusedIterator;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use tracing::{debug, info, instrument, warn};

const CHANNEL_CAPACITY: usize = 1024;

/// Per-source counts, reported once a source has been scanned to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub path: String,
    pub records: u64,
    pub derived: u64,
}

impl SourceSummary {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            records: 0,
            derived: 0,
        }
    }

    /// Records dropped by the thickness window.
    pub fn filtered(&self) -> u64 {
        self.records - self.derived
    }
}

enum WorkerMessage {
    Configuration(StackConfiguration),
    SourceFinished(SourceSummary),
    Failed(EngineError),
}

/// Starts scanning `sources` and returns the merged configuration stream.
///
/// Blank entries are skipped. Scanning begins immediately; the returned stream is
/// one-pass and cannot be restarted. Dropping it cancels any work not yet done.
#[instrument(skip_all, name = "source_ingestion")]
pub fn ingest<'r, S: AsRef<str>>(
    constraints: &Constraints,
    sources: &[S],
    reporter: &'r ProgressReporter<'r>,
) -> ConfigurationStream<'r> {
    let paths: Vec<String> = sources
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();

    let skipped = sources.len() - paths.len();
    if skipped > 0 {
        debug!(skipped, "Ignoring blank source entries.");
    }
    info!(sources = paths.len(), "Dispatching source scans.");

    let (sender, receiver) = mpsc::sync_channel(CHANNEL_CAPACITY);
    let cancelled = Arc::new(AtomicBool::new(false));

    reporter.report(Progress::TaskStart {
        total: paths.len() as u64,
    });

    for path in &paths {
        let path = path.clone();
        let constraints = *constraints;
        let sender = sender.clone();
        let cancelled = Arc::clone(&cancelled);
        rayon::spawn_fifo(move || run_worker(path, constraints, sender, cancelled));
    }

    ConfigurationStream {
        receiver,
        cancelled,
        reporter,
        outstanding: paths,
        summaries: Vec::new(),
        done: false,
    }
}

fn run_worker(
    path: String,
    constraints: Constraints,
    sender: SyncSender<WorkerMessage>,
    cancelled: Arc<AtomicBool>,
) {
    if cancelled.load(Ordering::Acquire) {
        debug!(source = %path, "Ingestion cancelled before source was started.");
        return;
    }

    let outcome = catch_panic(&path, || {
        scan_source(&path, &constraints, &sender, &cancelled)
    });
    let message = match outcome {
        Ok(Some(summary)) => WorkerMessage::SourceFinished(summary),
        Ok(None) => return,
        Err(e) => {
            cancelled.store(true, Ordering::Release);
            WorkerMessage::Failed(e)
        }
    };
    // The consumer may already be gone; nothing is left to report to.
    let _ = sender.send(message);
}

/// A panicking scan becomes `WorkerLost`; left to rayon it would abort the process.
fn catch_panic<F>(path: &str, scan: F) -> Result<Option<SourceSummary>, EngineError>
where
    F: FnOnce() -> Result<Option<SourceSummary>, EngineError>,
{
    panic::catch_unwind(AssertUnwindSafe(scan)).unwrap_or_else(|_| {
        warn!(source = %path, "Worker panicked while scanning source.");
        Err(EngineError::WorkerLost {
            path: path.to_string(),
        })
    })
}

/// Returns `Ok(None)` when the scan was abandoned because the run is over.
fn scan_source(
    path: &str,
    constraints: &Constraints,
    sender: &SyncSender<WorkerMessage>,
    cancelled: &AtomicBool,
) -> Result<Option<SourceSummary>, EngineError> {
    let records = catalog::open(path)?;
    let mut summary = SourceSummary::new(path);

    for record in records {
        if cancelled.load(Ordering::Relaxed) {
            return Ok(None);
        }
        let record = record?;
        summary.records += 1;

        let derived = derive(&record, constraints).map_err(|source| EngineError::Derive {
            path: path.to_string(),
            source,
        })?;
        if let Some(configuration) = derived {
            summary.derived += 1;
            if sender
                .send(WorkerMessage::Configuration(configuration))
                .is_err()
            {
                return Ok(None);
            }
        }
    }

    Ok(Some(summary))
}

/// Lazy, one-pass stream of configurations from every source of a run.
pub struct ConfigurationStream<'r> {
    receiver: Receiver<WorkerMessage>,
    cancelled: Arc<AtomicBool>,
    reporter: &'r ProgressReporter<'r>,
    outstanding: Vec<String>,
    summaries: Vec<SourceSummary>,
    done: bool,
}

impl ConfigurationStream<'_> {
    /// Sources fully scanned so far.
    pub fn summaries(&self) -> &[SourceSummary] {
        &self.summaries
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.done = true;
    }

    fn finish_source(&mut self, summary: SourceSummary) {
        if let Some(index) = self.outstanding.iter().position(|p| *p == summary.path) {
            self.outstanding.swap_remove(index);
        }
        debug!(
            source = %summary.path,
            records = summary.records,
            derived = summary.derived,
            filtered = summary.filtered(),
            "Source scanned."
        );
        let name = Path::new(&summary.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| summary.path.clone());
        self.reporter.report(Progress::StatusUpdate { text: name });
        self.reporter.report(Progress::TaskIncrement { amount: 1 });
        self.summaries.push(summary);
    }
}

impl Iterator for ConfigurationStream<'_> {
    type Item = Result<StackConfiguration, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.receiver.recv() {
                Ok(WorkerMessage::Configuration(configuration)) => return Some(Ok(configuration)),
                Ok(WorkerMessage::SourceFinished(summary)) => self.finish_source(summary),
                Ok(WorkerMessage::Failed(e)) => {
                    warn!("Aborting ingestion: {}", e);
                    self.cancel();
                    return Some(Err(e));
                }
                Err(_) => {
                    self.done = true;
                    if let Some(path) = self.outstanding.first() {
                        return Some(Err(EngineError::WorkerLost { path: path.clone() }));
                    }
                    self.reporter.report(Progress::TaskFinish);
                    return None;
                }
            }
        }
    }
}

impl FusedIterator for ConfigurationStream<'_> {}

impl Drop for ConfigurationStream<'_> {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::catalog::CatalogError;
    use crate::engine::config::ConstraintsBuilder;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    const HEADER: &str = "Product,Thickness,Width,Length,Capacity\n";

    fn constraints() -> Constraints {
        ConstraintsBuilder::new()
            .max_width(100)
            .max_length(100)
            .from_thickness(1)
            .to_thickness(4)
            .top_k(5)
            .build()
            .unwrap()
    }

    fn write_source(dir: &Path, name: &str, rows: &[&str]) -> String {
        let path = dir.join(name);
        let mut content = HEADER.to_string();
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn sorted_products(configs: &[StackConfiguration]) -> Vec<String> {
        let mut products: Vec<String> = configs.iter().map(|c| c.product.clone()).collect();
        products.sort();
        products
    }

    #[test]
    fn merges_configurations_from_all_sources() {
        let dir = tempdir().unwrap();
        let a = write_source(dir.path(), "a.csv", &["A1,2,50,100,3000", "A2,3,25,50,800"]);
        let b = write_source(dir.path(), "b.csv", &["B1,1,10,10,100"]);
        let reporter = ProgressReporter::new();

        let configs: Vec<_> = ingest(&constraints(), &[a, b], &reporter)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(sorted_products(&configs), vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn blank_sources_contribute_nothing() {
        let dir = tempdir().unwrap();
        let a = write_source(dir.path(), "a.csv", &["A1,2,50,100,3000"]);
        let reporter = ProgressReporter::new();

        let sources = vec!["".to_string(), a, "   ".to_string()];
        let mut stream = ingest(&constraints(), &sources, &reporter);
        let configs: Vec<_> = stream.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(configs.len(), 1);
        assert_eq!(stream.summaries().len(), 1);
    }

    #[test]
    fn no_sources_yields_empty_stream() {
        let reporter = ProgressReporter::new();
        let sources: Vec<String> = Vec::new();
        assert_eq!(ingest(&constraints(), &sources, &reporter).count(), 0);
    }

    #[test]
    fn filtered_records_are_counted_but_not_emitted() {
        let dir = tempdir().unwrap();
        let a = write_source(
            dir.path(),
            "a.csv",
            &["Keep,2,50,100,3000", "TooThick,9,50,100,3000", "TooThin,0.5,50,100,3000"],
        );
        let reporter = ProgressReporter::new();

        let mut stream = ingest(&constraints(), &[a.clone()], &reporter);
        let configs: Vec<_> = stream.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(sorted_products(&configs), vec!["Keep"]);
        assert_eq!(
            stream.summaries(),
            &[SourceSummary {
                path: a,
                records: 3,
                derived: 1
            }]
        );
        assert_eq!(stream.summaries()[0].filtered(), 2);
    }

    #[test]
    fn record_order_within_a_source_is_preserved() {
        let dir = tempdir().unwrap();
        let rows: Vec<String> = (0..50).map(|i| format!("P{:02},2,50,100,{}", i, i + 1)).collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let a = write_source(dir.path(), "a.csv", &row_refs);
        let reporter = ProgressReporter::new();

        let products: Vec<String> = ingest(&constraints(), &[a], &reporter)
            .map(|c| c.unwrap().product)
            .collect();

        let expected: Vec<String> = (0..50).map(|i| format!("P{:02}", i)).collect();
        assert_eq!(products, expected);
    }

    #[test]
    fn malformed_source_fails_the_stream() {
        let dir = tempdir().unwrap();
        let good = write_source(dir.path(), "good.csv", &["G1,2,50,100,3000"]);
        let bad = write_source(dir.path(), "bad.csv", &["B1,2,50,100,N/A"]);
        let reporter = ProgressReporter::new();

        let mut stream = ingest(&constraints(), &[good, bad.clone()], &reporter);
        let result: Result<Vec<_>, _> = stream.by_ref().collect();

        match result {
            Err(EngineError::Catalog(CatalogError::MalformedRecord { path, field, .. })) => {
                assert_eq!(path, bad);
                assert_eq!(field, "Capacity");
            }
            other => panic!("expected malformed record error, got {:?}", other),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn missing_source_file_fails_the_stream() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv").to_string_lossy().to_string();
        let reporter = ProgressReporter::new();

        let result: Result<Vec<_>, _> = ingest(&constraints(), &[missing.clone()], &reporter).collect();

        let err = result.unwrap_err();
        assert!(matches!(err, EngineError::Catalog(CatalogError::Io { .. })));
        assert_eq!(err.path(), Some(missing.as_str()));
    }

    #[test]
    fn degenerate_dimension_fails_the_stream() {
        let dir = tempdir().unwrap();
        let a = write_source(dir.path(), "a.csv", &["Flat,2,0,100,3000"]);
        let reporter = ProgressReporter::new();

        let result: Result<Vec<_>, _> = ingest(&constraints(), &[a.clone()], &reporter).collect();

        match result {
            Err(EngineError::Derive { path, .. }) => assert_eq!(path, a),
            other => panic!("expected derive error, got {:?}", other),
        }
    }

    #[test]
    fn progress_counts_each_finished_source() {
        let dir = tempdir().unwrap();
        let a = write_source(dir.path(), "a.csv", &["A1,2,50,100,3000"]);
        let b = write_source(dir.path(), "b.csv", &["B1,2,50,100,3000"]);
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p: Progress| {
            events.lock().unwrap().push(p);
        }));

        let count = ingest(&constraints(), &[a, b], &reporter).count();
        drop(reporter);

        assert_eq!(count, 2);
        let events = events.into_inner().unwrap();
        assert!(matches!(events.first(), Some(Progress::TaskStart { total: 2 })));
        let increments = events
            .iter()
            .filter(|p| matches!(p, Progress::TaskIncrement { amount: 1 }))
            .count();
        assert_eq!(increments, 2);
        let mut scanned: Vec<&str> = events
            .iter()
            .filter_map(|p| match p {
                Progress::StatusUpdate { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        scanned.sort();
        assert_eq!(scanned, vec!["a.csv", "b.csv"]);
        assert!(matches!(events.last(), Some(Progress::TaskFinish)));
    }

    #[test]
    fn sources_queued_behind_a_failure_are_never_started() {
        let dir = tempdir().unwrap();
        let bad = write_source(dir.path(), "bad.csv", &["B1,2,50,100,N/A"]);
        let queued = write_source(dir.path(), "queued.csv", &["Q1,2,50,100,3000"]);
        let reporter = ProgressReporter::new();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();

        // Dispatched from inside a single-thread pool, the scans run one after another.
        let mut stream = pool.install(|| {
            ingest(&constraints(), &[bad.clone(), queued.clone()], &reporter)
        });

        assert!(matches!(
            stream.next(),
            Some(Err(EngineError::Catalog(CatalogError::MalformedRecord { .. })))
        ));
        assert!(stream.next().is_none());

        // Nothing from the queued source ever reached the channel.
        assert!(stream.receiver.iter().next().is_none());
        assert!(stream.summaries().is_empty());
    }

    #[test]
    fn panicking_worker_is_reported_as_lost() {
        let result = catch_panic("a.csv", || panic!("scan blew up"));
        match result {
            Err(EngineError::WorkerLost { path }) => assert_eq!(path, "a.csv"),
            other => panic!("expected a lost worker, got {:?}", other),
        }
    }

    #[test]
    fn dropping_the_stream_early_does_not_hang() {
        let dir = tempdir().unwrap();
        let rows: Vec<String> = (0..5000).map(|i| format!("P{},2,50,100,{}", i, i + 1)).collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let a = write_source(dir.path(), "a.csv", &row_refs);
        let reporter = ProgressReporter::new();

        let mut stream = ingest(&constraints(), &[a], &reporter);
        assert!(stream.next().is_some());
        drop(stream);
    }
}
