use crate::cli::GenerateArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::ui::{CliProgressHandler, UiEvent};
use cellstack::core::io::report::{ExportOutcome, ResultExporter};
use cellstack::core::models::configuration::StackConfiguration;
use cellstack::engine::progress::ProgressReporter;
use cellstack::workflows;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn run(args: GenerateArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Building run configuration...");
    let app = build_config(&args)?;

    if app.sources.iter().all(|s| s.trim().is_empty()) {
        warn!("No catalog sources were given; the ranking will be empty.");
    }

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Generating stack configurations...");
    info!("Invoking the core generation workflow...");

    let result = tokio::task::block_in_place(|| {
        workflows::generate::run(&app.constraints, &app.sources, &reporter)
    })
    .inspect_err(|e| {
        if let Some(path) = e.path() {
            error!(source = path, "Generation aborted by a failing source.");
        }
    })?;

    info!(
        "Workflow finished: {} candidate(s) from {} source(s), {} selected.",
        result.candidates_considered,
        result.sources.len(),
        result.configurations.len()
    );

    if result.configurations.is_empty() {
        warn!("No cell in the given sources fits the thickness range.");
        println!("Warning: no configuration matched the given constraints.");
    }

    match ResultExporter::export(app.output.as_deref(), &result.configurations)? {
        ExportOutcome::Written { path, rows } => {
            info!("Wrote {} configuration(s) to {:?}", rows, path);
            println!("✓ {} configuration(s) written to: {}", rows, path.display());
        }
        ExportOutcome::NoOutputTarget => {
            warn!("No output file selected; results were not saved.");
            println!("No file selected for saving. Top configurations:");
            print_ranking(&result.configurations)?;
        }
    }

    Ok(())
}

fn print_ranking(configurations: &[StackConfiguration]) -> Result<()> {
    let stdout = std::io::stdout();
    ResultExporter::write_to(stdout.lock(), configurations)?;
    Ok(())
}
