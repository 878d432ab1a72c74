use cellstack::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

const EVENT_CHANNEL_CAPACITY: usize = 1024;
const SPINNER_TICK_MS: u64 = 80;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
}

/// Renders core progress events on stderr from its own task, so the blocking
/// workflow never waits on terminal output.
pub struct UiManager {
    mp: Arc<MultiProgress>,
    state: BarState,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
    _sentinel_bar: ProgressBar,
}

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    phase: String,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = Arc::new(MultiProgress::new());
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        let _sentinel_bar = mp.add(ProgressBar::hidden());
        let manager = Self {
            mp,
            state: BarState::default(),
            event_receiver,
            shutdown_receiver,
            _sentinel_bar,
        };

        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => {
                    self.handle_event(event);
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        // Events queued before shutdown still get drawn.
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(bar) = self.state.active_bar.take() {
            bar.finish_and_clear();
        }
        self._sentinel_bar.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_style(Self::spinner_style());
                pb.set_message(name.to_string());

                self.state.active_bar = Some(pb);
                self.state.phase = name.to_string();
            }
            Progress::PhaseFinish => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }
                self.mp.println(format!("✓ {}", self.state.phase)).ok();
                self.state.phase.clear();
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.disable_steady_tick();
                    bar.set_style(Self::bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    if let Some(length) = bar.length() {
                        bar.set_position(length);
                    }
                    bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.set_message(format!("{} ({})", self.state.phase, text));
                }
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len} sources ({elapsed})")
            .expect("Invalid template")
            .progress_chars("━╸ ")
    }
}

#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Failed to send progress update to UI channel: {}", e);
            }
        })
    }
}
