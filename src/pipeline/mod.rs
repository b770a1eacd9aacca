//! Batch conversion pipeline
//!
//! Consumes a registry snapshot plus a target configuration and converts
//! every item to a resized JPEG, strictly sequentially, on one background
//! worker. Per-item failures are recorded and skipped; the run completes
//! regardless. The controlling task is never blocked by decode or encode
//! work.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::TargetConfig;
use crate::error::{ResampError, Result};
use crate::registry::CandidateFile;

pub mod convert;
pub mod progress;
pub mod report;

pub use convert::output_file_name;
pub use progress::{ProgressReceiver, ProgressSender, ProgressUpdate};
pub use report::{ConvertedItem, ItemErrorKind, ItemFailure, ItemResult, RunOutcome};

/// Lifecycle of a pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run requested yet
    Idle,
    /// Pre-run checks in progress
    Validating,
    /// Background worker converting items
    Running,
    /// Last run finished
    Completed,
}

/// Sequential batch converter
///
/// One instance drives at most one run at a time; a second `run` while a
/// prior run is active is rejected with [`ResampError::RunInProgress`].
pub struct BatchPipeline {
    quality: u8,
    state: Arc<Mutex<RunState>>,
}

/// Default JPEG encoder quality
pub const DEFAULT_QUALITY: u8 = 90;

impl BatchPipeline {
    /// Create a pipeline with the default JPEG quality
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }

    /// Create a pipeline with a specific JPEG quality (1-100)
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    /// Convert every item in `items` into `config.output_dir`
    ///
    /// Validates up front (empty item list, dimensions, output directory)
    /// and refuses the run before any filesystem side effect occurs. Once
    /// validation passes the run always reaches `Completed`: items are
    /// processed one at a time on a blocking worker, a failed item is
    /// skipped, and one [`ProgressUpdate`] is sent per item in strictly
    /// increasing order.
    pub async fn run(
        &self,
        items: Vec<CandidateFile>,
        config: TargetConfig,
        progress: ProgressSender,
    ) -> Result<RunOutcome> {
        {
            let mut state = self.state.lock().unwrap();
            if matches!(*state, RunState::Validating | RunState::Running) {
                return Err(ResampError::RunInProgress);
            }
            *state = RunState::Validating;
        }
        let mut guard = StateGuard::new(Arc::clone(&self.state));

        if items.is_empty() {
            return Err(ResampError::NoInput);
        }
        config.validate()?;

        guard.set(RunState::Running);
        info!(
            "Starting run: {} items -> {}x{} into {:?}",
            items.len(),
            config.width,
            config.height,
            config.output_dir
        );

        let quality = self.quality;
        let worker = tokio::task::spawn_blocking(move || {
            let total = items.len();
            let mut results = Vec::with_capacity(total);
            for (index, item) in items.iter().enumerate() {
                let result =
                    convert::convert_item(item, config.width, config.height, &config.output_dir, quality);
                if let Err(failure) = &result {
                    warn!("Skipping {}: {}", item.display_name, failure.message);
                }
                results.push(result);
                // Receiver may already be gone; the run does not care
                let _ = progress.send(ProgressUpdate::new(index + 1, total));
            }
            results
        });

        let results = worker
            .await
            .map_err(|e| ResampError::worker(format!("conversion worker panicked: {}", e)))?;

        guard.set(RunState::Completed);
        guard.disarm();

        let outcome = RunOutcome::new(results);
        info!(
            "Run completed: {} converted, {} skipped",
            outcome.succeeded(),
            outcome.failed()
        );
        Ok(outcome)
    }
}

impl Default for BatchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets the pipeline to `Idle` when a run exits early
struct StateGuard {
    state: Arc<Mutex<RunState>>,
    armed: bool,
}

impl StateGuard {
    fn new(state: Arc<Mutex<RunState>>) -> Self {
        Self { state, armed: true }
    }

    fn set(&self, next: RunState) {
        *self.state.lock().unwrap() = next;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        if self.armed {
            *self.state.lock().unwrap() = RunState::Idle;
        }
    }
}
