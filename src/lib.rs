//! Resamp - Batch Image Resampler
//!
//! A small library for converting a user-assembled list of images into
//! resized JPEG copies. The core is a sequential, cancel-free, best-effort
//! batch pipeline: one background worker per run, per-item failures skipped,
//! progress reported over a channel so the controlling task stays responsive.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resamp::{BatchPipeline, ItemRegistry, TargetConfig};
//!
//! # async fn demo() -> resamp::Result<()> {
//! let mut registry = ItemRegistry::new();
//! registry.add(vec!["holiday.png".into(), "notes.txt".into()]); // .txt is filtered out
//!
//! let (tx, mut rx) = resamp::pipeline::progress::channel();
//! tokio::spawn(async move {
//!     while let Some(update) = rx.recv().await {
//!         println!("{}", update.message);
//!     }
//! });
//!
//! let pipeline = BatchPipeline::new();
//! let config = TargetConfig::new(1920, 1080, "resized".into());
//! let outcome = pipeline.run(registry.snapshot(), config, tx).await?;
//! println!("{} of {} converted", outcome.succeeded(), outcome.total());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;

// Re-export commonly used types
pub use config::{Preferences, TargetConfig};
pub use error::{ResampError, Result};
pub use pipeline::{BatchPipeline, ProgressUpdate, RunOutcome, RunState};
pub use registry::{CandidateFile, ItemRegistry, ALLOWED_EXTENSIONS};

use tracing::info;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging for the library
///
/// Installs a tracing subscriber honoring `RUST_LOG`. Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    if tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .is_ok()
    {
        info!("Resamp v{} initialized", VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
