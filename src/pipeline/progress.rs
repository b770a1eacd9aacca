//! Progress reporting over a worker-to-controller channel
//!
//! The conversion worker owns the sending half; whatever context drives the
//! user interface drains the receiving half. Shared progress state is never
//! mutated across contexts, only messages cross the boundary.

use tokio::sync::mpsc;

/// One progress event, emitted after each item completes (success or failure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Items processed so far, 1-based and strictly increasing
    pub completed: usize,
    /// Total items in the run
    pub total: usize,
    /// Status text for display
    pub message: String,
}

impl ProgressUpdate {
    pub(crate) fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            message: format!("Processed {} of {}", completed, total),
        }
    }

    /// Whether this is the final update of the run
    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

/// Sending half handed to the pipeline
pub type ProgressSender = mpsc::UnboundedSender<ProgressUpdate>;

/// Receiving half drained by the caller
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressUpdate>;

/// Create a progress channel
///
/// Unbounded so the worker never blocks on a slow consumer; a run emits
/// exactly one update per item, so the queue stays small.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_message() {
        let update = ProgressUpdate::new(3, 7);
        assert_eq!(update.message, "Processed 3 of 7");
        assert!(!update.is_done());
        assert!(ProgressUpdate::new(7, 7).is_done());
    }

    #[tokio::test]
    async fn test_channel_preserves_order() {
        let (tx, mut rx) = channel();
        for i in 1..=3 {
            tx.send(ProgressUpdate::new(i, 3)).unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(update) = rx.recv().await {
            seen.push(update.completed);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
