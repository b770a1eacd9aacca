//! Item registry: the ordered, deduplicated list of files queued for conversion

use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::debug;

/// File extensions accepted by the registry (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// One accepted input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Final path segment, used for display and output naming
    pub display_name: String,
    /// Full path, the identity key within the registry
    pub full_path: PathBuf,
}

impl CandidateFile {
    fn from_path(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            display_name,
            full_path: path,
        }
    }
}

/// Ordered, deduplicated set of candidate files keyed on full path
///
/// Insertion order is preserved; it is both the display order and the order
/// the pipeline processes items in. Observers can subscribe to a watch
/// channel that carries the current item count.
pub struct ItemRegistry {
    items: Vec<CandidateFile>,
    count_tx: watch::Sender<usize>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        let (count_tx, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            count_tx,
        }
    }

    /// Add paths to the registry
    ///
    /// Each path is accepted only if its lowercase extension is on the
    /// allow-list and no existing entry has the same full path. Rejected
    /// paths are dropped silently; filtering is policy, not failure.
    /// Returns the number of paths actually added.
    pub fn add<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if !has_allowed_extension(&path) {
                debug!("Rejected (extension): {:?}", path);
                continue;
            }
            if self.items.iter().any(|item| item.full_path == path) {
                debug!("Rejected (duplicate): {:?}", path);
                continue;
            }
            self.items.push(CandidateFile::from_path(path));
            added += 1;
        }
        if added > 0 {
            self.notify_count();
        }
        added
    }

    /// Remove the entry whose full path equals `path`, if present
    ///
    /// Removing an absent path is a no-op.
    pub fn remove(&mut self, path: &Path) {
        let before = self.items.len();
        self.items.retain(|item| item.full_path != path);
        if self.items.len() != before {
            self.notify_count();
        }
    }

    /// Current contents as an owned copy for a pipeline run to consume
    ///
    /// The pipeline operates on this snapshot; mutating the registry while a
    /// run is active only affects later runs.
    pub fn snapshot(&self) -> Vec<CandidateFile> {
        self.items.clone()
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subscribe to item count changes
    pub fn subscribe_count(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }

    fn notify_count(&self) {
        let _ = self.count_tx.send(self.items.len());
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a path carries an allow-listed extension
fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
