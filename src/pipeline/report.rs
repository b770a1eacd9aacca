//! Per-item outcomes and the terminal run report

use std::path::PathBuf;

/// Where in the per-item conversion a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemErrorKind {
    /// Source file could not be read or decoded
    Decode,
    /// Output file could not be encoded or written
    Encode,
    /// Other filesystem failure
    Io,
}

/// A single item that failed conversion
///
/// Failures are recorded here instead of being surfaced individually; a bad
/// file never aborts the run.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Path of the source file that failed
    pub source: PathBuf,
    /// Which stage failed
    pub kind: ItemErrorKind,
    /// Human-readable detail from the underlying error
    pub message: String,
}

impl ItemFailure {
    pub fn new<S: Into<String>>(source: PathBuf, kind: ItemErrorKind, message: S) -> Self {
        Self {
            source,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:?} failure: {}",
            self.source.display(),
            self.kind,
            self.message
        )
    }
}

/// A successfully converted item
#[derive(Debug, Clone)]
pub struct ConvertedItem {
    /// Path of the source file
    pub source: PathBuf,
    /// Path of the resized JPEG that was written
    pub output: PathBuf,
}

/// Outcome of converting one item
pub type ItemResult = std::result::Result<ConvertedItem, ItemFailure>;

/// Terminal outcome of a run
///
/// A run that passes validation always completes, even if every item failed;
/// the counts and per-item results are carried for reporting and debugging.
#[derive(Debug)]
pub struct RunOutcome {
    results: Vec<ItemResult>,
}

impl RunOutcome {
    pub(crate) fn new(results: Vec<ItemResult>) -> Self {
        Self { results }
    }

    /// Number of items the run processed
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of items converted successfully
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of items that failed and were skipped
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// Per-item results in processing order
    pub fn results(&self) -> &[ItemResult] {
        &self.results
    }

    /// Iterator over the failures, in processing order
    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counts() {
        let outcome = RunOutcome::new(vec![
            Ok(ConvertedItem {
                source: PathBuf::from("a.jpg"),
                output: PathBuf::from("a_800x600.jpg"),
            }),
            Err(ItemFailure::new(
                PathBuf::from("b.jpg"),
                ItemErrorKind::Decode,
                "corrupt header",
            )),
            Ok(ConvertedItem {
                source: PathBuf::from("c.png"),
                output: PathBuf::from("c_800x600.jpg"),
            }),
        ]);

        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);

        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, ItemErrorKind::Decode);
    }

    #[test]
    fn test_failure_display() {
        let failure = ItemFailure::new(PathBuf::from("x.jpg"), ItemErrorKind::Encode, "disk full");
        let text = failure.to_string();
        assert!(text.contains("x.jpg"));
        assert!(text.contains("disk full"));
    }
}
