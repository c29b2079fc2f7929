use thiserror::Error;

/// Identity violations found by [`crate::Snapshot::validate`].
///
/// Diffing a snapshot that fails validation never panics, but its output is unspecified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("section {index} repeats the identifier of an earlier section")]
    DuplicateSection { index: usize },
    #[error("item {index} in section {section} repeats the key of an earlier item")]
    DuplicateItem { section: usize, index: usize },
}
