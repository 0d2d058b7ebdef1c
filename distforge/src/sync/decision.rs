//! Per-file synchronization decisions.
//!
//! Content hashes are the sole equality criterion. Size or timestamps are
//! not consulted: every object this system writes carries hash metadata,
//! so a missing hash marks foreign or damaged state, not a comparable
//! object.

/// What to do with one mirror file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Remote hash matches local content; nothing to do.
    Skip,

    /// No remote record; upload as a new object.
    New,

    /// Remote differs and overwrite is permitted; re-upload.
    Modify,

    /// Remote differs and overwrite is not permitted; abort the run.
    Conflict,
}

impl SyncDecision {
    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            SyncDecision::Skip => "skip",
            SyncDecision::New => "new",
            SyncDecision::Modify => "modify",
            SyncDecision::Conflict => "conflict",
        }
    }

    /// Whether this decision uploads in live mode.
    pub fn uploads(&self) -> bool {
        matches!(self, SyncDecision::New | SyncDecision::Modify)
    }
}

/// Classify one file from its local hash and the remote record.
///
/// `remote_hash` is `None` when the object does not exist remotely (or
/// carries no hash metadata). `force` downgrades what would be a conflict
/// into a modification; it never affects matching or new files.
pub fn classify(local_hash: &str, remote_hash: Option<&str>, force: bool) -> SyncDecision {
    match remote_hash {
        None => SyncDecision::New,
        Some(remote) if remote == local_hash => SyncDecision::Skip,
        Some(_) if force => SyncDecision::Modify,
        Some(_) => SyncDecision::Conflict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_new_when_absent() {
        assert_eq!(classify("h1", None, false), SyncDecision::New);
        assert_eq!(classify("h1", None, true), SyncDecision::New);
    }

    #[test]
    fn test_classify_skip_on_match() {
        assert_eq!(classify("h1", Some("h1"), false), SyncDecision::Skip);
        // force never turns a match into an upload
        assert_eq!(classify("h1", Some("h1"), true), SyncDecision::Skip);
    }

    #[test]
    fn test_classify_conflict_without_force() {
        assert_eq!(classify("h2", Some("h1"), false), SyncDecision::Conflict);
    }

    #[test]
    fn test_classify_force_downgrades_conflict() {
        assert_eq!(classify("h2", Some("h1"), true), SyncDecision::Modify);
    }

    #[test]
    fn test_uploads() {
        assert!(SyncDecision::New.uploads());
        assert!(SyncDecision::Modify.uploads());
        assert!(!SyncDecision::Skip.uploads());
        assert!(!SyncDecision::Conflict.uploads());
    }

    #[test]
    fn test_labels() {
        assert_eq!(SyncDecision::Skip.label(), "skip");
        assert_eq!(SyncDecision::Conflict.label(), "conflict");
    }
}
