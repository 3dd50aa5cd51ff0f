//! Planned operations and run-scoped state.

use super::session::ScanSession;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Move,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Move => write!(f, "move"),
        }
    }
}

/// A filesystem operation, recorded before (dry-run) or after (live) it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOperation {
    pub kind: OperationKind,
    pub source: PathBuf,
    /// Requested destination. In live mode this is rewritten to the
    /// collision-free path that was actually used.
    pub destination: PathBuf,
    pub description: String,
}

impl PlannedOperation {
    /// Create a move operation.
    pub fn move_file<S: Into<String>>(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        description: S,
    ) -> Self {
        Self {
            kind: OperationKind::Move,
            source: source.into(),
            destination: destination.into(),
            description: description.into(),
        }
    }
}

/// Ordered, append-only operation log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationLog {
    operations: Vec<PlannedOperation>,
}

impl OperationLog {
    pub fn push(&mut self, op: PlannedOperation) {
        self.operations.push(op);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedOperation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[PlannedOperation] {
        &self.operations
    }
}

/// Whether filesystem operations are performed or only recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    DryRun,
    Live,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        }
    }

    pub fn is_dry_run(self) -> bool {
        self == RunMode::DryRun
    }
}

/// State shared across items for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub mode: RunMode,
    pub operations: OperationLog,
    pub session: ScanSession,
    /// Source paths already assigned to an item.
    claimed: HashSet<PathBuf>,
}

impl RunContext {
    /// Create a context with a fresh session stamped with the current time.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            operations: OperationLog::default(),
            session: ScanSession::new(),
            claimed: HashSet::new(),
        }
    }

    pub fn dry_run() -> Self {
        Self::new(RunMode::DryRun)
    }

    pub fn live() -> Self {
        Self::new(RunMode::Live)
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode.is_dry_run()
    }

    /// Claim a source path for the current item. Returns false if an earlier
    /// item already took it.
    pub fn claim(&mut self, path: &Path) -> bool {
        self.claimed.insert(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preserves_order() {
        let mut log = OperationLog::default();
        log.push(PlannedOperation::move_file("/a", "/b", "first"));
        log.push(PlannedOperation::move_file("/c", "/d", "second"));

        let descriptions: Vec<_> = log.iter().map(|op| op.description.as_str()).collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }

    #[test]
    fn test_run_mode() {
        assert!(RunMode::from_dry_run(true).is_dry_run());
        assert!(!RunContext::live().is_dry_run());
    }

    #[test]
    fn test_claim_once() {
        let mut ctx = RunContext::dry_run();
        assert!(ctx.claim(Path::new("/m/Subs/x.srt")));
        assert!(!ctx.claim(Path::new("/m/Subs/x.srt")));
        assert!(ctx.claim(Path::new("/m/Subs/y.srt")));
    }
}
