//! Operation executor.
//!
//! In dry-run mode operations are only appended to the run's log. In live
//! mode each move runs immediately and the log receives the operation with
//! the destination actually used.

use crate::models::plan::{OperationKind, PlannedOperation, RunContext};
use crate::utils::fs::{move_path, unique_destination};
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Applies planned operations according to the run mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    /// Record or perform an operation. Returns the destination path, which
    /// in live mode may carry a `-NN` suffix.
    pub fn apply(&self, op: PlannedOperation, ctx: &mut RunContext) -> Result<PathBuf> {
        if ctx.is_dry_run() {
            tracing::info!(
                "DRY RUN: {} ({}) {:?} -> {:?}",
                op.description,
                op.kind,
                op.source,
                op.destination
            );
            let destination = op.destination.clone();
            ctx.operations.push(op);
            return Ok(destination);
        }

        match op.kind {
            OperationKind::Move => self.execute_move(op, ctx),
        }
    }

    fn execute_move(&self, mut op: PlannedOperation, ctx: &mut RunContext) -> Result<PathBuf> {
        if let Some(parent) = op.destination.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let destination = unique_destination(&op.destination);
        if destination != op.destination {
            tracing::info!(
                "Destination {:?} exists, using {:?}",
                op.destination,
                destination
            );
        }

        let checksum = move_path(&op.source, &destination)?;
        match checksum {
            Some(sum) => tracing::info!(
                "Moved (copy, sha256 {}): {:?} -> {:?}",
                &sum[..12.min(sum.len())],
                op.source,
                destination
            ),
            None => tracing::info!("Moved: {:?} -> {:?}", op.source, destination),
        }

        op.destination = destination.clone();
        ctx.operations.push(op);
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_leaves_filesystem_alone() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.mkv");
        fs::write(&source, "x").unwrap();
        let dest = temp.path().join("out").join("b.mkv");

        let mut ctx = RunContext::dry_run();
        let result = Executor::new()
            .apply(PlannedOperation::move_file(&source, &dest, "test"), &mut ctx)
            .unwrap();

        assert_eq!(result, dest);
        assert!(source.exists());
        assert!(!dest.exists());
        assert_eq!(ctx.operations.len(), 1);
    }

    #[test]
    fn test_live_move_creates_parent() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.mkv");
        fs::write(&source, "x").unwrap();
        let dest = temp.path().join("out").join("b.mkv");

        let mut ctx = RunContext::live();
        Executor::new()
            .apply(PlannedOperation::move_file(&source, &dest, "test"), &mut ctx)
            .unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "x");
        assert_eq!(ctx.operations.as_slice()[0].destination, dest);
    }
}
