//! Integration tests for the executor.

use media_shelf::core::executor::Executor;
use media_shelf::models::plan::{PlannedOperation, RunContext};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_collision_gets_numbered_suffix() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("movie.mkv"), "existing").unwrap();
    fs::write(out.join("movie-01.mkv"), "existing").unwrap();

    let source = temp.path().join("incoming.mkv");
    fs::write(&source, "new").unwrap();

    let mut ctx = RunContext::live();
    let final_path = Executor::new()
        .apply(
            PlannedOperation::move_file(&source, out.join("movie.mkv"), "Organize movie"),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(final_path, out.join("movie-02.mkv"));
    assert_eq!(fs::read_to_string(out.join("movie.mkv")).unwrap(), "existing");
    assert_eq!(fs::read_to_string(&final_path).unwrap(), "new");
    assert_eq!(ctx.operations.as_slice()[0].destination, final_path);
}

#[test]
fn test_two_sources_same_destination() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("a").join("m.mkv");
    let second = temp.path().join("b").join("m.mkv");
    fs::create_dir_all(first.parent().unwrap()).unwrap();
    fs::create_dir_all(second.parent().unwrap()).unwrap();
    fs::write(&first, "A").unwrap();
    fs::write(&second, "B").unwrap();

    let out = temp.path().join("out");
    let executor = Executor::new();
    let mut ctx = RunContext::live();

    let first_dest = executor
        .apply(PlannedOperation::move_file(&first, out.join("m.mkv"), "first"), &mut ctx)
        .unwrap();
    let second_dest = executor
        .apply(PlannedOperation::move_file(&second, out.join("m.mkv"), "second"), &mut ctx)
        .unwrap();

    assert_eq!(first_dest, out.join("m.mkv"));
    assert_eq!(second_dest, out.join("m-01.mkv"));
    assert_eq!(fs::read_to_string(&first_dest).unwrap(), "A");
    assert_eq!(fs::read_to_string(&second_dest).unwrap(), "B");
    assert!(!first.exists());
    assert!(!second.exists());
}

#[test]
fn test_directory_move() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("leftover");
    fs::create_dir_all(source.join("nested")).unwrap();
    fs::write(source.join("nested").join("a.txt"), "a").unwrap();

    let mut ctx = RunContext::live();
    let dest = temp.path().join("Unwanted").join("leftover");
    Executor::new()
        .apply(PlannedOperation::move_file(&source, &dest, "Move to Unwanted folder"), &mut ctx)
        .unwrap();

    assert!(!source.exists());
    assert_eq!(fs::read_to_string(dest.join("nested").join("a.txt")).unwrap(), "a");
}

#[test]
fn test_dry_run_log_keeps_order() {
    let temp = TempDir::new().unwrap();
    let mut ctx = RunContext::dry_run();
    let executor = Executor::new();

    for name in ["a.mkv", "b.mkv", "c.mkv"] {
        executor
            .apply(
                PlannedOperation::move_file(temp.path().join(name), temp.path().join("x").join(name), name),
                &mut ctx,
            )
            .unwrap();
    }

    let descriptions: Vec<_> = ctx.operations.iter().map(|op| op.description.clone()).collect();
    assert_eq!(descriptions, vec!["a.mkv", "b.mkv", "c.mkv"]);
    assert!(!temp.path().join("x").exists());
}

#[test]
fn test_missing_source_fails() {
    let temp = TempDir::new().unwrap();
    let mut ctx = RunContext::live();

    let result = Executor::new().apply(
        PlannedOperation::move_file(temp.path().join("gone.mkv"), temp.path().join("out.mkv"), "x"),
        &mut ctx,
    );

    assert!(result.is_err());
    assert!(ctx.operations.is_empty());
}
