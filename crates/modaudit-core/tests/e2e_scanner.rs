/// End-to-end scanner tests.
///
/// These run the real walker and aggregator against temporary module trees
/// built with `tempfile`, checking row counts, ordering, classification,
/// and how missing roots are tolerated.
use filetime::FileTime;
use modaudit_core::scanner::{aggregate, root_specs, walk, RootSpec};
use modaudit_core::{AggregateError, AuditEvent, Category, Classifier, Reporter};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![b'x'; n]).unwrap();
}

/// The reference module:
///
/// ```text
/// root/
///   main.4gl      (512 bytes)
///   main.4go      (900 bytes)
///   base.set      (40 bytes)
///   sub/
///     extra.4gl   (10 bytes)
/// ```
fn build_module(root: &Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    write_bytes(&root.join("main.4gl"), 512);
    write_bytes(&root.join("main.4go"), 900);
    write_bytes(&root.join("base.set"), 40);
    write_bytes(&root.join("sub").join("extra.4gl"), 10);
}

fn build_three_file_module(root: &Path) {
    fs::create_dir_all(root.join("forms")).unwrap();
    write_bytes(&root.join("orders.4gl"), 100);
    write_bytes(&root.join("orders.42m"), 200);
    write_bytes(&root.join("forms").join("orders.per"), 300);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn reference_module_yields_four_ordered_rows() {
    let tmp = TempDir::new().unwrap();
    build_module(tmp.path());

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let rows: Vec<_> = walk(tmp.path(), &classifier, &reporter).unwrap().collect();

    let got: Vec<_> = rows
        .iter()
        .map(|r| (r.relative_path.as_str(), r.size_bytes, r.category))
        .collect();
    assert_eq!(
        got,
        vec![
            ("base.set", 40, Category::Metadata),
            ("main.4gl", 512, Category::Source),
            ("main.4go", 900, Category::Compiled),
            ("sub/extra.4gl", 10, Category::Source),
        ]
    );
}

/// Hidden files count; directories never become rows.
#[test]
fn row_count_matches_regular_files() {
    let tmp = TempDir::new().unwrap();
    build_module(tmp.path());
    write_bytes(&tmp.path().join(".fglprofile"), 7);
    fs::create_dir_all(tmp.path().join("empty").join("nested")).unwrap();

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    assert_eq!(walk(tmp.path(), &classifier, &reporter).unwrap().count(), 5);
}

#[test]
fn modification_time_is_reported_in_utc() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("main.4gl");
    write_bytes(&file, 1);
    // 2021-01-01T00:00:00Z
    filetime::set_file_mtime(&file, FileTime::from_unix_time(1_609_459_200, 0)).unwrap();

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let rows: Vec<_> = walk(tmp.path(), &classifier, &reporter).unwrap().collect();

    assert_eq!(rows[0].modified_at.timestamp(), 1_609_459_200);
    assert_eq!(rows[0].modified_at.to_rfc3339(), "2021-01-01T00:00:00+00:00");
}

#[test]
fn rescanning_unchanged_tree_is_identical() {
    let tmp = TempDir::new().unwrap();
    build_module(tmp.path());
    for i in 0..30 {
        write_bytes(&tmp.path().join("sub").join(format!("gen{i:02}.4gl")), i);
    }

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let first: Vec<_> = walk(tmp.path(), &classifier, &reporter).unwrap().collect();
    let second: Vec<_> = walk(tmp.path(), &classifier, &reporter).unwrap().collect();

    assert_eq!(first.len(), 34);
    assert_eq!(first, second);
}

#[test]
fn aggregate_tags_rows_with_root_id() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.4gm");
    let b = tmp.path().join("b.4gm");
    build_module(&a);
    build_three_file_module(&b);

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let result = aggregate(&root_specs([&a, &b]), &classifier, &reporter).unwrap();

    assert!(result.failures.is_empty());
    assert_eq!(result.table.len(), 7);
    assert!(result.table.rows()[..4].iter().all(|r| r.root == "a.4gm"));
    assert!(result.table.rows()[4..].iter().all(|r| r.root == "b.4gm"));
    assert_eq!(result.table.roots()[1].bytes, 600);
}

/// Swapping root order moves blocks but never changes a root's content.
#[test]
fn root_order_only_changes_block_order() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.4gm");
    let b = tmp.path().join("b.4gm");
    build_module(&a);
    build_three_file_module(&b);

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let ab = aggregate(
        &[RootSpec::new("A", &a), RootSpec::new("B", &b)],
        &classifier,
        &reporter,
    )
    .unwrap();
    let ba = aggregate(
        &[RootSpec::new("B", &b), RootSpec::new("A", &a)],
        &classifier,
        &reporter,
    )
    .unwrap();

    assert_eq!(ab.table.rows_for("A"), ba.table.rows_for("A"));
    assert_eq!(ab.table.rows_for("B"), ba.table.rows_for("B"));
    assert_eq!(ab.table.rows()[0].root, "A");
    assert_eq!(ba.table.rows()[0].root, "B");
}

#[test]
fn missing_first_root_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("good.4gm");
    build_three_file_module(&good);

    let (tx, rx) = crossbeam_channel::unbounded();
    let classifier = Classifier::default();
    let reporter = Reporter::with_channel(tx);
    let result = aggregate(
        &root_specs([tmp.path().join("missing.4gm"), good.clone()]),
        &classifier,
        &reporter,
    )
    .unwrap();

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].root_id, "missing.4gm");
    assert_eq!(result.table.len(), 3);
    assert!(result.table.rows().iter().all(|r| r.root == "good.4gm"));

    let failed: Vec<_> = rx
        .try_iter()
        .filter(|e| matches!(e, AuditEvent::RootFailed { .. }))
        .collect();
    assert_eq!(failed.len(), 1);
}

#[test]
fn all_missing_roots_fail_together() {
    let tmp = TempDir::new().unwrap();

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let err = aggregate(
        &root_specs([tmp.path().join("x.4gm"), tmp.path().join("y.4gm")]),
        &classifier,
        &reporter,
    )
    .unwrap_err();

    match err {
        AggregateError::AllRootsFailed { failures } => assert_eq!(failures.len(), 2),
        other => panic!("expected AllRootsFailed, got {other:?}"),
    }
}

/// An empty module is a success with zero rows, not a failure.
#[test]
fn empty_root_is_a_success() {
    let tmp = TempDir::new().unwrap();
    let empty = tmp.path().join("empty.4gm");
    fs::create_dir(&empty).unwrap();

    let classifier = Classifier::default();
    let reporter = Reporter::silent();
    let result = aggregate(&root_specs([&empty]), &classifier, &reporter).unwrap();

    assert!(result.table.is_empty());
    assert_eq!(result.table.roots().len(), 1);
    assert_eq!(result.table.roots()[0].files, 0);
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_is_skipped_with_warning() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    build_module(tmp.path());
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_bytes(&locked.join("secret.4gl"), 1);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores directory permissions; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let classifier = Classifier::default();
    let reporter = Reporter::with_channel(tx);
    let rows: Vec<_> = walk(tmp.path(), &classifier, &reporter).unwrap().collect();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(rows.len(), 4);
    assert!(rx
        .try_iter()
        .any(|e| matches!(e, AuditEvent::EntrySkipped { .. })));
}

/// A file that cannot be stat'ed is skipped with a warning and the rest of
/// the root is still scanned. Works regardless of privileges.
#[cfg(unix)]
#[test]
fn unstatable_file_is_skipped_with_warning() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a.4gl"), 1);
    symlink(tmp.path().join("loop2"), tmp.path().join("loop1")).unwrap();
    symlink(tmp.path().join("loop1"), tmp.path().join("loop2")).unwrap();

    let (tx, rx) = crossbeam_channel::unbounded();
    let classifier = Classifier::default();
    let reporter = Reporter::with_channel(tx);
    let rows: Vec<_> = walk(tmp.path(), &classifier, &reporter)
        .unwrap()
        .map(|r| r.relative_path)
        .collect();

    assert_eq!(rows, vec!["a.4gl"]);
    let skipped: Vec<_> = rx
        .try_iter()
        .filter_map(|e| match e {
            AuditEvent::EntrySkipped { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(
        skipped,
        vec![tmp.path().join("loop1"), tmp.path().join("loop2")]
    );
}

/// A modification time outside the representable range costs one row, not
/// the whole audit.
#[test]
fn out_of_range_mtime_skips_only_that_file() {
    let tmp = TempDir::new().unwrap();
    let module = tmp.path().join("audittest.4gm");
    fs::create_dir(&module).unwrap();
    write_bytes(&module.join("ok.4gl"), 1);
    let future = module.join("future.4gl");
    write_bytes(&future, 1);

    // Not every filesystem stores a timestamp this far out.
    let far = FileTime::from_unix_time(10_000_000_000_000, 0);
    if filetime::set_file_mtime(&future, far).is_err()
        || FileTime::from_last_modification_time(&fs::metadata(&future).unwrap()) != far
    {
        return;
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let classifier = Classifier::default();
    let reporter = Reporter::with_channel(tx);
    let result = aggregate(&root_specs([&module]), &classifier, &reporter).unwrap();

    let rows: Vec<_> = result
        .table
        .rows()
        .iter()
        .map(|r| r.relative_path.as_str())
        .collect();
    assert_eq!(rows, vec!["ok.4gl"]);
    assert!(result.failures.is_empty());
    assert!(rx.try_iter().any(|e| matches!(
        e,
        AuditEvent::EntrySkipped { path, message } if path == future && message.contains("out of range")
    )));
}
