// Repository-wide churn integration tests

mod common;

use std::time::Duration;

use git_churn::{ChurnError, ChurnOptions, Whitespace};
use tokio_util::sync::CancellationToken;

fn options(whitespace: Whitespace) -> ChurnOptions {
    ChurnOptions::new(whitespace, Some(Duration::from_secs(30)))
}

/// Three commits: root with two files, an edit plus a new file, then a removal.
fn seed(repo: &git2::Repository) {
    common::add_commit(
        repo,
        &[("a.txt", "l1\nl2\n\nl4\n"), ("docs/b.md", "# B\n\ntext\n")],
        "C1",
    );
    common::add_commit(
        repo,
        &[("a.txt", "l1\nl2\n\nl4\nl5\n"), ("src/c.rs", "fn c() {}\n\n")],
        "C2",
    );
    common::remove_file_commit(repo, common::CAROL, "docs/b.md", "C3");
}

#[tokio::test]
async fn test_lines_after_matches_sum_of_file_locs() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();

    for ws in [Whitespace::Included, Whitespace::Excluded] {
        for rev in ["HEAD", "HEAD~1", "HEAD~2"] {
            let aggr = churn.aggregate_diff_metrics(rev, &options(ws), &cancel).await.unwrap();
            let files = churn.list_files(rev).unwrap();
            let total: usize = files
                .iter()
                .map(|f| churn.file_loc(rev, f, Whitespace::Included).unwrap().lines)
                .sum();
            assert_eq!(aggr.metrics.lines_after, total, "{} {:?}", rev, ws);
            assert_eq!(aggr.files_count, files.len());
        }
    }
}

#[tokio::test]
async fn test_new_and_deleted_files() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();
    let opts = options(Whitespace::Included);

    let edit = churn.aggregate_diff_metrics("HEAD~1", &opts, &cancel).await.unwrap();
    assert_eq!(edit.new_files, 1);
    assert_eq!(edit.deleted_files, 0);
    assert_eq!(edit.metrics.insertions, 1 + 2);
    assert_eq!(edit.metrics.deletions, 0);
    assert_eq!(edit.metrics.lines_before, 4 + 3);
    assert_eq!(edit.metrics.lines_after, 5 + 3 + 2);

    let removal = churn.aggregate_diff_metrics("HEAD", &opts, &cancel).await.unwrap();
    assert_eq!(removal.new_files, 0);
    assert_eq!(removal.deleted_files, 1);
    assert_eq!(removal.metrics.deletions, 3);
    assert_eq!(removal.files_count, 2);
}

#[tokio::test]
async fn test_root_commit_counts_everything_as_new() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();

    let root = churn
        .aggregate_diff_metrics("HEAD~2", &options(Whitespace::Excluded), &cancel)
        .await
        .unwrap();
    assert_eq!(root.metrics.lines_before, 0);
    assert_eq!(root.metrics.deletions, 0);
    // Blank lines are skipped as insertions but still counted as lines.
    assert_eq!(root.metrics.insertions, 3 + 2);
    assert_eq!(root.metrics.lines_after, 4 + 3);
    assert_eq!(root.new_files, 2);
    assert_eq!(root.files_count, 2);
}

#[tokio::test]
async fn test_timeout_cancels_query_only() {
    let (_dir, path, repo) = common::create_test_repo();
    let contents: Vec<(String, String)> = (0..300)
        .map(|i| (format!("src/f{}.txt", i), common::numbered_lines("line", 200)))
        .collect();
    let files: Vec<(&str, &str)> = contents.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    common::add_commit(&repo, &files, "bulk");

    let churn = common::open(&path);
    let cancel = CancellationToken::new();
    let opts = ChurnOptions::new(Whitespace::Included, Some(Duration::ZERO));

    let result = churn.aggregate_diff_metrics("HEAD", &opts, &cancel).await;
    assert!(matches!(result, Err(ChurnError::TimedOut(_))));
    assert!(!cancel.is_cancelled());

    // The handle stays usable after a timed-out query.
    let aggr = churn
        .aggregate_diff_metrics("HEAD", &options(Whitespace::Included), &cancel)
        .await
        .unwrap();
    assert_eq!(aggr.files_count, 300);
}

#[tokio::test]
async fn test_aggregate_is_repeatable() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();
    let opts = options(Whitespace::Excluded);

    let first = churn.aggregate_diff_metrics("HEAD~1", &opts, &cancel).await.unwrap();
    let second = churn.aggregate_diff_metrics("HEAD~1", &opts, &cancel).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_excluded_never_exceeds_included() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();

    let inc = churn
        .aggregate_diff_metrics("HEAD~1", &options(Whitespace::Included), &cancel)
        .await
        .unwrap();
    let exc = churn
        .aggregate_diff_metrics("HEAD~1", &options(Whitespace::Excluded), &cancel)
        .await
        .unwrap();
    assert!(exc.metrics.insertions <= inc.metrics.insertions);
    assert_eq!(exc.metrics.lines_before, inc.metrics.lines_before);
    assert_eq!(exc.metrics.lines_after, inc.metrics.lines_after);
    assert_eq!(exc.files_count, inc.files_count);
}

#[tokio::test]
async fn test_cancelled_query_fails() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = churn
        .aggregate_diff_metrics("HEAD", &options(Whitespace::Included), &cancel)
        .await;
    assert!(matches!(result, Err(ChurnError::Cancelled)));
}

#[tokio::test]
async fn test_unresolvable_revision_fails() {
    let (_dir, path, repo) = common::create_test_repo();
    seed(&repo);
    let churn = common::open(&path);
    let cancel = CancellationToken::new();

    let result = churn
        .aggregate_diff_metrics("nope", &options(Whitespace::Included), &cancel)
        .await;
    assert!(matches!(result, Err(ChurnError::UnresolvableRevision(_))));
    assert!(!cancel.is_cancelled());
}

#[tokio::test]
async fn test_submodule_bump_does_not_fail_aggregate() {
    let (_dir, path, repo) = common::create_test_repo();
    let before = repo.blob(b"one\n").unwrap();
    let after = repo.blob(b"one\ntwo\n").unwrap();
    let sub_old = git2::Oid::from_str("1111111111111111111111111111111111111111").unwrap();
    let sub_new = git2::Oid::from_str("2222222222222222222222222222222222222222").unwrap();
    common::commit_entries(&repo, &[("a.txt", before, 0o100644), ("sub", sub_old, 0o160000)], "add");
    common::commit_entries(&repo, &[("a.txt", after, 0o100644), ("sub", sub_new, 0o160000)], "bump");

    let churn = common::open(&path);
    let cancel = CancellationToken::new();
    let aggr = churn
        .aggregate_diff_metrics("HEAD", &options(Whitespace::Included), &cancel)
        .await
        .unwrap();
    assert_eq!(aggr.metrics.insertions, 1);
    assert_eq!(aggr.metrics.deletions, 0);
    assert_eq!(aggr.metrics.lines_before, 1);
    assert_eq!(aggr.metrics.lines_after, 2);
    assert_eq!(aggr.files_count, 1);
    assert_eq!((aggr.new_files, aggr.deleted_files), (0, 0));
}
