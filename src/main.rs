//! git-churn - code churn metrics for git commits and revision ranges
//!
//! # Usage
//! ```bash
//! git-churn metrics --commit HEAD --file src/lib.rs   # One file at one commit
//! git-churn aggregate --commit v1.2.0                 # Whole tree at one commit
//! git-churn authors v1.0.0 v1.2.0 --file src/lib.rs   # Who touched a file
//! git-churn --repo https://github.com/o/r.git rev-list HEAD~5 HEAD
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_churn::task::{run_blocking, with_deadline};
use git_churn::{ChurnOptions, GitRepository, SharedRepo, Whitespace};

/// git-churn - insertions, deletions and authorship from git history
#[derive(Parser)]
#[command(name = "git-churn")]
#[command(about = "Code churn metrics for git commits and revision ranges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository path, or a remote URL to clone into a temporary directory
    #[arg(short, long, default_value = ".", global = true)]
    repo: String,

    /// Ignore lines that are empty after trimming whitespace
    #[arg(short = 'w', long, global = true)]
    exclude_whitespace: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS", env = "GIT_CHURN_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Churn of one file in one commit
    Metrics {
        #[arg(short, long, default_value = "HEAD")]
        commit: String,
        #[arg(short, long)]
        file: String,
    },
    /// Churn of every file in one commit
    Aggregate {
        #[arg(short, long, default_value = "HEAD")]
        commit: String,
    },
    /// Deleted line numbers per file, relative to the parent commit
    DeletedLines {
        #[arg(short, long, default_value = "HEAD")]
        commit: String,
    },
    /// Commits reachable from END but not from BEGIN, newest first
    RevList { begin: String, end: String },
    /// Distinct author emails of commits in BEGIN..END containing the file
    Authors {
        begin: String,
        end: String,
        #[arg(short, long)]
        file: String,
    },
    /// Line count of a file at a commit
    Loc {
        #[arg(short, long, default_value = "HEAD")]
        commit: String,
        #[arg(short, long)]
        file: String,
    },
    /// Per-line attribution of a file at a commit
    Blame {
        #[arg(short, long, default_value = "HEAD")]
        commit: String,
        path: String,
    },
    /// The commit HEAD points at
    Head,
    /// Local branches
    Branches,
    /// Tags and the commits they point at
    Tags,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a blocking repository query under the configured deadline and print it.
async fn query<T, F>(
    repo: &SharedRepo,
    options: &ChurnOptions,
    cancel: &CancellationToken,
    f: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&GitRepository, CancellationToken) -> git_churn::Result<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let repo = Arc::clone(repo);
    let task = run_blocking(cancel, move |token| f(repo.as_ref(), token));
    let value = with_deadline(options.timeout, cancel, task).await?;
    print_json(&value)
}

async fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<()> {
    let options = ChurnOptions::new(
        Whitespace::from_exclude_flag(cli.exclude_whitespace),
        cli.timeout.map(Duration::from_secs),
    );
    let ws = options.whitespace;

    let source = cli.repo.clone();
    let repo: SharedRepo = Arc::new(
        run_blocking(&cancel, move |_| GitRepository::open_or_clone(&source)).await?,
    );
    tracing::debug!("Opened {} ({})", repo.source, repo.git_dir.display());

    match cli.command {
        Commands::Metrics { commit, file } => {
            query(&repo, &options, &cancel, move |r, _| r.file_diff_metrics(&commit, &file, ws)).await
        }
        Commands::Aggregate { commit } => {
            let metrics = repo.aggregate_diff_metrics(&commit, &options, &cancel).await?;
            print_json(&metrics)
        }
        Commands::DeletedLines { commit } => {
            query(&repo, &options, &cancel, move |r, _| r.deleted_line_numbers(&commit, ws)).await
        }
        Commands::RevList { begin, end } => {
            query(&repo, &options, &cancel, move |r, _| r.rev_list(&begin, &end)).await
        }
        Commands::Authors { begin, end, file } => {
            query(&repo, &options, &cancel, move |r, token| {
                r.distinct_author_emails(&begin, &end, &file, &token)
            })
            .await
        }
        Commands::Loc { commit, file } => {
            query(&repo, &options, &cancel, move |r, _| r.file_loc(&commit, &file, ws)).await
        }
        Commands::Blame { commit, path } => {
            query(&repo, &options, &cancel, move |r, _| r.blame(&path, &commit)).await
        }
        Commands::Head => query(&repo, &options, &cancel, |r, _| r.head_commit()).await,
        Commands::Branches => query(&repo, &options, &cancel, |r, _| r.branches()).await,
        Commands::Tags => query(&repo, &options, &cancel, |r, _| r.tags()).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n  Cancelling...");
            on_interrupt.cancel();
        }
    });

    match run(cli, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}
