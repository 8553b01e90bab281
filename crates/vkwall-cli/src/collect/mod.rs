//! `collect` command: gather wall posts from communities and export a report.
//!
//! Per-community failures are reported and skipped rather than propagated so
//! a single bad community does not abort the full run.

mod workflow;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use tokio::sync::mpsc;
use vkwall_core::{AppConfig, CollectionWindow, CommunityRef, SettingsStore, MAX_SAVED_GROUPS};
use vkwall_scraper::{CollectOptions, CollectionEngine, RateLimiter, VkClient};

use workflow::{run_collection, CollectEvent, CollectionReport};

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Community to collect: numeric id (-123), short name, or vk.com link.
    /// Repeat for several communities.
    #[arg(long = "group", short = 'g', allow_negative_numbers = true)]
    pub groups: Vec<String>,

    /// File with one community per line
    #[arg(long)]
    pub groups_file: Option<PathBuf>,

    /// First day of the window (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day of the window, inclusive (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub to: NaiveDate,

    /// Directory for the report; defaults to the last one used
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Resolve inputs and print the plan without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

/// Run a collection and export the posts found.
///
/// # Errors
///
/// Returns an error if no communities are given or remembered, an identifier
/// or the window is invalid, no token is available, the client cannot be
/// built, or the report cannot be written.
pub(crate) async fn run_collect(config: &AppConfig, args: CollectArgs) -> anyhow::Result<()> {
    let mut store = SettingsStore::open(&config.settings_path);

    let groups = gather_groups(&args.groups, args.groups_file.as_deref(), store.last_groups())?;
    if groups.is_empty() {
        anyhow::bail!("no communities given; pass --group or --groups-file");
    }
    let communities = groups
        .iter()
        .map(|g| CommunityRef::parse(g).with_context(|| format!("invalid community '{g}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let window = CollectionWindow::new(args.from, args.to)?;
    let output_dir = args.output.unwrap_or_else(|| store.last_output_dir());

    if args.dry_run {
        println!(
            "[dry-run] would collect {} communities from {} to {} into {}:",
            communities.len(),
            window.date_from(),
            window.date_to(),
            output_dir.display()
        );
        for community in &communities {
            println!("  {community}");
        }
        return Ok(());
    }

    let token = config
        .token
        .clone()
        .or_else(|| store.token())
        .context("no access token; set VKWALL_TOKEN or run `vkwall token check <TOKEN> --remember`")?;

    if let Err(e) = store
        .set_last_groups(&groups)
        .and_then(|()| store.set_last_output_dir(&output_dir))
    {
        tracing::warn!(error = %e, "failed to remember collection inputs");
    }

    let client = VkClient::with_base_url(
        &token,
        &config.api_version,
        config.request_timeout_secs,
        &config.api_base_url,
    )?;
    let engine = CollectionEngine::new(
        client,
        RateLimiter::new(Duration::from_millis(config.min_request_interval_ms)),
    )
    .with_options(CollectOptions {
        throttle_backoff: Duration::from_millis(config.throttle_backoff_ms),
        ..CollectOptions::default()
    });

    let report = run_in_background(engine, communities, window).await?;
    print_summary(&report);

    if report.cancelled {
        println!("Run cancelled; no report written.");
        return Ok(());
    }
    if report.posts.is_empty() {
        println!("No posts found in the selected window.");
        return Ok(());
    }

    let path = vkwall_export::export_posts(&report.posts, &output_dir)?;
    println!("Report saved: {}", path.display());
    Ok(())
}

/// Runs the collection on its own task while this task prints progress.
/// Ctrl-C requests cancellation, honoured between communities.
async fn run_in_background(
    mut engine: CollectionEngine<VkClient>,
    communities: Vec<CommunityRef>,
    window: CollectionWindow,
) -> anyhow::Result<CollectionReport> {
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let ctrl_c = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("cancellation requested; stopping after the current community");
                cancel.store(true, Ordering::Relaxed);
            }
        })
    };

    let worker = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            run_collection(&mut engine, &communities, &window, &cancel, &tx).await
        })
    };

    while let Some(event) = rx.recv().await {
        println!("{}", describe_event(&event));
    }

    let report = worker.await.context("collection task failed")?;
    ctrl_c.abort();
    Ok(report)
}

/// Merges groups from flags and file, falling back to `saved` when both are
/// empty, and keeps at most [`MAX_SAVED_GROUPS`].
fn gather_groups(
    flags: &[String],
    file: Option<&Path>,
    saved: &[String],
) -> anyhow::Result<Vec<String>> {
    let mut groups: Vec<String> = flags
        .iter()
        .map(|g| g.trim().to_owned())
        .filter(|g| !g.is_empty())
        .collect();

    if let Some(path) = file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read groups file {}", path.display()))?;
        groups.extend(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned),
        );
    }

    if groups.is_empty() && !saved.is_empty() {
        tracing::info!(count = saved.len(), "using communities from the previous run");
        groups = saved.to_vec();
    }

    if groups.len() > MAX_SAVED_GROUPS {
        tracing::warn!(
            given = groups.len(),
            limit = MAX_SAVED_GROUPS,
            "too many communities; collecting only the first ones"
        );
        groups.truncate(MAX_SAVED_GROUPS);
    }

    Ok(groups)
}

fn describe_event(event: &CollectEvent) -> String {
    match event {
        CollectEvent::Started {
            community,
            position,
            total,
        } => format!("[{position}/{total}] {community}: collecting..."),
        CollectEvent::Finished {
            community,
            name,
            collected,
            status,
        } => format!("  {community} ({name}): {collected} posts ({status})"),
        CollectEvent::Failed { community, error } => format!("  {community}: FAILED: {error}"),
        CollectEvent::Cancelled { remaining } => {
            format!("Cancelled; {remaining} communities skipped")
        }
    }
}

fn print_summary(report: &CollectionReport) {
    println!(
        "Collected {} posts from {} communities; {} failed.",
        report.posts.len(),
        report.completed.len(),
        report.failures.len()
    );
    for summary in report.partial() {
        println!(
            "  warning: {} ({}) may be incomplete: {}",
            summary.community, summary.name, summary.status
        );
    }
    for failure in &report.failures {
        println!("  failed: {}: {}", failure.community, failure.error);
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
