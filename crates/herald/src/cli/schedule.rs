//! Scheduling and review command handlers.

use super::commands::OutputFormat;
use super::output::{preview, print_json};
use crate::app::{build_orchestrator, build_repository};
use crate::config::HeraldConfig;
use herald_core::ContentItem;
use herald_error::HeraldResult;
use herald_schedule::{PostingOrchestrator, ReviewEntry, SweepReport};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

fn orchestrator(config: &HeraldConfig) -> HeraldResult<PostingOrchestrator> {
    let repository = build_repository(config)?;
    build_orchestrator(config, repository)
}

async fn sweep_once(
    orchestrator: &PostingOrchestrator,
    company: Option<i32>,
) -> HeraldResult<Vec<SweepReport>> {
    match company {
        Some(company_id) => Ok(vec![orchestrator.check_due(company_id).await?]),
        None => orchestrator.sweep_all().await,
    }
}

/// Run one sweep and print what was published.
pub async fn handle_sweep(
    config: &HeraldConfig,
    company: Option<i32>,
    format: OutputFormat,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let reports = sweep_once(&orchestrator, company).await?;

    match format {
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Human => {
            for report in &reports {
                print_report(report);
            }
            let posted: usize = reports.iter().map(SweepReport::posted_count).sum();
            println!("Swept {} companies, {} posts published", reports.len(), posted);
        }
    }
    Ok(())
}

fn print_report(report: &SweepReport) {
    let strategy = report
        .strategy_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!("Company {} (strategy {}):", report.company_id(), strategy);
    for posted in report.posted() {
        println!(
            "  posted  #{:<6} {:<10} {:<10} {} -> {}{}",
            posted.content_id(),
            posted.platform().to_string(),
            posted.action(),
            posted.scheduled_time(),
            posted.post_id(),
            if *posted.was_past_due() { " (past due)" } else { "" }
        );
    }
    for failed in report.failed() {
        match failed.post_id() {
            Some(post_id) => println!(
                "  failed  #{:<6} {:<10} {} (live as {})",
                failed.content_id(),
                failed.platform().to_string(),
                failed.error(),
                post_id
            ),
            None => println!(
                "  failed  #{:<6} {:<10} {}",
                failed.content_id(),
                failed.platform().to_string(),
                failed.error()
            ),
        }
    }
    for id in report.skipped() {
        println!("  skipped #{}", id);
    }
}

/// Sweep on an interval until interrupted with Ctrl+C.
///
/// A failed sweep is logged and the loop continues.
pub async fn handle_watch(
    config: &HeraldConfig,
    interval: Option<u64>,
    company: Option<i32>,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let period = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.schedule.poll_interval());

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = period.as_secs(), ?company, "Watching for due content. Press CTRL+C to stop.");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sweep_once(&orchestrator, company).await {
                    Ok(reports) => {
                        let posted: usize = reports.iter().map(SweepReport::posted_count).sum();
                        let failed: usize = reports.iter().map(|r| r.failed().len()).sum();
                        info!(companies = reports.len(), posted, failed, "Sweep finished");
                    }
                    Err(e) => error!(error = %e, "Sweep failed"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!(error = %e, "Failed to listen for CTRL+C");
                }
                info!("Shutdown signal received, stopping");
                break;
            }
        }
    }
    Ok(())
}

/// Print the review queue for a company.
pub async fn handle_review(
    config: &HeraldConfig,
    company: i32,
    format: OutputFormat,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let entries = orchestrator.review_queue(company).await?;

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Human => {
            println!("Review queue for company {}:", company);
            println!("{:-<80}", "");
            for entry in &entries {
                print_entry(entry);
            }
            println!("{:-<80}", "");
            println!("Total: {} items", entries.len());
        }
    }
    Ok(())
}

fn print_entry(entry: &ReviewEntry) {
    let item = entry.item();
    println!(
        "#{:<6} {:<10} {:<18} {:<14} {:02}:00{} {}",
        item.id,
        item.platform.to_string(),
        item.content_type.label(),
        item.status.to_string(),
        entry.scheduled_hour(),
        if *entry.past_due() { "!" } else { " " },
        preview(&item.caption, 40)
    );
}

fn print_item(action: &str, item: &ContentItem) {
    println!(
        "{} content item #{} ({} {}), now {}",
        action,
        item.id,
        item.platform,
        item.content_type.label(),
        item.status
    );
}

/// Approve a content item.
pub async fn handle_approve(
    config: &HeraldConfig,
    content_id: i32,
    user_id: i32,
    caption: Option<String>,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let item = orchestrator
        .approve(content_id, user_id, caption.as_deref())
        .await?;
    print_item("Approved", &item);
    if let Some(tags) = &item.hashtags {
        println!("Hashtags: {}", tags);
    }
    Ok(())
}

/// Publish a content item immediately.
pub async fn handle_publish_now(
    config: &HeraldConfig,
    content_id: i32,
    user_id: i32,
    caption: Option<String>,
    format: OutputFormat,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let posted = orchestrator
        .publish_now(content_id, user_id, caption.as_deref())
        .await?;

    match format {
        OutputFormat::Json => print_json(&posted)?,
        OutputFormat::Human => println!(
            "Published content item #{} to {} as {} -> {}",
            posted.content_id(),
            posted.platform(),
            posted.action(),
            posted.post_id()
        ),
    }
    Ok(())
}

/// Reject a content item.
pub async fn handle_reject(config: &HeraldConfig, content_id: i32, user_id: i32) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let item = orchestrator.reject(content_id, user_id).await?;
    print_item("Rejected", &item);
    Ok(())
}

/// Approve a strategy.
pub async fn handle_approve_strategy(
    config: &HeraldConfig,
    strategy_id: i32,
    user_id: i32,
) -> HeraldResult<()> {
    let orchestrator = orchestrator(config)?;
    let strategy = orchestrator.approve_strategy(strategy_id, user_id).await?;
    println!(
        "Approved strategy #{} for company {}, now {}",
        strategy.id(),
        strategy.company_id(),
        strategy.status()
    );
    Ok(())
}
