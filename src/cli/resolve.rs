//! Batch command - reconcile merge commits against the tracker

use crate::cli::Cli;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use backport_resolve::backport::{
    BatchOutcome, BatchRequest, DispositionSource, ItemReport, ItemStatus, UpdateOptions,
    run_batch,
};
use backport_resolve::error::{Error, Result};
use backport_resolve::tracker::TrackerService;
use backport_resolve::types::Disposition;
use dialoguer::Input;
use std::time::Duration;

/// Run the reconciliation batch described by the CLI arguments.
pub async fn run(cli: &Cli) -> Result<BatchOutcome> {
    let ctx = CommandContext::new(cli).await?;

    let request = BatchRequest {
        release: ctx.release.clone(),
        single_pr: cli.pr,
        update_options: UpdateOptions {
            dry_run: cli.dry_run,
            delay: Duration::from_secs(cli.delay),
        },
    };

    let outcome = if cli.dry_run {
        // Dry-run never blocks on a terminal; every item takes its
        // default disposition.
        let mut source = DefaultDispositions {
            tracker: ctx.tracker.as_ref(),
        };
        run_batch(
            &ctx.repo,
            ctx.host.as_ref(),
            ctx.tracker.as_ref(),
            &ctx.catalogs,
            &mut source,
            &request,
        )
        .await?
    } else {
        let mut source = PromptDispositions {
            tracker: ctx.tracker.as_ref(),
        };
        run_batch(
            &ctx.repo,
            ctx.host.as_ref(),
            ctx.tracker.as_ref(),
            &ctx.catalogs,
            &mut source,
            &request,
        )
        .await?
    };

    print_summary(&outcome, cli.dry_run);
    Ok(outcome)
}

/// Interactive disposition source backed by a terminal prompt
struct PromptDispositions<'a> {
    tracker: &'a dyn TrackerService,
}

impl DispositionSource for PromptDispositions<'_> {
    fn choose(&mut self, report: &ItemReport) -> Result<Disposition> {
        print_report(report, self.tracker);
        let can_update = report.can_update();
        let menu = if can_update {
            "[u]pdate / [i]gnore / [a]bort (default: u)"
        } else {
            "[i]gnore / [a]bort (default: i)"
        };
        loop {
            let answer: String = Input::new()
                .with_prompt(menu)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| Error::Prompt(e.to_string()))?;
            if let Some(disposition) = parse_disposition(&answer, can_update) {
                return Ok(disposition);
            }
            println!("{}", "Please answer u, i, or a.".warn());
        }
    }
}

/// Non-interactive source taking every item's documented default
struct DefaultDispositions<'a> {
    tracker: &'a dyn TrackerService,
}

impl DispositionSource for DefaultDispositions<'_> {
    fn choose(&mut self, report: &ItemReport) -> Result<Disposition> {
        print_report(report, self.tracker);
        Ok(if report.can_update() {
            Disposition::Update
        } else {
            Disposition::Ignore
        })
    }
}

/// Map a single-letter answer to a disposition; empty input means the
/// menu's default.
fn parse_disposition(answer: &str, can_update: bool) -> Option<Disposition> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(if can_update {
            Disposition::Update
        } else {
            Disposition::Ignore
        }),
        "u" | "update" if can_update => Some(Disposition::Update),
        "i" | "ignore" => Some(Disposition::Ignore),
        "a" | "abort" => Some(Disposition::Abort),
        _ => None,
    }
}

fn print_report(report: &ItemReport, service: &dyn TrackerService) {
    println!();
    println!("{}", report.line.emphasis());
    match &report.status {
        ItemStatus::Resolved(aggregate) => {
            println!(
                "  PR #{}: {}",
                aggregate.pr.number,
                aggregate.pr.title.accent()
            );
            println!(
                "  {} {} {} {} ({})",
                "base".muted(),
                aggregate.base_version.to_string().accent(),
                "target".muted(),
                aggregate.target_version.to_string().accent(),
                aggregate.release
            );
            for tracker in &aggregate.trackers {
                let issue = &tracker.issue;
                let mut pending = Vec::new();
                if tracker.needs_status_update {
                    pending.push("status");
                }
                if tracker.needs_target_version_update {
                    pending.push("target version");
                }
                if tracker.needs_backlink {
                    pending.push("back-link");
                }
                let state = if pending.is_empty() {
                    format!("{} consistent", check())
                } else {
                    format!("needs: {}", pending.join(", ")).warn()
                };
                println!(
                    "  issue {} [{}] {} - {state}",
                    issue.id,
                    issue.status,
                    issue.subject.muted(),
                );
                println!("    {}", service.issue_url(issue.id).muted());
            }
        }
        ItemStatus::Unresolvable(reason) => {
            println!("  {} {}", "cannot resolve:".warn(), reason);
        }
    }
}

fn print_summary(outcome: &BatchOutcome, dry_run: bool) {
    println!();
    if outcome.aborted {
        println!("{}", "Batch aborted.".warn());
    } else if dry_run {
        println!("{} Dry run complete.", check());
    } else {
        println!("{} Batch complete.", check());
    }
    println!(
        "  {} processed, {} updated, {} ignored",
        outcome.processed, outcome.updated, outcome.ignored
    );
}
