//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::LooperConfig;
use crate::app::{AppContainer, LoopReport, PlanPreview};
use crate::cli::args::{CleanArgs, CreateArgs, PlanArgs};
use crate::output::artifacts::{scan, sweep};
use crate::planner::{LoopPlan, SegmentRef};
use crate::utils::time::format_duration;

/// Execute the create command
pub async fn create(container: &dyn AppContainer, args: CreateArgs) -> Result<()> {
    info!("Creating loop from {}", args.uri);

    let report = container.loop_interactor().run(args.request()).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Execute the plan command
pub async fn plan(container: &dyn AppContainer, args: PlanArgs) -> Result<()> {
    let preview = container.loop_interactor().preview(args.request()).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&preview).context("Failed to serialize plan")?
        );
    } else {
        print_preview(&preview);
    }
    Ok(())
}

/// Execute the clean command
pub async fn clean(config: &LooperConfig, args: CleanArgs) -> Result<()> {
    let dir = &config.work_dir;
    let prefix = &config.temp_prefix;

    if args.dry_run {
        let leftovers = scan(dir, prefix);
        if leftovers.is_empty() {
            println!("No temporary files found in {}", dir.display());
        }
        for path in leftovers {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let report = sweep(dir, prefix).await;
    for path in &report.removed {
        println!("Removed {}", path.display());
    }
    if !report.is_clean() {
        warn!(
            "{} temporary file(s) could not be removed",
            report.failed.len()
        );
    }
    println!(
        "Removed {} temporary file(s) from {}",
        report.removed.len(),
        dir.display()
    );
    Ok(())
}

fn print_report(report: &LoopReport) {
    if let Some(change) = &report.normalization {
        println!(
            "Note: the destination was renamed to {} to match the source container",
            change.corrected.display()
        );
    }
    println!("Done! Output written to {}", report.destination.display());
    println!(
        "Length: {} ({} loop passes)",
        format_duration(report.covered_duration),
        report.plan.passes()
    );
    if report.cleanup.failed > 0 {
        println!(
            "{} temporary file(s) could not be removed; run `create_loop clean` to retry",
            report.cleanup.failed
        );
    }
}

fn print_preview(preview: &PlanPreview) {
    let window = &preview.window;
    println!("Source:       {}", preview.source);
    println!("Duration:     {}", format_duration(preview.media_duration));
    if window.is_full_range() {
        println!("Window:       whole video");
    } else {
        println!(
            "Window:       {} - {} ({})",
            format_duration(window.start()),
            format_duration(window.end()),
            format_duration(window.length())
        );
    }
    println!("Destination:  {}", preview.destination.display());
    print_plan(&preview.plan);
}

fn print_plan(plan: &LoopPlan) {
    if let Some(doubling) = plan.doubling {
        println!(
            "Intermediate: {} copies ({})",
            doubling.repeats,
            format_duration(doubling.duration)
        );
    }
    let entries: Vec<String> = plan
        .entries
        .iter()
        .map(|entry| {
            let unit = match entry.segment {
                SegmentRef::Original => "segment",
                SegmentRef::Intermediate => "intermediate",
            };
            format!("{} x {}", entry.repeats, unit)
        })
        .collect();
    println!("Final:        {}", entries.join(" + "));
    println!(
        "Covers:       {} (over target by {}s)",
        format_duration(plan.covered_duration()),
        plan.overshoot()
    );
}
