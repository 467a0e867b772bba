//! CLI output formatting.
//!
//! Every image gets a header line with its 1-based position and the
//! input → output file names, followed by indented context: the geometry that
//! was applied, or the failure.
//!
//! ```text
//! Resizing 3 images with 10 workers
//! 001 beach.jpg → beach.png
//!     400x200 → 256x128 (area), pad top 64 bottom 64
//! 002 cat.png → cat.png
//!     FAILED: Failed to decode in/cat.png: ...
//! 003 icon.bmp → icon.png
//!     32x32 → 256x256 (cubic)
//!
//! Resized 2 of 3 images into out
//! Failed
//!     002 cat.png: Failed to decode in/cat.png: ...
//! ```
//!
//! Image lines arrive in completion order, so indices are not sequential when
//! more than one worker runs.
//!
//! Each `format_*` function returns `Vec<String>` and has no side effects; the
//! `print_*` wrappers write to stdout.

use crate::imaging::{Filter, Padding, ResizeOutcome};
use crate::process::{ImageStatus, ProcessEvent, RunReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn filter_name(filter: Filter) -> &'static str {
    match filter {
        Filter::Area => "area",
        Filter::Cubic => "cubic",
    }
}

/// Padding only ever lies on one axis.
fn padding_detail(padding: &Padding) -> Option<String> {
    if padding.is_empty() {
        None
    } else if padding.top + padding.bottom > 0 {
        Some(format!("pad top {} bottom {}", padding.top, padding.bottom))
    } else {
        Some(format!("pad left {} right {}", padding.left, padding.right))
    }
}

/// One-line geometry summary.
///
/// ```text
/// 400x200 → 256x128 (area), pad top 64 bottom 64
/// ```
fn outcome_detail(outcome: &ResizeOutcome) -> String {
    let (src_w, src_h) = outcome.source;
    let plan = &outcome.plan;
    let base = format!(
        "{}x{} → {}x{} ({})",
        src_w,
        src_h,
        plan.width,
        plan.height,
        filter_name(plan.filter)
    );
    match padding_detail(&plan.padding) {
        Some(pad) => format!("{base}, {pad}"),
        None => base,
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::RunStarted { total, workers } => {
            let noun = if *total == 1 { "image" } else { "images" };
            vec![format!("Resizing {total} {noun} with {workers} workers")]
        }
        ProcessEvent::ImageFinished {
            index,
            input,
            output,
            status,
            ..
        } => {
            let header = format!(
                "{} {} → {}",
                format_index(*index),
                file_name(input),
                file_name(output)
            );
            let detail = match status {
                ImageStatus::Resized(outcome) => outcome_detail(outcome),
                ImageStatus::Failed(message) => format!("FAILED: {message}"),
            };
            vec![header, format!("{}{}", indent(1), detail)]
        }
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run summary: counts, failures, then collisions.
pub fn format_summary(report: &RunReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Resized {} of {} images into {}",
        report.succeeded(),
        report.total(),
        report.output_dir.display()
    )];

    let failed: Vec<String> = report
        .outcomes
        .iter()
        .filter_map(|o| {
            o.result.as_ref().err().map(|err| {
                format!(
                    "{}{} {}: {}",
                    indent(1),
                    format_index(o.index),
                    file_name(&o.task.input),
                    err
                )
            })
        })
        .collect();
    if !failed.is_empty() {
        lines.push("Failed".to_string());
        lines.extend(failed);
    }

    if !report.collisions.is_empty() {
        lines.push("Collisions (only one input survives per output)".to_string());
        for collision in &report.collisions {
            let inputs: Vec<String> = collision
                .inputs
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            lines.push(format!(
                "{}{} ← {}",
                indent(1),
                file_name(&collision.output),
                inputs.join(", ")
            ));
        }
    }
    lines
}

pub fn print_summary(report: &RunReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
