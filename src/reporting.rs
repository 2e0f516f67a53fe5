// src/reporting.rs
//! Console output for analysis runs, the graph and the changesets.

use crate::analysis::AnalysisReport;
use crate::change::{ApplyReport, ChangeEntry, ResolveReport};
use crate::gav::Gav;
use crate::graph::DependencyGraph;
use crate::session::ChangeListing;
use colored::Colorize;
use std::fmt::{Display, Write};
use std::time::Duration;

/// Prints the analysis summary followed by every problem found.
pub fn print_analysis(report: &AnalysisReport) {
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", " ANALYSIS REPORT".bold());
    println!("{}", "─".repeat(60).dimmed());
    println!();

    println!("  {} {}", "Descriptors:".white(), report.files.len());
    println!("  {} {}", "Loaded:".white(), report.loaded.len());
    println!("  {} {}", "Completed:".white(), report.completed.len());
    println!("  {} {}", "Added to graph:".white(), report.added_to_graph.len());
    println!("  {} {}", "Duplicates:".white(), count(report.duplicates.len()));
    println!("  {} {}", "Unresolvable:".white(), count(report.unresolvable.len()));
    println!("  {} {}", "Load failures:".white(), count(report.load_failures.len()));
    println!("  {} {}", "Graph failures:".white(), count(report.graph_failures.len()));
    println!("  {} {}", "Duration:".white(), format_duration(report.elapsed));

    if report.has_problems() {
        println!();
        for failure in report.duplicates.iter().chain(&report.unresolvable) {
            println!("  {} {}", "warning:".yellow().bold(), failure.error);
        }
        for error in report.load_failures.iter().chain(&report.graph_failures) {
            println!("  {} {error}", "error:".red().bold());
        }
    }

    println!();
    println!("{}", "─".repeat(60).dimmed());
}

fn count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}

fn format_duration(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Prints graph nodes with their outgoing relations. With `focus`, only
/// that node's incoming and outgoing relations.
pub fn print_graph(graph: &DependencyGraph, focus: Option<&Gav>) {
    if let Some(gav) = focus {
        if !graph.contains_gav(gav) {
            println!("{} {gav} is not in the graph", "warning:".yellow().bold());
            return;
        }
        println!("{}", gav.to_string().bold());
        for relation in graph.relations_from(gav) {
            println!("  {} {relation}", "out".cyan());
        }
        for relation in graph.relations_to(gav) {
            println!("  {} {relation}", "in ".magenta());
        }
        return;
    }

    for gav in graph.gavs() {
        println!("{}", gav.to_string().bold());
        for relation in graph.relations_from(gav) {
            println!("  {relation}");
        }
    }
    println!(
        "{} nodes, {} relations",
        graph.node_count(),
        graph.relation_count()
    );
}

/// Renders both changesets, one change per line with its causes.
#[must_use]
pub fn render_changes(listing: &ChangeListing<'_>) -> String {
    let mut out = String::new();
    render_section(&mut out, "graph", &listing.graph);
    render_section(&mut out, "project", &listing.project);
    out
}

fn render_section<C: Display>(out: &mut String, name: &str, entries: &[&ChangeEntry<C>]) {
    if entries.is_empty() {
        let _ = writeln!(out, "empty {name} changeset");
        return;
    }
    let _ = writeln!(out, "session's {name} changeset:");
    for entry in entries {
        let _ = write!(out, "  {}", entry.change);
        for cause in &entry.causes {
            let _ = write!(out, " {}", cause.to_string().dimmed());
        }
        out.push('\n');
    }
}

pub fn print_changes(listing: &ChangeListing<'_>) {
    print!("{}", render_changes(listing));
}

pub fn print_resolve(report: &ResolveReport) {
    println!("resolved {} graph changes", report.drained);
    println!(
        "{} project changes added",
        report.project_changes.to_string().green()
    );
    for error in &report.unknown {
        println!("{} {error}", "warning:".yellow().bold());
    }
    for change in &report.unsupported {
        println!(
            "{} relation changes are not resolved yet, dropped {change}",
            "warning:".yellow().bold()
        );
    }
}

pub fn print_apply(report: &ApplyReport, performed: &[String]) {
    for line in performed {
        println!("  {} {line}", "would apply".cyan());
    }
    println!(
        "{} applied, {} kept",
        report.applied.len().to_string().green(),
        count(report.failed.len())
    );
    for (change, reason) in &report.failed {
        println!("  {} {change}: {reason}", "error:".red().bold());
    }
}
