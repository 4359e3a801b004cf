//! Rendering of reconciliation results.
//!
//! The pretty format groups deviations by team project for terminals. The
//! JSON format is a stable document for pipelines.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use drift_core::{Deviation, DeviationSummary, DeviationType, Diagnostic, Findings};
use serde::Serialize;

use crate::errors::Error;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

/// The JSON report document.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub organization_url: &'a str,
    pub generated_at: DateTime<Utc>,
    pub has_drift: bool,
    pub summary: DeviationSummary,
    pub deviations: &'a [Deviation],
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> Report<'a> {
    pub fn new(
        findings: &'a Findings,
        organization_url: &'a str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            organization_url,
            generated_at,
            has_drift: findings.has_drift(),
            summary: findings.summary(),
            deviations: &findings.deviations,
            diagnostics: &findings.diagnostics,
        }
    }
}

/// Renders the findings of a run in the requested format.
pub fn render(report: &Report<'_>, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| Error::Output(format!("Failed to serialize report: {}", e))),
        OutputFormat::Pretty => Ok(render_pretty(report)),
    }
}

fn render_pretty(report: &Report<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n",
        "Drift report for".bold(),
        report.organization_url.bright_cyan()
    ));
    output.push_str(&format!(
        "{}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
    ));

    // Group by team project, keeping the order of first appearance.
    let mut projects: Vec<(&str, Vec<&Deviation>)> = Vec::new();
    for deviation in report.deviations {
        let name = deviation.team_project().name.as_str();
        match projects.iter_mut().find(|(n, _)| *n == name) {
            Some((_, list)) => list.push(deviation),
            None => projects.push((name, vec![deviation])),
        }
    }

    for (name, deviations) in &projects {
        output.push_str(&format!("\n{}\n", name.bold()));
        for deviation in deviations {
            output.push_str(&format!(
                "  {} {}\n",
                type_marker(deviation.deviation_type()),
                deviation
            ));
        }
    }

    if !report.diagnostics.is_empty() {
        output.push_str(&format!("\n{}:\n", "Diagnostics".yellow().bold()));
        for diagnostic in report.diagnostics {
            output.push_str(&format!("  {} {}\n", "⚠".yellow(), diagnostic));
        }
    }

    output.push('\n');
    let summary = &report.summary;
    if report.has_drift {
        output.push_str(&format!(
            "{} {} missing, {} obsolete, {} incorrect\n",
            format!("✗ {} deviation(s):", summary.total()).red().bold(),
            summary.missing,
            summary.obsolete,
            summary.incorrect
        ));
    } else {
        output.push_str(&format!("{}\n", "✓ No drift detected".green().bold()));
    }

    output
}

fn type_marker(deviation_type: DeviationType) -> String {
    match deviation_type {
        DeviationType::Missing => "[Missing]".red().to_string(),
        DeviationType::Obsolete => "[Obsolete]".yellow().to_string(),
        DeviationType::Incorrect => "[Incorrect]".magenta().to_string(),
    }
}
