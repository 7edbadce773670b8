/*!
 * Reporting functionality for ctxcopy
 *
 * Renders the end-of-run summary with the tabled library. Reports go to
 * stderr, since stdout may carry the artifact itself.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::tokenizer::TokenEstimate;
use crate::types::{EntryOutcome, WalkSummary};
use crate::utils::format_file_size;

/// Maximum number of left-out entries listed individually
const MAX_LISTED_ENTRIES: usize = 15;

/// Statistics for one run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the artifact went (clipboard, file path, stdout)
    pub destination: String,
    /// Time taken from first target to delivery
    pub duration: Duration,
    /// Number of targets processed
    pub targets: usize,
    /// Outcomes of every visited entry across targets
    pub summary: WalkSummary,
    /// Size of the final artifact in bytes
    pub artifact_bytes: usize,
    /// Heuristic token estimate of the artifact
    pub estimate: TokenEstimate,
    /// Exact token count, when a model tokenizer was requested
    pub exact_tokens: Option<usize>,
    /// Context window of the requested model
    pub context_window: Option<usize>,
}

/// Renders run results as console tables
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter;

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &RunReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let summary = &report.summary;
        let mut rows = vec![
            SummaryRow {
                key: "📤 Destination".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🎯 Targets".to_string(),
                value: self.format_number(report.targets),
            },
            SummaryRow {
                key: "📄 Files Added".to_string(),
                value: format!(
                    "{} ({})",
                    self.format_number(summary.files_added()),
                    format_file_size(summary.bytes_added())
                ),
            },
            SummaryRow {
                key: "🚫 Skipped".to_string(),
                value: self.format_number(summary.skipped()),
            },
            SummaryRow {
                key: "⚠️ Errors".to_string(),
                value: self.format_number(summary.errors()),
            },
            SummaryRow {
                key: "📦 Output Size".to_string(),
                value: format_file_size(report.artifact_bytes as u64),
            },
            SummaryRow {
                key: "🔢 LLM Tokens".to_string(),
                value: format!("{} (estimated)", self.format_number(report.estimate.tokens)),
            },
        ];

        if let Some(tokens) = report.exact_tokens {
            let value = match report.context_window {
                Some(window) if window > 0 => format!(
                    "{} (counted, {:.1}% of {} context)",
                    self.format_number(tokens),
                    tokens as f64 / window as f64 * 100.0,
                    self.format_number(window)
                ),
                _ => format!("{} (counted)", self.format_number(tokens)),
            };
            rows.push(SummaryRow {
                key: "🧮 Exact Tokens".to_string(),
                value,
            });
        }

        styled(Table::new(rows))
    }

    fn create_left_out_table(&self, report: &RunReport) -> Option<String> {
        #[derive(Tabled)]
        struct LeftOutRow {
            #[tabled(rename = "Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<LeftOutRow> = report
            .summary
            .entries
            .iter()
            .filter_map(|entry| {
                let reason = match &entry.outcome {
                    EntryOutcome::Serialized(_) => return None,
                    EntryOutcome::Skipped(reason) => reason.to_string(),
                    EntryOutcome::Errored(message) => format!("error: {}", message),
                };
                Some(LeftOutRow {
                    path: entry.path.clone(),
                    reason,
                })
            })
            .take(MAX_LISTED_ENTRIES)
            .collect();

        if rows.is_empty() {
            None
        } else {
            Some(styled(Table::new(rows)))
        }
    }

    /// Generate the report text
    pub fn generate_report(&self, report: &RunReport) -> String {
        let summary_title = "✅  BUNDLE COMPLETE";
        let summary_table = self.create_summary_table(report);

        match self.create_left_out_table(report) {
            Some(left_out) => {
                let title = if report.summary.skipped() + report.summary.errors() > MAX_LISTED_ENTRIES {
                    format!("🚫  FIRST {} LEFT-OUT ENTRIES", MAX_LISTED_ENTRIES)
                } else {
                    "🚫  LEFT-OUT ENTRIES".to_string()
                };
                format!(
                    "{}\n{}\n\n{}\n{}",
                    title, left_out, summary_title, summary_table
                )
            }
            None => format!("{}\n{}", summary_title, summary_table),
        }
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}
