//! Markdown reporter for comparison views

use anyhow::Result;
use std::fmt::Write;

use super::{format_interval, format_score};
use crate::pipeline::{ComparisonView, MetricChart};

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Format a comparison view as markdown tables
    pub fn format(view: &ComparisonView) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Browser Comparison")?;
        writeln!(output)?;
        writeln!(output, "- **Baseline:** {}", view.baseline)?;
        writeln!(
            output,
            "- **Sorted by:** {}",
            view.sort_metric.as_deref().unwrap_or("page")
        )?;
        writeln!(output, "- **Row limit:** {}", view.row_limit)?;
        writeln!(output)?;

        writeln!(output, "## Ranking")?;
        writeln!(output)?;
        writeln!(output, "| # | Page | Score |")?;
        writeln!(output, "|---|------|-------|")?;
        for (rank, group) in view.groups.iter().enumerate() {
            writeln!(
                output,
                "| {} | {} | {} |",
                rank + 1,
                escape(&group.page),
                format_score(group.score)
            )?;
        }
        writeln!(output)?;

        for chart in &view.charts {
            Self::format_chart(&mut output, chart)?;
        }

        if !view.warnings.is_empty() {
            writeln!(output, "## Warnings")?;
            writeln!(output)?;
            for warning in &view.warnings {
                writeln!(output, "- {}", warning)?;
            }
            writeln!(output)?;
        }

        Ok(output)
    }

    fn format_chart(output: &mut String, chart: &MetricChart) -> Result<()> {
        writeln!(output, "## {}", chart.metric)?;
        writeln!(output)?;

        write!(output, "| Page |")?;
        for browser in &chart.matrix.browsers {
            write!(output, " {} |", escape(browser))?;
        }
        writeln!(output)?;

        write!(output, "|------|")?;
        for _ in &chart.matrix.browsers {
            write!(output, "------:|")?;
        }
        writeln!(output)?;

        for row in &chart.matrix.rows {
            write!(output, "| {} |", escape(&row.page))?;
            for interval in &row.intervals {
                write!(output, " {} |", format_interval(interval))?;
            }
            writeln!(output)?;
        }
        writeln!(output)?;
        Ok(())
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
