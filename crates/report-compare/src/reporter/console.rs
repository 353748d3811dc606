//! Console reporter for comparison views
//!
//! Provides human-readable output with one ASCII table per metric.

use anyhow::Result;
use std::fmt::Write;

use super::{format_interval, format_score};
use crate::pipeline::{ComparisonView, MetricChart};

const PAGE_WIDTH: usize = 24;
const CELL_WIDTH: usize = 26;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a comparison view for console output
    pub fn format(view: &ComparisonView) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                    BROWSER COMPARISON                        ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Baseline:     {}", view.baseline)?;
        writeln!(
            output,
            "Sorted by:    {}",
            view.sort_metric.as_deref().unwrap_or("page")
        )?;
        writeln!(output, "Row limit:    {}", view.row_limit)?;
        writeln!(output, "Browsers:     {}", view.browsers.join(", "))?;
        writeln!(output, "Page groups:  {}", view.groups.len())?;
        writeln!(output)?;

        Self::format_ranking(&mut output, view)?;

        for chart in &view.charts {
            Self::format_chart(&mut output, chart)?;
        }

        if !view.warnings.is_empty() {
            writeln!(output, "────────────────────────────────────────────────────────────────")?;
            writeln!(output, "Warnings:")?;
            for warning in &view.warnings {
                writeln!(output, "  • {}", warning)?;
            }
            writeln!(output)?;
        }

        Ok(output)
    }

    fn format_ranking(output: &mut String, view: &ComparisonView) -> Result<()> {
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Ranking")?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        for (rank, group) in view.groups.iter().enumerate() {
            writeln!(
                output,
                "  {:>3}. {:<w$} {:>12}",
                rank + 1,
                truncate(&group.page, PAGE_WIDTH),
                format_score(group.score),
                w = PAGE_WIDTH
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_chart(output: &mut String, chart: &MetricChart) -> Result<()> {
        let matrix = &chart.matrix;

        writeln!(output, "Metric: {}", chart.metric)?;

        let rule = |left: &str, mid: &str, right: &str| {
            let mut line = format!("  {}{}", left, "─".repeat(PAGE_WIDTH + 2));
            for _ in &matrix.browsers {
                line.push_str(mid);
                line.push_str(&"─".repeat(CELL_WIDTH + 2));
            }
            line.push_str(right);
            line
        };

        writeln!(output, "{}", rule("┌", "┬", "┐"))?;
        let mut header = format!("  │ {:<w$} │", "Page", w = PAGE_WIDTH);
        for browser in &matrix.browsers {
            write!(header, " {:^w$} │", truncate(browser, CELL_WIDTH), w = CELL_WIDTH)?;
        }
        writeln!(output, "{}", header)?;
        writeln!(output, "{}", rule("├", "┼", "┤"))?;

        for row in &matrix.rows {
            let mut line = format!("  │ {:<w$} │", truncate(&row.page, PAGE_WIDTH), w = PAGE_WIDTH);
            for interval in &row.intervals {
                write!(line, " {:>w$} │", format_interval(interval), w = CELL_WIDTH)?;
            }
            writeln!(output, "{}", line)?;
        }

        writeln!(output, "{}", rule("└", "┴", "┘"))?;
        writeln!(output)?;
        Ok(())
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareWarning;
    use crate::reporter::test_support::create_test_view;

    #[test]
    fn test_console_format_contains_header() {
        let view = create_test_view();
        let output = ConsoleReporter::format(&view).unwrap();

        assert!(output.contains("BROWSER COMPARISON"));
        assert!(output.contains("Baseline:     Firefox"));
        assert!(output.contains("Sorted by:    Load"));
    }

    #[test]
    fn test_console_format_contains_metric_tables() {
        let view = create_test_view();
        let output = ConsoleReporter::format(&view).unwrap();

        assert!(output.contains("Metric: Load"));
        assert!(output.contains("Metric: Paint"));
        assert!(output.contains("100.00 [98.00, 102.00]"));
        assert!(output.contains("Chrome"));
    }

    #[test]
    fn test_console_format_shows_ranking() {
        let view = create_test_view();
        let output = ConsoleReporter::format(&view).unwrap();

        assert!(output.contains("Ranking"));
        assert!(output.contains("  1. "));
        assert!(output.contains("  2. "));
    }

    #[test]
    fn test_console_format_shows_warnings() {
        let mut view = create_test_view();
        view.warnings.push(CompareWarning::UnparseableLimit {
            value: "lots".to_string(),
        });

        let output = ConsoleReporter::format(&view).unwrap();

        assert!(output.contains("Warnings:"));
        assert!(output.contains("lots"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-page-name", 6), "a-ver…");
    }
}
