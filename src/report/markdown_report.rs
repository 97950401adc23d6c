//! @ai:module:intent Markdown summary of an analysis run
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{AnalysisReport, GroupSummary, VariantStats};
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from an analysis
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes statistics tables as Markdown
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format a delta value with sign
    /// @ai:effects pure
    fn format_delta(value: f64) -> String {
        if value >= 0.0 {
            format!("+{:.2}%", value)
        } else {
            format!("{:.2}%", value)
        }
    }

    fn format_stat(value: Option<f64>) -> String {
        value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
    }

    /// @ai:intent Generate the document header
    /// @ai:effects pure
    fn generate_summary(report: &AnalysisReport) -> String {
        let mut output = String::new();

        writeln!(output, "# Performance Comparison").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", report.timestamp).unwrap();
        writeln!(output, "**Profile:** {}", report.profile).unwrap();
        writeln!(output, "**Plot type:** {}", report.plot_type).unwrap();
        writeln!(output, "**Samples:** {}", report.total_samples).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate one statistics table
    /// @ai:effects pure
    fn generate_table(rows: &[VariantStats]) -> String {
        let mut output = String::new();

        writeln!(
            output,
            "| Variant | Count | Mean | Median | Min | Max | Std | Mean Delta | Median Delta |"
        )
        .unwrap();
        writeln!(
            output,
            "|---------|-------|------|--------|-----|-----|-----|------------|--------------|"
        )
        .unwrap();

        for row in rows {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                row.variant,
                row.stats.count,
                Self::format_stat(row.stats.mean),
                Self::format_stat(row.stats.median),
                Self::format_stat(row.stats.min),
                Self::format_stat(row.stats.max),
                Self::format_stat(row.stats.std_dev),
                Self::format_delta(row.delta.mean_pct),
                Self::format_delta(row.delta.median_pct)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate the section of one website or the overall table
    /// @ai:effects pure
    fn generate_group_section(title: &str, group: &GroupSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## {}", title).unwrap();
        writeln!(output).unwrap();

        for metric in &group.by_metric {
            writeln!(
                output,
                "### {} (baseline: {})",
                metric.metric,
                metric.baseline.as_deref().unwrap_or("-")
            )
            .unwrap();
            writeln!(output).unwrap();
            output.push_str(&Self::generate_table(&metric.variants));
        }

        output
    }

    /// @ai:intent Render the complete Markdown document
    /// @ai:effects pure
    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut output = Self::generate_summary(report);

        for website in &report.websites {
            output.push_str(&Self::generate_group_section(
                &format!("Website: {}", website.name),
                website,
            ));
        }

        output.push_str(&Self::generate_group_section("Overall", &report.overall));

        writeln!(
            output,
            "### All metrics pooled (baseline: {})",
            report.overall.baseline.as_deref().unwrap_or("-")
        )
        .unwrap();
        writeln!(output).unwrap();
        output.push_str(&Self::generate_table(&report.overall.by_variant));

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.render(report))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait, PlotType, Profile, ResultTable, Sample};

    #[test]
    fn test_format_delta() {
        assert_eq!(MarkdownReporter::format_delta(12.5), "+12.50%");
        assert_eq!(MarkdownReporter::format_delta(-50.0), "-50.00%");
    }

    #[test]
    fn test_render_sections() {
        let mut table = ResultTable::new();
        table.push(Sample::new("a.com", "baseline", "connectStart", Some(100.0)));
        table.push(Sample::new("a.com", "prefetch", "connectStart", Some(80.0)));
        let report = MetricsAggregator::default().aggregate(&table, Profile::Trr, PlotType::Box);

        let doc = MarkdownReporter::new().render(&report);

        assert!(doc.starts_with("# Performance Comparison"));
        assert!(doc.contains("## Website: a.com"));
        assert!(doc.contains("### connectStart (baseline: baseline)"));
        assert!(doc.contains("| prefetch | 1 | 80.00 | 80.00 | 80.00 | 80.00 | - | -20.00% | -20.00% |"));
        assert!(doc.contains("## Overall"));
    }
}
