//! @ai:module:intent Plain-text statistics tables for the terminal
//! @ai:module:layer presentation
//! @ai:module:public_api ConsoleReporter
//! @ai:module:stateless true

use crate::metrics::{AnalysisReport, GroupSummary, VariantStats};
use std::fmt::Write as FmtWrite;

/// @ai:intent Formats aggregated statistics as console tables
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format an optional statistic, NaN when undefined
    /// @ai:effects pure
    fn fmt_stat(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "NaN".to_string())
    }

    fn header(output: &mut String) {
        writeln!(
            output,
            "  {:<24} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>9} {:>9}",
            "Variant", "Count", "Mean", "Median", "Min", "Max", "Std", "dMean", "dMedian"
        )
        .unwrap();
        writeln!(output, "  {}", "-".repeat(107)).unwrap();
    }

    fn row(output: &mut String, row: &VariantStats) {
        let stats = &row.stats;
        writeln!(
            output,
            "  {:<24} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>+8.2}% {:>+8.2}%",
            row.variant,
            stats.count,
            Self::fmt_stat(stats.mean),
            Self::fmt_stat(stats.median),
            Self::fmt_stat(stats.min),
            Self::fmt_stat(stats.max),
            Self::fmt_stat(stats.std_dev),
            row.delta.mean_pct,
            row.delta.median_pct
        )
        .unwrap();
    }

    /// @ai:intent Per-metric statistics for one website
    /// @ai:effects pure
    pub fn format_group(&self, summary: &GroupSummary) -> String {
        let mut output = String::new();

        for metric in &summary.by_metric {
            writeln!(output).unwrap();
            writeln!(output, "Statistics for {} - {}:", metric.metric, summary.name).unwrap();
            writeln!(
                output,
                "  Baseline: {}",
                metric.baseline.as_deref().unwrap_or("-")
            )
            .unwrap();
            Self::header(&mut output);

            for row in &metric.variants {
                Self::row(&mut output, row);
            }
        }

        output
    }

    /// @ai:intent Overall per-variant and per-(variant, metric) summary
    /// @ai:effects pure
    pub fn format_overall(&self, summary: &GroupSummary) -> String {
        let mut output = String::new();

        writeln!(output).unwrap();
        writeln!(output, "Overall Summary").unwrap();
        writeln!(output, "===============").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "All metrics pooled (baseline: {}):",
            summary.baseline.as_deref().unwrap_or("-")
        )
        .unwrap();
        Self::header(&mut output);

        for row in &summary.by_variant {
            Self::row(&mut output, row);
        }

        for metric in &summary.by_metric {
            writeln!(output).unwrap();
            writeln!(
                output,
                "{} (baseline: {}):",
                metric.metric,
                metric.baseline.as_deref().unwrap_or("-")
            )
            .unwrap();
            Self::header(&mut output);

            for row in &metric.variants {
                Self::row(&mut output, row);
            }
        }

        output
    }

    /// @ai:intent Full console report: every website, then overall
    /// @ai:effects pure
    pub fn format_report(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        writeln!(
            output,
            "perfplot: profile={} plot={} samples={}",
            report.profile, report.plot_type, report.total_samples
        )
        .unwrap();

        for website in &report.websites {
            output.push_str(&self.format_group(website));
        }

        output.push_str(&self.format_overall(&report.overall));
        output
    }

    /// @ai:intent Print the full report to stdout
    /// @ai:effects io
    pub fn print(&self, report: &AnalysisReport) {
        print!("{}", self.format_report(report));
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        MetricsAggregator, MetricsAggregatorTrait, PlotType, Profile, ResultTable, Sample,
    };

    fn report() -> AnalysisReport {
        let mut table = ResultTable::new();
        for v in [10.0, 20.0, 30.0] {
            table.push(Sample::new("example.com", "A", "AsyncOpenToConnectEnd", Some(v)));
        }
        for v in [5.0, 15.0] {
            table.push(Sample::new("example.com", "B", "AsyncOpenToConnectEnd", Some(v)));
        }
        table.push(Sample::new("example.com", "B", "AsyncOpenToFirstSent", None));

        MetricsAggregator::default().aggregate(&table, Profile::Browsertime, PlotType::Box)
    }

    #[test]
    fn test_group_lists_metrics_and_deltas() {
        let report = report();
        let text = ConsoleReporter::new().format_group(&report.websites[0]);

        assert!(text.contains("Statistics for AsyncOpenToConnectEnd - example.com:"));
        assert!(text.contains("Baseline: A"));
        assert!(text.contains("-50.00%"));
        assert!(text.contains("20.00"));
    }

    #[test]
    fn test_undefined_stats_print_nan() {
        let report = report();
        let text = ConsoleReporter::new().format_group(&report.websites[0]);

        assert!(text.contains("Statistics for AsyncOpenToFirstSent - example.com:"));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn test_full_report_has_overall_section() {
        let text = ConsoleReporter::new().format_report(&report());

        assert!(text.starts_with("perfplot: profile=browsertime plot=box samples=6"));
        assert!(text.contains("Overall Summary"));
        assert!(text.contains("All metrics pooled (baseline: A):"));
    }
}
