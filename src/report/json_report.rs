//! @ai:module:intent JSON summary of an analysis run
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::AnalysisReport;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from an analysis
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes the analysis report as pretty-printed JSON
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait, PlotType, Profile, ResultTable, Sample};
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.json");

        let mut table = ResultTable::new();
        table.push(Sample::new("example.com", "baseline", "trr_dns_end", Some(4.0)));
        table.push(Sample::new("example.com", "doh", "trr_dns_end", None));
        let report = MetricsAggregator::default().aggregate(&table, Profile::Trr, PlotType::Violin);

        reporter.generate(&report, &output).unwrap();
        assert!(output.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.profile, "trr");
        assert_eq!(parsed.websites[0].by_metric[0].variants.len(), 2);
        assert!(content.contains("\"mean\": null"));
    }
}
