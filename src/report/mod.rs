//! @ai:module:intent Report generation for analysis results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ConsoleReporter, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod console;
pub mod json_report;
pub mod markdown_report;

pub use charts::{safe_file_stem, ChartGenerator, ChartGeneratorTrait};
pub use console::ConsoleReporter;
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::config::{DisplayConfig, OutputConfig};
use crate::metrics::{AnalysisReport, PlotType, ResultTable};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub const SUMMARY_JSON: &str = "summary.json";
pub const SUMMARY_MARKDOWN: &str = "summary.md";

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
    write_json: bool,
    write_markdown: bool,
}

impl ReportGenerator {
    /// @ai:intent Create a report generator for one plot type
    /// @ai:effects pure
    pub fn new(plot_type: PlotType, output: &OutputConfig) -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(plot_type, output.panel_width, output.panel_height),
            write_json: output.write_json,
            write_markdown: output.write_markdown,
        }
    }

    /// @ai:intent Figure path for one website
    /// @ai:effects pure
    pub fn website_figure_path(&self, output_dir: &Path, website: &str) -> PathBuf {
        output_dir.join(format!(
            "{}_{}.png",
            safe_file_stem(website),
            self.charts.plot_type()
        ))
    }

    /// @ai:intent Figure path for the pooled overall figure
    /// @ai:effects pure
    pub fn overall_figure_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("overall_metrics_{}.png", self.charts.plot_type()))
    }

    /// @ai:intent Generate all figures and summary documents
    /// @ai:post returns the written figure paths, websites first then overall
    /// @ai:effects fs:write, log
    pub fn generate_all(
        &self,
        report: &AnalysisReport,
        table: &ResultTable,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let mut figures = Vec::new();

        for website in table.websites() {
            let path = self.website_figure_path(output_dir, website);
            self.charts.render(
                &format!("Website: {}", website),
                &table.for_website(website),
                &path,
            )?;
            figures.push(path);
        }

        let overall = self.overall_figure_path(output_dir);
        self.charts.render("Overall Metrics", &table.all(), &overall)?;
        figures.push(overall);

        if self.write_json {
            self.json.generate(report, &output_dir.join(SUMMARY_JSON))?;
        }
        if self.write_markdown {
            self.markdown
                .generate(report, &output_dir.join(SUMMARY_MARKDOWN))?;
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(figures)
    }
}

/// @ai:intent Viewer command for this platform unless one is configured
/// @ai:effects pure
pub fn viewer_command(display: &DisplayConfig) -> String {
    if let Some(command) = &display.command {
        return command.clone();
    }

    if cfg!(target_os = "macos") {
        "open".to_string()
    } else if cfg!(target_os = "windows") {
        "explorer".to_string()
    } else {
        "xdg-open".to_string()
    }
}

/// @ai:intent Hand each figure to an external viewer, blocking until it returns
/// @ai:post viewer failures are logged, never returned
/// @ai:effects io, log
pub fn show_figures(figures: &[PathBuf], display: &DisplayConfig) {
    let command = viewer_command(display);

    for figure in figures {
        match Command::new(&command).arg(figure).status() {
            Ok(status) if status.success() => {
                tracing::debug!("Displayed {} with {}", figure.display(), command);
            }
            Ok(status) => {
                tracing::warn!(
                    "Viewer {} exited with {} for {}",
                    command,
                    status,
                    figure.display()
                );
            }
            Err(e) => {
                tracing::warn!("Failed to launch viewer {}: {}", command, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait, Profile, Sample};
    use tempfile::TempDir;

    fn table() -> ResultTable {
        let mut table = ResultTable::new();
        for (site, variant, value) in [
            ("a.com", "baseline", 10.0),
            ("a.com", "doh", 12.0),
            ("b.org/path", "baseline", 7.0),
            ("b.org/path", "doh", 6.0),
        ] {
            table.push(Sample::new(site, variant, "AsyncOpenToConnectEnd", Some(value)));
        }
        table
    }

    #[test]
    fn test_generate_all_writes_figures_and_summaries() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("plots");
        let table = table();
        let report = MetricsAggregator::default().aggregate(&table, Profile::Browsertime, PlotType::Scatter);

        let generator = ReportGenerator::new(PlotType::Scatter, &OutputConfig::default());
        let figures = generator.generate_all(&report, &table, &out).unwrap();

        assert_eq!(figures.len(), 3);
        assert!(out.join("a.com_scatter.png").exists());
        assert!(out.join("b.org_path_scatter.png").exists());
        assert!(out.join("overall_metrics_scatter.png").exists());
        assert!(out.join(SUMMARY_JSON).exists());
        assert!(out.join(SUMMARY_MARKDOWN).exists());
    }

    #[test]
    fn test_summaries_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let table = table();
        let report = MetricsAggregator::default().aggregate(&table, Profile::Browsertime, PlotType::Box);
        let output = OutputConfig {
            write_json: false,
            write_markdown: false,
            ..Default::default()
        };

        ReportGenerator::new(PlotType::Box, &output)
            .generate_all(&report, &table, temp.path())
            .unwrap();

        assert!(temp.path().join("overall_metrics_box.png").exists());
        assert!(!temp.path().join(SUMMARY_JSON).exists());
        assert!(!temp.path().join(SUMMARY_MARKDOWN).exists());
    }

    #[test]
    fn test_configured_viewer_wins() {
        let display = DisplayConfig {
            enabled: true,
            command: Some("feh".to_string()),
        };
        assert_eq!(viewer_command(&display), "feh");
    }

    #[test]
    fn test_missing_viewer_is_not_fatal() {
        let display = DisplayConfig {
            enabled: true,
            command: Some("perfplot-no-such-viewer".to_string()),
        };
        show_figures(&[PathBuf::from("missing.png")], &display);
    }
}
