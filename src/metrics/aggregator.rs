//! @ai:module:intent Group-by statistics and baseline deltas over the sample table
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::metrics::profile::{PlotType, Profile};
use crate::metrics::types::{
    first_seen, AnalysisReport, GroupStats, GroupSummary, MetricSummary, ResultTable, Sample,
    VariantDelta, VariantStats,
};

pub const OVERALL: &str = "overall";

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate the sample table into per-website and overall summaries
    fn aggregate(&self, table: &ResultTable, profile: Profile, plot_type: PlotType) -> AnalysisReport;
}

/// @ai:intent Aggregates samples into statistical summaries
pub struct MetricsAggregator {
    baseline: Option<String>,
}

impl MetricsAggregator {
    /// @ai:intent Create an aggregator; `baseline` names the reference variant
    /// @ai:effects pure
    pub fn new(baseline: Option<String>) -> Self {
        Self { baseline }
    }

    /// @ai:intent Pick the reference variant of a group
    /// @ai:post the named baseline if present, else the first variant encountered
    /// @ai:effects log
    fn resolve_baseline<'a>(&self, group: &str, variants: &[&'a str]) -> Option<&'a str> {
        if let Some(wanted) = self.baseline.as_deref() {
            if let Some(found) = variants.iter().find(|v| **v == wanted) {
                return Some(*found);
            }

            tracing::warn!(
                "Baseline variant '{}' not present in {}; using first variant {:?}",
                wanted,
                group,
                variants.first()
            );
        }

        variants.first().copied()
    }

    /// @ai:intent Per-variant stats and deltas for one set of samples
    /// @ai:effects log
    fn variant_stats(&self, group: &str, samples: &[&Sample]) -> (Option<String>, Vec<VariantStats>) {
        let variants = first_seen(samples.iter().map(|s| s.variant.as_str()));

        let stats: Vec<(&str, GroupStats)> = variants
            .iter()
            .map(|variant| {
                let values = samples
                    .iter()
                    .filter(|s| s.variant == *variant)
                    .map(|s| s.value);
                (*variant, GroupStats::compute(values))
            })
            .collect();

        let baseline = self.resolve_baseline(group, &variants);
        let reference = baseline
            .and_then(|b| stats.iter().find(|(v, _)| *v == b))
            .map(|(_, s)| s.clone())
            .unwrap_or_default();

        let rows = stats
            .into_iter()
            .map(|(variant, stats)| VariantStats {
                variant: variant.to_string(),
                delta: VariantDelta::calculate(&reference, &stats),
                stats,
            })
            .collect();

        (baseline.map(str::to_string), rows)
    }

    /// @ai:intent Summarize one website (or the whole table)
    /// @ai:effects log
    pub fn summarize(&self, name: &str, samples: &[&Sample]) -> GroupSummary {
        let (baseline, by_variant) = self.variant_stats(name, samples);

        let by_metric = first_seen(samples.iter().map(|s| s.metric.as_str()))
            .into_iter()
            .map(|metric| {
                let metric_samples: Vec<&Sample> = samples
                    .iter()
                    .copied()
                    .filter(|s| s.metric == metric)
                    .collect();

                let label = format!("{} / {}", name, metric);
                let (baseline, variants) = self.variant_stats(&label, &metric_samples);

                MetricSummary {
                    metric: metric.to_string(),
                    baseline,
                    variants,
                }
            })
            .collect();

        GroupSummary {
            name: name.to_string(),
            sample_count: samples.len(),
            baseline,
            by_variant,
            by_metric,
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate every website and the overall table
    /// @ai:effects log
    fn aggregate(&self, table: &ResultTable, profile: Profile, plot_type: PlotType) -> AnalysisReport {
        let websites = table
            .websites()
            .into_iter()
            .map(|website| self.summarize(website, &table.for_website(website)))
            .collect();

        AnalysisReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            profile: profile.to_string(),
            plot_type: plot_type.to_string(),
            total_samples: table.len(),
            websites,
            overall: self.summarize(OVERALL, &table.all()),
        }
    }
}
