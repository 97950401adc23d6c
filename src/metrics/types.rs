//! @ai:module:intent Sample table and statistic types for performance results
//! @ai:module:layer domain
//! @ai:module:public_api Sample, ResultTable, GroupStats, VariantDelta, VariantStats, MetricSummary, GroupSummary, AnalysisReport
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent One measured value for a website, variant and metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub website: String,
    pub variant: String,
    pub metric: String,
    pub value: Option<f64>,
}

impl Sample {
    pub fn new(website: &str, variant: &str, metric: &str, value: Option<f64>) -> Self {
        Self {
            website: website.to_string(),
            variant: variant.to_string(),
            metric: metric.to_string(),
            value,
        }
    }
}

/// @ai:intent Flat in-memory collection of every sample of a run
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    samples: Vec<Sample>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// @ai:intent Websites in first-seen order
    /// @ai:effects pure
    pub fn websites(&self) -> Vec<&str> {
        first_seen(self.samples.iter().map(|s| s.website.as_str()))
    }

    /// @ai:intent All samples recorded for one website
    /// @ai:effects pure
    pub fn for_website(&self, website: &str) -> Vec<&Sample> {
        self.samples.iter().filter(|s| s.website == website).collect()
    }

    /// @ai:intent Borrow every sample, for whole-table grouping
    /// @ai:effects pure
    pub fn all(&self) -> Vec<&Sample> {
        self.samples.iter().collect()
    }
}

/// @ai:intent Distinct values of an iterator, keeping first-seen order
/// @ai:effects pure
pub fn first_seen<'a, I: Iterator<Item = &'a str>>(iter: I) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();

    for item in iter {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }

    seen
}

/// @ai:intent Descriptive statistics of one group of samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Rows in the group, nulls included
    pub samples: usize,
    /// Non-null values
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation (n - 1); undefined below two values
    pub std_dev: Option<f64>,
}

impl GroupStats {
    /// @ai:intent Compute statistics over optional values, ignoring nulls
    /// @ai:post count == number of Some values; samples == values.len()
    /// @ai:effects pure
    pub fn compute<I: IntoIterator<Item = Option<f64>>>(values: I) -> Self {
        let mut samples = 0usize;
        let mut present: Vec<f64> = Vec::new();

        for value in values {
            samples += 1;
            if let Some(v) = value {
                present.push(v);
            }
        }

        if present.is_empty() {
            return Self {
                samples,
                ..Default::default()
            };
        }

        present.sort_by(|a, b| a.total_cmp(b));

        let count = present.len();
        let mean = present.iter().sum::<f64>() / count as f64;

        let std_dev = if count > 1 {
            let variance =
                present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };

        Self {
            samples,
            count,
            mean: Some(mean),
            median: Some(median_of_sorted(&present)),
            min: present.first().copied(),
            max: present.last().copied(),
            std_dev,
        }
    }
}

/// @ai:intent Median of an ascending, non-empty slice
/// @ai:pre sorted is sorted ascending and non-empty
/// @ai:effects pure
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();

    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// @ai:intent Percentage change of a variant against the baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantDelta {
    pub mean_pct: f64,
    pub median_pct: f64,
}

impl VariantDelta {
    /// @ai:intent Compare a group's mean and median against a reference group
    /// @ai:effects pure
    pub fn calculate(reference: &GroupStats, stats: &GroupStats) -> Self {
        Self {
            mean_pct: percent_delta(stats.mean, reference.mean),
            median_pct: percent_delta(stats.median, reference.median),
        }
    }
}

/// @ai:intent Percentage delta that is 0 whenever it is undefined
/// @ai:post returns 0.0 if reference is None or zero, or value is None
/// @ai:effects pure
pub fn percent_delta(value: Option<f64>, reference: Option<f64>) -> f64 {
    match (value, reference) {
        (Some(v), Some(r)) if r != 0.0 => (v - r) / r * 100.0,
        _ => 0.0,
    }
}

/// @ai:intent Statistics and baseline delta for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    pub variant: String,
    pub stats: GroupStats,
    pub delta: VariantDelta,
}

/// @ai:intent Per-variant statistics of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub baseline: Option<String>,
    pub variants: Vec<VariantStats>,
}

/// @ai:intent All statistics of one website, or of the whole table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub sample_count: usize,
    /// Baseline of the pooled per-variant grouping
    pub baseline: Option<String>,
    /// Grouped by variant, all metrics pooled
    pub by_variant: Vec<VariantStats>,
    /// Grouped by (variant, metric)
    pub by_metric: Vec<MetricSummary>,
}

/// @ai:intent Complete result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub profile: String,
    pub plot_type: String,
    pub total_samples: usize,
    pub websites: Vec<GroupSummary>,
    pub overall: GroupSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_stats_textbook_values() {
        let a = GroupStats::compute([Some(10.0), Some(20.0), Some(30.0)]);
        assert_eq!(a.count, 3);
        assert_eq!(a.mean, Some(20.0));
        assert_eq!(a.median, Some(20.0));
        assert_eq!(a.min, Some(10.0));
        assert_eq!(a.max, Some(30.0));
        assert!((a.std_dev.unwrap() - 10.0).abs() < 1e-9);

        let b = GroupStats::compute([Some(15.0), Some(5.0)]);
        assert_eq!(b.count, 2);
        assert_eq!(b.mean, Some(10.0));
        assert_eq!(b.median, Some(10.0));
    }

    #[test]
    fn test_group_stats_excludes_nulls() {
        let stats = GroupStats::compute([Some(4.0), None, Some(8.0), None]);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(6.0));
    }

    #[test]
    fn test_group_stats_all_null() {
        let stats = GroupStats::compute([None, None]);
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_single_value_has_no_std_dev() {
        let stats = GroupStats::compute([Some(7.0)]);
        assert_eq!(stats.median, Some(7.0));
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_percent_delta() {
        assert!((percent_delta(Some(10.0), Some(20.0)) + 50.0).abs() < 1e-9);
        assert_eq!(percent_delta(Some(10.0), Some(0.0)), 0.0);
        assert_eq!(percent_delta(None, Some(5.0)), 0.0);
        assert_eq!(percent_delta(Some(5.0), None), 0.0);
    }

    #[test]
    fn test_first_seen_order() {
        let items = ["b", "a", "b", "c", "a"];
        assert_eq!(first_seen(items.into_iter()), vec!["b", "a", "c"]);
    }
}
