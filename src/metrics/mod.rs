//! @ai:module:intent Metric extraction, sample table and aggregation
//! @ai:module:layer application
//! @ai:module:public_api Profile, PlotType, MetricSpec, MetricExtractor, ResultTable, GroupStats, MetricsAggregator, AnalysisReport

pub mod aggregator;
pub mod extractor;
pub mod profile;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait, OVERALL};
pub use extractor::{sub_index_count, ExtractFailure, MetricExtractor, MetricValue};
pub use profile::{ExtractionRule, FieldPath, MetricSpec, PlotType, Profile, RecordSection};
pub use types::{
    AnalysisReport, GroupStats, GroupSummary, MetricSummary, ResultTable, Sample, VariantDelta,
    VariantStats,
};
