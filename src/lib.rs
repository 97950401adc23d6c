//! @ai:module:intent perfplot library: collect browser performance results, aggregate and chart them
//! @ai:module:layer application
//! @ai:module:public_api config, corpus, error, metrics, pipeline, report

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;

pub use config::PlotConfig;
pub use corpus::{DataFile, DataFileCollector, DataFileCollectorTrait, LayoutResolver};
pub use error::{Error, Result};
pub use metrics::{AnalysisReport, MetricsAggregator, PlotType, Profile, ResultTable, Sample};
pub use pipeline::TableBuilder;
pub use report::{ConsoleReporter, ReportGenerator};
