//! @ai:module:intent Build the sample table from a directory of result files
//! @ai:module:layer application
//! @ai:module:public_api TableBuilder
//! @ai:module:stateless true

use crate::corpus::{DataFile, DataFileCollectorTrait};
use crate::error::Result;
use crate::metrics::{sub_index_count, MetricExtractor, Profile, RecordSection, ResultTable, Sample};
use serde_json::Value;
use std::path::Path;

/// @ai:intent Runs collection and extraction for one profile
pub struct TableBuilder<C: DataFileCollectorTrait> {
    collector: C,
    extractor: MetricExtractor,
    section: RecordSection,
}

impl<C: DataFileCollectorTrait> TableBuilder<C> {
    /// @ai:intent Create a builder extracting the metrics of `profile`
    /// @ai:effects pure
    pub fn new(collector: C, profile: Profile) -> Self {
        Self {
            collector,
            extractor: MetricExtractor::new(profile.metrics()),
            section: profile.index_section(),
        }
    }

    /// @ai:intent Collect, parse and extract every data file under root
    /// @ai:post one row per (record, sub-index, metric); parse errors abort
    /// @ai:effects fs:read, log
    pub fn build(&self, root: &Path) -> Result<ResultTable> {
        let files = self.collector.collect_all(root)?;
        let mut table = ResultTable::new();

        tracing::info!("Found {} data files under {}", files.len(), root.display());

        for file in &files {
            let records = self.collector.load_records(&file.path)?;
            tracing::info!(
                "file: {} ({} / {}, {} records)",
                file.path.display(),
                file.website,
                file.variant,
                records.len()
            );
            self.append_records(&mut table, file, &records);
        }

        Ok(table)
    }

    /// @ai:intent Extract every sub-index of every record into the table
    /// @ai:effects log
    pub fn append_records(&self, table: &mut ResultTable, file: &DataFile, records: &[Value]) {
        let mut nulls = 0usize;
        let mut rows = 0usize;

        for record in records {
            for index in 0..sub_index_count(record, self.section) {
                for metric in self.extractor.extract(record, index) {
                    if metric.value.is_none() {
                        nulls += 1;
                    }
                    rows += 1;
                    table.push(Sample::new(&file.website, &file.variant, metric.name, metric.value));
                }
            }
        }

        if nulls > 0 {
            tracing::warn!(
                "{}: {} of {} metric values missing or invalid",
                file.path.display(),
                nulls,
                rows
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DataFileCollector;
    use serde_json::json;
    use std::path::PathBuf;

    fn data_file() -> DataFile {
        DataFile {
            path: PathBuf::from("site/variant/run.json"),
            website: "site".to_string(),
            variant: "variant".to_string(),
        }
    }

    #[test]
    fn test_rows_per_sub_index() {
        let builder = TableBuilder::new(DataFileCollector::default(), Profile::Browsertime);
        let records = vec![
            json!({"geckoPerfStats": [{"AsyncOpenToConnectEnd": 1}, {"AsyncOpenToConnectEnd": 2}]}),
            json!({"geckoPerfStats": []}),
            json!({"browserScripts": [{}]}),
        ];

        let mut table = ResultTable::new();
        builder.append_records(&mut table, &data_file(), &records);

        // 2 sub-indices x 2 metrics; empty and absent sections add nothing
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.samples().iter().filter(|s| s.value.is_none()).count(),
            2
        );
        assert!(table.samples().iter().all(|s| s.website == "site" && s.variant == "variant"));
    }

    #[test]
    fn test_trr_indexes_by_browser_scripts() {
        let builder = TableBuilder::new(DataFileCollector::default(), Profile::Trr);
        let records = vec![json!({
            "browserScripts": [{}, {}, {}],
            "geckoPerfStats": [{"document_dns_lookup": 4}]
        })];

        let mut table = ResultTable::new();
        builder.append_records(&mut table, &data_file(), &records);

        assert_eq!(table.len(), 3 * Profile::Trr.metrics().len());
    }
}
