//! @ai:module:intent Evaluate metric extraction rules against one JSON record
//! @ai:module:layer domain
//! @ai:module:public_api MetricExtractor, MetricValue, ExtractFailure, sub_index_count
//! @ai:module:stateless true

use crate::metrics::profile::{ExtractionRule, FieldPath, MetricSpec, RecordSection};
use serde_json::Value;
use std::fmt;

/// @ai:intent Why a metric could not be computed for one sub-index
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractFailure {
    MissingKey(String),
    IndexOutOfRange { section: &'static str, index: usize },
    NotNumeric(String),
    DivisionByZero,
}

impl fmt::Display for ExtractFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractFailure::MissingKey(key) => write!(f, "missing key '{}'", key),
            ExtractFailure::IndexOutOfRange { section, index } => {
                write!(f, "index {} out of range for '{}'", index, section)
            }
            ExtractFailure::NotNumeric(path) => write!(f, "value at {} is not a number", path),
            ExtractFailure::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

/// @ai:intent One extracted metric value; `None` when extraction failed
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue<'a> {
    pub name: &'a str,
    pub value: Option<f64>,
}

/// @ai:intent Number of sub-indices a record offers for a section
/// @ai:post 0 when the record is not an object or the section is absent or not an array
/// @ai:effects pure
pub fn sub_index_count(record: &Value, section: RecordSection) -> usize {
    record
        .get(section.key())
        .and_then(Value::as_array)
        .map(|blocks| blocks.len())
        .unwrap_or(0)
}

/// @ai:intent Extracts a fixed metric list from records
pub struct MetricExtractor {
    specs: Vec<MetricSpec>,
}

impl MetricExtractor {
    /// @ai:intent Create an extractor over a fixed metric list
    /// @ai:effects pure
    pub fn new(specs: Vec<MetricSpec>) -> Self {
        Self { specs }
    }

    /// @ai:intent Compute every metric for sub-index `index` of `record`
    /// @ai:post one entry per metric, in profile order; failures become None
    /// @ai:effects log
    pub fn extract(&self, record: &Value, index: usize) -> Vec<MetricValue<'_>> {
        self.specs
            .iter()
            .map(|metric| {
                let value = match evaluate(&metric.rule, record, index) {
                    Ok(v) => Some(v),
                    Err(failure) => {
                        tracing::debug!(
                            "metric {} at sub-index {} set to null: {}",
                            metric.name,
                            index,
                            failure
                        );
                        None
                    }
                };

                MetricValue {
                    name: metric.name,
                    value,
                }
            })
            .collect()
    }
}

/// @ai:intent Evaluate one extraction rule
/// @ai:effects pure
pub fn evaluate(rule: &ExtractionRule, record: &Value, index: usize) -> Result<f64, ExtractFailure> {
    match rule {
        ExtractionRule::Direct(path) => resolve_number(path, record, index),
        ExtractionRule::Ratio {
            numerator,
            denominator,
        } => {
            let num = resolve_number(numerator, record, index)?;
            let den = resolve_number(denominator, record, index)?;

            if den == 0.0 {
                return Err(ExtractFailure::DivisionByZero);
            }

            Ok(num / den)
        }
    }
}

/// @ai:intent Walk a field path and require a JSON number at its end
/// @ai:effects pure
fn resolve_number(path: &FieldPath, record: &Value, index: usize) -> Result<f64, ExtractFailure> {
    let section = path.section.key();
    let blocks = record
        .get(section)
        .ok_or_else(|| ExtractFailure::MissingKey(section.to_string()))?;

    let mut current = match blocks {
        Value::Array(items) => items.get(index).ok_or(ExtractFailure::IndexOutOfRange {
            section,
            index,
        })?,
        _ => return Err(ExtractFailure::NotNumeric(section.to_string())),
    };

    for key in &path.keys {
        current = current
            .get(*key)
            .ok_or_else(|| ExtractFailure::MissingKey((*key).to_string()))?;
    }

    current
        .as_f64()
        .ok_or_else(|| ExtractFailure::NotNumeric(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::profile::Profile;
    use serde_json::json;

    fn value_of(values: &[MetricValue<'_>], name: &str) -> Option<f64> {
        values.iter().find(|v| v.name == name).unwrap().value
    }

    #[test]
    fn test_direct_fields() {
        let record = json!({
            "geckoPerfStats": [
                {"AsyncOpenToConnectEnd": 12, "AsyncOpenToFirstSent": 15.5},
                {"AsyncOpenToConnectEnd": 8}
            ]
        });
        let extractor = MetricExtractor::new(Profile::Browsertime.metrics());

        let first = extractor.extract(&record, 0);
        assert_eq!(value_of(&first, "AsyncOpenToConnectEnd"), Some(12.0));
        assert_eq!(value_of(&first, "AsyncOpenToFirstSent"), Some(15.5));

        let second = extractor.extract(&record, 1);
        assert_eq!(value_of(&second, "AsyncOpenToConnectEnd"), Some(8.0));
        assert_eq!(value_of(&second, "AsyncOpenToFirstSent"), None);
    }

    #[test]
    fn test_nested_browser_scripts_path() {
        let record = json!({
            "browserScripts": [
                {"timings": {"navigationTiming": {"connectStart": 42}}}
            ]
        });
        let extractor = MetricExtractor::new(Profile::Trr.metrics());
        let values = extractor.extract(&record, 0);

        assert_eq!(value_of(&values, "connectStart"), Some(42.0));
        // gecko section absent entirely
        assert_eq!(value_of(&values, "document_dns_lookup"), None);
    }

    #[test]
    fn test_index_out_of_range() {
        let record = json!({
            "browserScripts": [{}, {}],
            "geckoPerfStats": [{"document_dns_lookup": 3}]
        });
        let extractor = MetricExtractor::new(Profile::Trr.metrics());

        assert_eq!(value_of(&extractor.extract(&record, 0), "document_dns_lookup"), Some(3.0));
        assert_eq!(value_of(&extractor.extract(&record, 1), "document_dns_lookup"), None);
    }

    #[test]
    fn test_wrong_type_is_null() {
        let rule = ExtractionRule::Direct(FieldPath::gecko("x"));
        let record = json!({"geckoPerfStats": [{"x": "fast"}]});

        assert!(matches!(
            evaluate(&rule, &record, 0),
            Err(ExtractFailure::NotNumeric(_))
        ));
    }

    #[test]
    fn test_ratio_and_zero_denominator() {
        let rule = ExtractionRule::Ratio {
            numerator: FieldPath::gecko("TRRFirstSentToLastReceived"),
            denominator: FieldPath::gecko("TRRRequestCount"),
        };
        let record = json!({"geckoPerfStats": [
            {"TRRFirstSentToLastReceived": 90, "TRRRequestCount": 3},
            {"TRRFirstSentToLastReceived": 90, "TRRRequestCount": 0}
        ]});

        assert_eq!(evaluate(&rule, &record, 0), Ok(30.0));
        assert_eq!(evaluate(&rule, &record, 1), Err(ExtractFailure::DivisionByZero));
    }

    #[test]
    fn test_sub_index_count() {
        assert_eq!(sub_index_count(&json!({"geckoPerfStats": [{}, {}, {}]}), RecordSection::GeckoPerfStats), 3);
        assert_eq!(sub_index_count(&json!({"geckoPerfStats": []}), RecordSection::GeckoPerfStats), 0);
        assert_eq!(sub_index_count(&json!({}), RecordSection::BrowserScripts), 0);
        assert_eq!(sub_index_count(&json!("oops"), RecordSection::BrowserScripts), 0);
    }
}
