//! @ai:module:intent Static metric profiles and their typed extraction rules
//! @ai:module:layer domain
//! @ai:module:public_api Profile, PlotType, RecordSection, FieldPath, ExtractionRule, MetricSpec
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// @ai:intent Chart style used for every panel of a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    Box,
    Scatter,
    Violin,
}

impl PlotType {
    /// @ai:intent Convert plot type to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotType::Box => "box",
            PlotType::Scatter => "scatter",
            PlotType::Violin => "violin",
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlotType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "box" => Ok(PlotType::Box),
            "scatter" => Ok(PlotType::Scatter),
            "violin" => Ok(PlotType::Violin),
            other => Err(Error::UnknownPlotType(other.to_string())),
        }
    }
}

/// @ai:intent Top-level record array that is indexed by the sub-index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSection {
    #[serde(rename = "geckoPerfStats")]
    GeckoPerfStats,
    #[serde(rename = "browserScripts")]
    BrowserScripts,
}

impl RecordSection {
    /// @ai:intent JSON key of the section inside a record
    /// @ai:effects pure
    pub fn key(&self) -> &'static str {
        match self {
            RecordSection::GeckoPerfStats => "geckoPerfStats",
            RecordSection::BrowserScripts => "browserScripts",
        }
    }
}

/// @ai:intent Path to a value: `record[section][i][key]...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub section: RecordSection,
    pub keys: Vec<&'static str>,
}

impl FieldPath {
    /// @ai:intent Build a path into the gecko perf stats block
    /// @ai:effects pure
    pub fn gecko(key: &'static str) -> Self {
        Self {
            section: RecordSection::GeckoPerfStats,
            keys: vec![key],
        }
    }

    /// @ai:intent Build a nested path into the browser scripts block
    /// @ai:effects pure
    pub fn browser_scripts(keys: &[&'static str]) -> Self {
        Self {
            section: RecordSection::BrowserScripts,
            keys: keys.to_vec(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[i]", self.section.key())?;
        for key in &self.keys {
            write!(f, ".{}", key)?;
        }
        Ok(())
    }
}

/// @ai:intent How a metric value is computed from one record and sub-index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRule {
    Direct(FieldPath),
    /// numerator / denominator; a zero denominator yields no value
    Ratio {
        numerator: FieldPath,
        denominator: FieldPath,
    },
}

/// @ai:intent Named metric and its extraction rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub rule: ExtractionRule,
}

impl MetricSpec {
    fn direct(name: &'static str, path: FieldPath) -> Self {
        Self {
            name,
            rule: ExtractionRule::Direct(path),
        }
    }

    fn ratio(name: &'static str, numerator: FieldPath, denominator: FieldPath) -> Self {
        Self {
            name,
            rule: ExtractionRule::Ratio {
                numerator,
                denominator,
            },
        }
    }
}

/// @ai:intent Fixed set of metrics extracted in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Connection timings from browsertime runs
    #[default]
    Browsertime,
    /// DNS lookup timings and cache counters
    Dns,
    /// DNS-over-HTTPS resolver timings
    Trr,
}

const TRR_CHANNEL_COUNT: &str = "trr_service_channel_count";

const TRR_PER_CHANNEL: [&str; 9] = [
    "trr_lookup_time",
    "trr_dns_start",
    "trr_dns_end",
    "trr_tcp_connection",
    "trr_tls_handshake",
    "trr_open_to_first_sent",
    "trr_first_sent_to_last_received",
    "trr_open_to_first_received",
    "trr_complete_load",
];

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Browsertime, Profile::Dns, Profile::Trr];

    /// @ai:intent Convert profile to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Browsertime => "browsertime",
            Profile::Dns => "dns",
            Profile::Trr => "trr",
        }
    }

    /// @ai:intent Section whose array length defines the sub-indices of a record
    /// @ai:effects pure
    pub fn index_section(&self) -> RecordSection {
        match self {
            Profile::Browsertime | Profile::Dns => RecordSection::GeckoPerfStats,
            Profile::Trr => RecordSection::BrowserScripts,
        }
    }

    /// @ai:intent Plot styles this profile can render
    /// @ai:effects pure
    pub fn plot_types(&self) -> &'static [PlotType] {
        match self {
            Profile::Browsertime | Profile::Dns => &[PlotType::Box, PlotType::Scatter],
            Profile::Trr => &[PlotType::Box, PlotType::Scatter, PlotType::Violin],
        }
    }

    /// @ai:intent Plot style used when none is requested
    /// @ai:effects pure
    pub fn default_plot_type(&self) -> PlotType {
        match self {
            Profile::Browsertime | Profile::Dns => PlotType::Box,
            Profile::Trr => PlotType::Violin,
        }
    }

    /// @ai:intent Validate a requested plot type against this profile
    /// @ai:post Ok only if the plot type is listed in plot_types()
    /// @ai:effects pure
    pub fn check_plot_type(&self, plot_type: PlotType) -> Result<PlotType> {
        if self.plot_types().contains(&plot_type) {
            Ok(plot_type)
        } else {
            Err(Error::UnsupportedPlotType {
                plot_type: plot_type.to_string(),
                profile: self.as_str().to_string(),
            })
        }
    }

    /// @ai:intent Metric list for this profile, in reporting order
    /// @ai:effects pure
    pub fn metrics(&self) -> Vec<MetricSpec> {
        match self {
            Profile::Browsertime => vec![
                MetricSpec::direct("AsyncOpenToConnectEnd", FieldPath::gecko("AsyncOpenToConnectEnd")),
                MetricSpec::direct("AsyncOpenToFirstSent", FieldPath::gecko("AsyncOpenToFirstSent")),
            ],
            Profile::Dns => [
                "HttpSubItemDnsTime",
                "DNSLookupCacheHit",
                "DNSLookupNetworkFirst",
                "DNSLookupNetworkShared",
            ]
            .into_iter()
            .map(|name| MetricSpec::direct(name, FieldPath::gecko(name)))
            .collect(),
            Profile::Trr => {
                let mut specs = vec![
                    MetricSpec::direct("document_dns_lookup", FieldPath::gecko("document_dns_lookup")),
                    MetricSpec::direct(
                        "connectStart",
                        FieldPath::browser_scripts(&["timings", "navigationTiming", "connectStart"]),
                    ),
                    MetricSpec::direct(TRR_CHANNEL_COUNT, FieldPath::gecko(TRR_CHANNEL_COUNT)),
                ];

                specs.extend(TRR_PER_CHANNEL.into_iter().map(|name| {
                    MetricSpec::ratio(name, FieldPath::gecko(name), FieldPath::gecko(TRR_CHANNEL_COUNT))
                }));

                specs.push(MetricSpec::ratio(
                    "MeanTRRFirstSentToLastReceived",
                    FieldPath::gecko("TRRFirstSentToLastReceived"),
                    FieldPath::gecko("TRRRequestCount"),
                ));

                specs
            }
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_type_parsing() {
        assert_eq!("violin".parse::<PlotType>().unwrap(), PlotType::Violin);
        assert!("pie".parse::<PlotType>().is_err());
    }

    #[test]
    fn test_violin_only_for_trr() {
        assert!(Profile::Browsertime.check_plot_type(PlotType::Violin).is_err());
        assert!(Profile::Dns.check_plot_type(PlotType::Scatter).is_ok());
        assert_eq!(
            Profile::Trr.check_plot_type(PlotType::Violin).unwrap(),
            PlotType::Violin
        );
    }

    #[test]
    fn test_profile_defaults() {
        assert_eq!(Profile::Browsertime.default_plot_type(), PlotType::Box);
        assert_eq!(Profile::Trr.default_plot_type(), PlotType::Violin);
        assert_eq!(Profile::Trr.index_section(), RecordSection::BrowserScripts);
    }

    #[test]
    fn test_metric_names_unique() {
        for profile in Profile::ALL {
            let specs = profile.metrics();
            let mut names: Vec<_> = specs.iter().map(|s| s.name).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), specs.len(), "duplicate metric in {}", profile);
        }
    }

    #[test]
    fn test_trr_ratios_divide_by_channel_count() {
        let specs = Profile::Trr.metrics();
        let tls = specs.iter().find(|s| s.name == "trr_tls_handshake").unwrap();

        match &tls.rule {
            ExtractionRule::Ratio { denominator, .. } => {
                assert_eq!(denominator, &FieldPath::gecko("trr_service_channel_count"));
            }
            other => panic!("expected ratio, got {:?}", other),
        }
    }

    #[test]
    fn test_field_path_display() {
        let path = FieldPath::browser_scripts(&["timings", "navigationTiming", "connectStart"]);
        assert_eq!(path.to_string(), "browserScripts[i].timings.navigationTiming.connectStart");
    }
}
