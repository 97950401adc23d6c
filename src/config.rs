//! @ai:module:intent Configuration structs for perfplot runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api PlotConfig, AnalysisConfig, OutputConfig, DisplayConfig, LayoutConfig, LabelRuleConfig
//! @ai:module:stateless true

use crate::corpus::LayoutResolver;
use crate::error::{Error, Result};
use crate::metrics::{PlotType, Profile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "perfplot.toml";

/// @ai:intent Main configuration for a perfplot run
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// @ai:intent Which metrics to extract and how to compare variants
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub plot_type: Option<PlotType>,
    #[serde(default)]
    pub baseline: Option<String>,
    #[serde(default = "default_data_extension")]
    pub data_extension: String,
}

/// @ai:intent Where and how figures and summaries are written
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,
    #[serde(default = "default_panel_height")]
    pub panel_height: u32,
    #[serde(default = "default_true")]
    pub write_json: bool,
    #[serde(default = "default_true")]
    pub write_markdown: bool,
}

/// @ai:intent External viewer used to show written figures
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub command: Option<String>,
}

/// @ai:intent Ordered label rules mapping data file paths to website and variant
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub rules: Vec<LabelRuleConfig>,
}

/// @ai:intent One label rule: regex over the root-relative path plus capture templates
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRuleConfig {
    pub pattern: String,
    pub website: String,
    pub variant: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            plot_type: None,
            baseline: None,
            data_extension: default_data_extension(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
            write_json: true,
            write_markdown: true,
        }
    }
}

fn default_data_extension() -> String {
    "json".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_panel_width() -> u32 {
    600
}

fn default_panel_height() -> u32 {
    500
}

fn default_true() -> bool {
    true
}

impl PlotConfig {
    /// @ai:intent Load configuration from a TOML file and validate its label rules
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// @ai:intent Parse configuration text and validate its label rules
    /// @ai:effects pure
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        LayoutResolver::from_rules(&config.layout.rules)?;
        Ok(config)
    }

    /// @ai:intent Plot type to use: configured one, else the profile default
    /// @ai:effects pure
    pub fn effective_plot_type(&self) -> PlotType {
        self.analysis
            .plot_type
            .unwrap_or_else(|| self.analysis.profile.default_plot_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlotConfig::from_toml("").unwrap();
        assert_eq!(config.analysis.profile, Profile::Browsertime);
        assert_eq!(config.analysis.data_extension, "json");
        assert_eq!(config.output.dir, PathBuf::from("plots"));
        assert!(config.output.write_json);
        assert!(config.layout.rules.is_empty());
        assert_eq!(config.effective_plot_type(), PlotType::Box);
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[analysis]
profile = "trr"
baseline = "control"

[output]
dir = "out"
write_markdown = false

[[layout.rules]]
pattern = '^(?P<site>[^/]+)/runs/(?P<variant>[^/]+)/.*$'
website = "$site"
variant = "$variant"
"#;
        let config = PlotConfig::from_toml(content).unwrap();
        assert_eq!(config.analysis.profile, Profile::Trr);
        assert_eq!(config.analysis.baseline.as_deref(), Some("control"));
        assert_eq!(config.effective_plot_type(), PlotType::Violin);
        assert!(!config.output.write_markdown);
        assert_eq!(config.output.panel_width, 600);
        assert_eq!(config.layout.rules.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_fails_at_load() {
        let content = r#"
[[layout.rules]]
pattern = '^(unclosed'
website = "$1"
variant = "x"
"#;
        assert!(matches!(
            PlotConfig::from_toml(content),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_unknown_plot_type_rejected() {
        let content = "[analysis]\nplot_type = \"pie\"\n";
        assert!(matches!(PlotConfig::from_toml(content), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[analysis]\nprofile = \"dns\"\n").unwrap();

        let loaded = PlotConfig::load(&path).unwrap();
        assert_eq!(loaded.analysis.profile, Profile::Dns);
    }
}
