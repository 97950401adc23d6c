//! @ai:module:intent Map data file paths to website and variant labels
//! @ai:module:layer domain
//! @ai:module:public_api LayoutResolver, Labels, DEFAULT_PATTERN
//! @ai:module:stateless true

use crate::config::LabelRuleConfig;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Component, Path};

/// Variant is the parent directory, website the grandparent.
pub const DEFAULT_PATTERN: &str = r"^(?:.*/)?(?P<website>[^/]+)/(?P<variant>[^/]+)/[^/]+$";

/// @ai:intent Website and variant assigned to one data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub website: String,
    pub variant: String,
}

#[derive(Debug, Clone)]
struct LabelRule {
    regex: Regex,
    website: String,
    variant: String,
}

/// @ai:intent Compiled, ordered label rules; first match wins
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    rules: Vec<LabelRule>,
}

impl LayoutResolver {
    /// @ai:intent Compile configured rules, or the positional default when none are given
    /// @ai:post every pattern compiled; Err(InvalidPattern) otherwise
    /// @ai:effects pure
    pub fn from_rules(rules: &[LabelRuleConfig]) -> Result<Self> {
        if rules.is_empty() {
            return Ok(Self::positional());
        }

        let compiled = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|source| Error::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    source,
                })?;

                Ok(LabelRule {
                    regex,
                    website: rule.website.clone(),
                    variant: rule.variant.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules: compiled })
    }

    /// @ai:intent Resolver using only the grandparent/parent directory rule
    /// @ai:effects pure
    pub fn positional() -> Self {
        Self {
            rules: vec![LabelRule {
                regex: Regex::new(DEFAULT_PATTERN).expect("default layout pattern is valid"),
                website: "$website".to_string(),
                variant: "$variant".to_string(),
            }],
        }
    }

    /// @ai:intent Label a data file from its path relative to the scan root
    /// @ai:pre path lies under root
    /// @ai:post Err(UnlabeledFile) if no rule matches, Err(EmptyLabel) if a label expands empty
    /// @ai:effects pure
    pub fn resolve(&self, root: &Path, path: &Path) -> Result<Labels> {
        let key = relative_key(root, path);

        let rule_match = self
            .rules
            .iter()
            .find_map(|rule| rule.regex.captures(&key).map(|caps| (rule, caps)));

        let (rule, caps) = rule_match.ok_or_else(|| Error::UnlabeledFile {
            path: path.to_path_buf(),
        })?;

        let mut website = String::new();
        caps.expand(&rule.website, &mut website);

        let mut variant = String::new();
        caps.expand(&rule.variant, &mut variant);

        for (label, value) in [("website", &website), ("variant", &variant)] {
            if value.is_empty() {
                return Err(Error::EmptyLabel {
                    path: path.to_path_buf(),
                    label,
                });
            }
        }

        Ok(Labels { website, variant })
    }
}

/// @ai:intent Root-relative path with components joined by '/'
/// @ai:effects pure
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
