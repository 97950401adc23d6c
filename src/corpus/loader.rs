//! @ai:module:intent Discover and load performance result files under a root directory
//! @ai:module:layer infrastructure
//! @ai:module:public_api DataFile, DataFileCollector, DataFileCollectorTrait
//! @ai:module:stateless true

use crate::corpus::layout::LayoutResolver;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent A labelled data file found under the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    pub website: String,
    pub variant: String,
}

/// @ai:intent Trait for collecting result files
pub trait DataFileCollectorTrait: Send + Sync {
    /// @ai:intent Find and label every data file under root
    fn collect_all(&self, root: &Path) -> Result<Vec<DataFile>>;

    /// @ai:intent Parse one data file into its records
    fn load_records(&self, path: &Path) -> Result<Vec<Value>>;
}

/// @ai:intent Walks a directory tree for result files and labels them
pub struct DataFileCollector {
    resolver: LayoutResolver,
    extension: String,
}

impl DataFileCollector {
    /// @ai:intent Create a collector for files with the given extension
    /// @ai:effects pure
    pub fn new(resolver: LayoutResolver, extension: impl Into<String>) -> Self {
        Self {
            resolver,
            extension: extension.into(),
        }
    }

    /// @ai:intent Lazily yield labelled data files in file-name order
    /// @ai:post walk errors and unlabeled files are yielded as Err
    /// @ai:effects fs:read
    pub fn files<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = Result<DataFile>> + 'a {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(e) if e.file_type().is_file() && self.is_data_file(e.path()) => {
                    Some(self.label(root, e.into_path()))
                }
                Ok(_) => None,
                Err(err) => Some(Err(Error::Walk(err))),
            })
    }

    /// @ai:intent File name ends in `.<extension>`; a bare `.json` name counts
    /// @ai:effects pure
    fn is_data_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(self.extension.as_str()))
            .map(|stem| stem.ends_with('.'))
            .unwrap_or(false)
    }

    fn label(&self, root: &Path, path: PathBuf) -> Result<DataFile> {
        let labels = self.resolver.resolve(root, &path)?;

        Ok(DataFile {
            path,
            website: labels.website,
            variant: labels.variant,
        })
    }
}

impl Default for DataFileCollector {
    fn default() -> Self {
        Self::new(LayoutResolver::positional(), "json")
    }
}

impl DataFileCollectorTrait for DataFileCollector {
    /// @ai:intent Collect every labelled data file, failing on the first error
    /// @ai:effects fs:read
    fn collect_all(&self, root: &Path) -> Result<Vec<DataFile>> {
        self.files(root).collect()
    }

    /// @ai:intent Parse a file as a JSON array of records
    /// @ai:pre path points to a readable file
    /// @ai:effects fs:read
    fn load_records(&self, path: &Path) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let data: Value = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

        match data {
            Value::Array(records) => Ok(records),
            _ => Err(Error::NotAnArray {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_collect_labels_from_directories() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "site.com/dns_prefetch/browsertime.json", "[]");
        create_file(temp.path(), "site.com/baseline/browsertime.json", "[]");
        create_file(temp.path(), "site.com/baseline/notes.txt", "ignored");

        let collector = DataFileCollector::default();
        let files = collector.collect_all(temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].website, "site.com");
        assert_eq!(files[0].variant, "baseline");
        assert_eq!(files[1].variant, "dns_prefetch");
    }

    #[test]
    fn test_unlabeled_file_aborts() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "stray.json", "[]");

        let collector = DataFileCollector::default();
        assert!(matches!(
            collector.collect_all(temp.path()),
            Err(Error::UnlabeledFile { .. })
        ));
    }

    #[test]
    fn test_custom_extension() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "a/b/run.perf", "[]");
        create_file(temp.path(), "a/b/run.json", "[]");

        let collector = DataFileCollector::new(LayoutResolver::positional(), "perf");
        let files = collector.collect_all(temp.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("run.perf"));
    }

    #[test]
    fn test_suffix_match_includes_bare_dot_name() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "a/b/.json", "[]");
        create_file(temp.path(), "a/b/runjson", "[]");
        create_file(temp.path(), "a/b/run.json.bak", "[]");

        let files = DataFileCollector::default().collect_all(temp.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with(".json"));
        assert_eq!(files[0].variant, "b");
    }

    #[test]
    fn test_load_records() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "ok.json", r#"[{"geckoPerfStats": []}, {}]"#);

        let records = DataFileCollector::default()
            .load_records(&temp.path().join("ok.json"))
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "bad.json", "[{");
        create_file(temp.path(), "obj.json", r#"{"geckoPerfStats": []}"#);

        let collector = DataFileCollector::default();
        assert!(matches!(
            collector.load_records(&temp.path().join("bad.json")),
            Err(Error::Json { .. })
        ));
        assert!(matches!(
            collector.load_records(&temp.path().join("obj.json")),
            Err(Error::NotAnArray { .. })
        ));
    }
}
