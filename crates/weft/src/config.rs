//! Compiler configuration.
//!
//! Every field has a default, so a configuration file only lists what it
//! changes:
//!
//! ```yaml
//! project_root: /srv/site
//! template_extension: latte
//! compress: true
//! directories:
//!   - path: /srv/site/views
//!   - path: /srv/site/vendor/views
//!     priority: -1
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use weft_tree::PipelineConfig;

use crate::error::{Error, Result};
use crate::resolver::{Priority, DEFAULT_EXTENSION};

/// A template directory listed in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub path: PathBuf,
    /// Omitted: registration order decides.
    #[serde(default)]
    pub priority: Option<i64>,
}

impl DirectoryConfig {
    pub fn priority(&self) -> Priority {
        self.priority.map_or(Priority::Default, Priority::Explicit)
    }
}

/// Settings for a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Templates already under this directory resolve to themselves.
    pub project_root: PathBuf,
    /// Where the tag cache artifact is stored.
    pub cache_dir: PathBuf,
    /// Identity used in the tag cache key. Defaults to the project root.
    pub project_id: Option<String>,
    /// Template file extension, without the dot.
    pub template_extension: String,
    /// Run the text preprocessor stages. Trimming always happens.
    pub preprocess: bool,
    /// Collapse line-break runs in every text node.
    pub normalize_whitespace: bool,
    /// Collapse all whitespace runs in text.
    pub compress: bool,
    pub heading_class: String,
    pub subheading_tag: String,
    pub subheading_class: String,
    /// Directories registered when the compiler is created.
    pub directories: Vec<DirectoryConfig>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            project_root: PathBuf::from("."),
            cache_dir: PathBuf::from(".weft-cache"),
            project_id: None,
            template_extension: DEFAULT_EXTENSION.to_string(),
            preprocess: true,
            normalize_whitespace: pipeline.normalize_whitespace,
            compress: pipeline.compress,
            heading_class: pipeline.heading_class,
            subheading_tag: pipeline.subheading_tag,
            subheading_class: pipeline.subheading_class,
            directories: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Parses a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed or has fields of the
    /// wrong type.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Cache key identity: `project_id`, or the project root when unset.
    pub fn project_id(&self) -> String {
        self.project_id
            .clone()
            .unwrap_or_else(|| self.project_root.to_string_lossy().into_owned())
    }

    /// Settings for the canonical tree passes.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            heading_class: self.heading_class.clone(),
            subheading_tag: self.subheading_tag.clone(),
            subheading_class: self.subheading_class.clone(),
            normalize_whitespace: self.normalize_whitespace,
            compress: self.compress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = CompilerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert!(config.preprocess);
        assert_eq!(config.template_extension, "tmpl");
    }

    #[test]
    fn test_partial_yaml() {
        let config = CompilerConfig::from_yaml(
            r#"
project_root: /srv/site
compress: true
heading_class: title
directories:
  - path: /srv/site/views
  - path: /srv/site/vendor
    priority: -1
"#,
        )
        .unwrap();

        assert_eq!(config.project_root, PathBuf::from("/srv/site"));
        assert!(config.compress);
        assert_eq!(config.subheading_tag, "small");
        assert_eq!(config.directories.len(), 2);
        assert_eq!(config.directories[0].priority(), Priority::Default);
        assert_eq!(config.directories[1].priority(), Priority::Explicit(-1));
        assert_eq!(config.pipeline().heading_class, "title");
    }

    #[test]
    fn test_project_id_falls_back_to_root() {
        let mut config = CompilerConfig {
            project_root: PathBuf::from("/srv/site"),
            ..CompilerConfig::default()
        };
        assert_eq!(config.project_id(), "/srv/site");
        config.project_id = Some("site".to_string());
        assert_eq!(config.project_id(), "site");
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = CompilerConfig::from_yaml("compress: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = CompilerConfig::from_file(dir.path().join("weft.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
