//! Fixture loading for propdash
//!
//! Reads JSON or YAML fixture files into a [`Dataset`]. A glob pattern can
//! select several files; their groups are appended in path order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod dataset;
pub mod demo;
pub mod error;
pub mod validate;

pub use dataset::Dataset;
pub use demo::demo_dataset;
pub use error::LoadError;
pub use validate::{validate_dataset, IssueLevel, ValidationIssue};

/// Fixture file encoding, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Json,
    Yaml,
}

impl FixtureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(FixtureFormat::Json),
            "yaml" | "yml" => Some(FixtureFormat::Yaml),
            _ => None,
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Reject datasets with errors; log warnings
fn checked(dataset: Dataset, source: &str) -> Result<Dataset, LoadError> {
    let (errors, warnings): (Vec<ValidationIssue>, Vec<ValidationIssue>) =
        validate_dataset(&dataset).into_iter().partition(ValidationIssue::is_error);

    for warning in &warnings {
        log::warn!("{}: {}", source, warning);
    }
    if !errors.is_empty() {
        return Err(LoadError::ValidationError {
            issues: errors.iter().map(ToString::to_string).collect(),
        });
    }
    Ok(dataset)
}

// ==================== Loader Trait ====================

/// Loader reference type
pub type LoaderRef = Arc<dyn FixtureLoader>;

/// Trait for fixture loaders
#[async_trait]
pub trait FixtureLoader: Send + Sync {
    /// Parse fixture text; `source` names it in error locations
    async fn parse(&self, content: &str, format: FixtureFormat, source: &str) -> Result<Dataset, LoadError>;

    /// Load and validate one fixture file
    async fn load_file(&self, path: PathBuf) -> Result<Dataset, LoadError>;

    /// Load every file matching `pattern` under `base_dir` and validate the merged dataset
    async fn load_pattern(&self, base_dir: PathBuf, pattern: &str) -> Result<Dataset, LoadError>;
}

/// Default loader reading through tokio::fs
#[derive(Debug, Default)]
pub struct DefaultFixtureLoader;

impl DefaultFixtureLoader {
    async fn read_file(&self, path: &Path) -> Result<Dataset, LoadError> {
        let source = path.to_string_lossy().to_string();
        let format = FixtureFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: source.clone(),
        })?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoadError::IoError {
                path: source.clone(),
                source: e,
            })?;

        let dataset = self.parse(&content, format, &source).await?;
        log::debug!(
            "Loaded {} groups ({} records) from {}",
            dataset.groups.len(),
            dataset.record_count(),
            source
        );
        Ok(dataset)
    }

    fn expand(&self, base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
        let full = base_dir.join(pattern);
        if !is_glob(pattern) {
            return Ok(vec![full]);
        }

        let pattern_str = full.to_string_lossy().to_string();
        let entries = glob::glob(&pattern_str).map_err(|e| LoadError::InvalidPattern {
            pattern: pattern_str.clone(),
            message: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LoadError::IoError {
                path: e.path().to_string_lossy().to_string(),
                source: e.into(),
            })?;
            if path.is_file() && FixtureFormat::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(LoadError::NoMatches { pattern: pattern_str });
        }
        Ok(paths)
    }
}

#[async_trait]
impl FixtureLoader for DefaultFixtureLoader {
    async fn parse(&self, content: &str, format: FixtureFormat, source: &str) -> Result<Dataset, LoadError> {
        match format {
            FixtureFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::SyntaxError {
                location: format!("{}:{}:{}", source, e.line(), e.column()),
                message: e.to_string(),
            }),
            FixtureFormat::Yaml => serde_yaml::from_str(content).map_err(|e| LoadError::SyntaxError {
                location: match e.location() {
                    Some(at) => format!("{}:{}:{}", source, at.line(), at.column()),
                    None => source.to_string(),
                },
                message: e.to_string(),
            }),
        }
    }

    async fn load_file(&self, path: PathBuf) -> Result<Dataset, LoadError> {
        let dataset = self.read_file(&path).await?;
        checked(dataset, &path.to_string_lossy())
    }

    async fn load_pattern(&self, base_dir: PathBuf, pattern: &str) -> Result<Dataset, LoadError> {
        let mut merged = Dataset::default();
        for path in self.expand(&base_dir, pattern)? {
            let dataset = self.read_file(&path).await?;
            merged.append(dataset);
        }
        log::info!(
            "Loaded {} records in {} groups from {}",
            merged.record_count(),
            merged.groups.len(),
            base_dir.join(pattern).display()
        );
        checked(merged, pattern)
    }
}
