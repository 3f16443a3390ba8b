//! The persisted class index (`<output>/index.json`).
//!
//! The index is rebuilt from scratch by `jdoc index` and only read by
//! queries. Build descriptor timestamps are stored alongside the classes so
//! a query can warn when dependencies may have changed since the last build.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::config::{Settings, index_path};
use crate::error::JdocError;
use crate::indexer::{self, IndexSummary};
use crate::runner::ProcessRunner;
use crate::scan::scan_build_files;

/// Provenance of classes harvested from the JDK's published documentation.
pub const STDLIB_JAR: &str = "JAVA_STDLIB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub path: String,
    pub jar: Option<String>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>, jar: Option<&str>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            jar: jar.map(str::to_string),
        }
    }

    pub fn is_stdlib(&self) -> bool {
        self.jar.as_deref() == Some(STDLIB_JAR)
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFileRecord {
    pub last_modified: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub classnames: Vec<ClassRecord>,
    /// Keyed by absolute path of the build descriptor.
    pub pomfiles: BTreeMap<String, BuildFileRecord>,
}

/// Runs the archive indexer and records the build descriptors found under
/// `settings.project_root`.
pub fn build(settings: &Settings, runner: &dyn ProcessRunner) -> Result<(Index, IndexSummary)> {
    let (classnames, mut summary) = indexer::index_archives(settings, runner)?;
    let pomfiles = track_build_files(&settings.project_root);
    summary.build_files = pomfiles.len();
    Ok((
        Index {
            classnames,
            pomfiles,
        },
        summary,
    ))
}

pub fn track_build_files(root: &Path) -> BTreeMap<String, BuildFileRecord> {
    let files = match scan_build_files(root) {
        Ok(files) => files,
        Err(err) => {
            tracing::warn!(root = %root.display(), "not tracking build files: {err:#}");
            return BTreeMap::new();
        }
    };

    files
        .into_iter()
        .filter_map(|path| {
            let last_modified = modified_secs(&path)?;
            let key = path.to_string_lossy().to_string();
            Some((key, BuildFileRecord { last_modified }))
        })
        .collect()
}

pub fn save(index: &Index, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let path = index_path(output);
    let mut tmp_os = path.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_os);

    let json = serde_json::to_string(index)?;
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write index: {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to replace index: {}", path.display()))?;
    Ok(())
}

pub fn load(output: &Path) -> Result<Index> {
    let path = index_path(output);
    if !path.exists() {
        return Err(JdocError::MissingIndex(path).into());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read index: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse index: {}", path.display()))
}

/// One warning per tracked build file modified after the index was built.
pub fn check_staleness(index: &Index) -> Vec<String> {
    index
        .pomfiles
        .iter()
        .filter_map(|(path, record)| {
            let current = modified_secs(Path::new(path))?;
            (current > record.last_modified).then(|| {
                format!("{path} changed since the index was built; run `jdoc index` to refresh it")
            })
        })
        .collect()
}

pub fn modified_secs(path: &Path) -> Option<u64> {
    let modified = path.metadata().and_then(|m| m.modified()).ok()?;
    Some(
        modified
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    )
}
