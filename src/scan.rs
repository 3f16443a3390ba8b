use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub const JAVADOC_SUFFIX: &str = "-javadoc.jar";
pub const SOURCES_SUFFIX: &str = "-sources.jar";
pub const JAVADOC_TREE: &str = "javadoc";
pub const SOURCES_TREE: &str = "sources";
pub const BUILD_FILE_NAMES: [&str; 2] = ["pom.xml", "build.gradle"];

/// The dependency cache an archive was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    Maven,
    Gradle,
}

impl RepoKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            RepoKind::Maven => "maven",
            RepoKind::Gradle => "gradle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Javadoc,
    Sources,
}

impl ArchiveKind {
    pub fn of(file_name: &str) -> Option<Self> {
        if file_name.ends_with(JAVADOC_SUFFIX) {
            Some(ArchiveKind::Javadoc)
        } else if file_name.ends_with(SOURCES_SUFFIX) {
            Some(ArchiveKind::Sources)
        } else {
            None
        }
    }

    pub fn tree(self) -> &'static str {
        match self {
            ArchiveKind::Javadoc => JAVADOC_TREE,
            ArchiveKind::Sources => SOURCES_TREE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub path: PathBuf,
    pub kind: ArchiveKind,
    pub repo: RepoKind,
    pub root: PathBuf,
}

impl Archive {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Extraction directory for this archive under `output`.
    pub fn target(&self, output: &Path) -> PathBuf {
        self.target_in(output, self.kind)
    }

    /// Directory this archive maps to inside the `kind` tree, e.g. where
    /// documentation generated from a sources archive goes.
    pub fn target_in(&self, output: &Path, kind: ArchiveKind) -> PathBuf {
        archive_target(&self.root, &self.path, output, self.repo, kind)
    }

    /// The `-javadoc.jar` published alongside a `-sources.jar`. Maven keeps
    /// both in one directory; Gradle gives every file of a version its own
    /// hash directory, so the whole version directory is searched and only
    /// an existing file is returned.
    pub fn javadoc_sibling(&self) -> Option<PathBuf> {
        if self.kind != ArchiveKind::Sources {
            return None;
        }
        let name = self.file_name();
        let stem = name.strip_suffix(SOURCES_SUFFIX)?;
        let sibling = format!("{stem}{JAVADOC_SUFFIX}");
        match self.repo {
            RepoKind::Maven => Some(self.path.with_file_name(sibling)),
            RepoKind::Gradle => {
                let version_dir = self.path.parent()?.parent()?;
                find_in_version_dir(version_dir, &sibling)
            }
        }
    }
}

/// Maps `<root>/<rel dirs>/<name>.jar` to `<output>/<tree>/<repo>/<rel dirs>/<name>/`.
pub fn archive_target(
    root: &Path,
    archive: &Path,
    output: &Path,
    repo: RepoKind,
    kind: ArchiveKind,
) -> PathBuf {
    let relative = archive.strip_prefix(root).unwrap_or(archive);
    let mut target = output.join(kind.tree()).join(repo.dir_name());
    if let Some(parent) = relative.parent() {
        target.push(parent);
    }
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    target.join(stem)
}

/// Documentation and source archives below `root`, sorted by path.
pub fn scan_archives(root: &Path, repo: RepoKind) -> Result<Vec<Archive>> {
    let mut archives: Vec<Archive> = walk_files(root, false)?
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().to_string();
            let kind = ArchiveKind::of(&name)?;
            Some(Archive {
                path,
                kind,
                repo,
                root: root.to_path_buf(),
            })
        })
        .collect();
    archives.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(archives)
}

/// Project build descriptors below `root`. Hidden directories and
/// gitignored paths are skipped.
pub fn scan_build_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = walk_files(root, true)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| BUILD_FILE_NAMES.iter().any(|b| n == *b))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// `<version_dir>/<name>`, or `<version_dir>/<hash>/<name>` for the Gradle
/// cache layout. The first match in path order wins.
pub fn find_in_version_dir(version_dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = version_dir.join(name);
    if direct.exists() {
        return Some(direct);
    }
    let mut found: Vec<PathBuf> = std::fs::read_dir(version_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().join(name))
        .filter(|candidate| candidate.exists())
        .collect();
    found.sort();
    found.into_iter().next()
}

pub fn find_files_named(root: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = walk_files(root, false)?
        .into_iter()
        .filter(|p| p.file_name().is_some_and(|n| names.iter().any(|b| n == *b)))
        .collect();
    files.sort();
    Ok(files)
}

fn walk_files(root: &Path, standard_filters: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Directory not found: {}", root.display());
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(standard_filters)
        .hidden(standard_filters)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
