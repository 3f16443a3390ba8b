//! Walks the dependency caches, unpacks documentation and source archives,
//! and harvests class names from the "all classes" pages of every
//! documentation tree.
//!
//! Every archive is processed in isolation: a failure is logged and the
//! archive is left out of the index, but the walk always continues.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::JdocError;
use crate::extract::{Extraction, extract_archive};
use crate::index::ClassRecord;
use crate::jdk::{self, strip_anchor};
use crate::links::{ClassLinks, LinkMode};
use crate::runner::ProcessRunner;
use crate::scan::{Archive, ArchiveKind, RepoKind, SOURCES_TREE, find_files_named, scan_archives};

/// File names used for the class list page across javadoc releases.
pub const ALLCLASSES_PAGES: [&str; 4] = [
    "allclasses-index.html",
    "allclasses-noframe.html",
    "allclasses-frame.html",
    "allclasses.html",
];

pub const JDK_SOURCES_DIR: &str = "jdk";

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexSummary {
    pub archives: usize,
    pub extracted: usize,
    pub generated: usize,
    pub failed: usize,
    pub classes: usize,
    pub stdlib_classes: usize,
    pub build_files: usize,
}

pub fn index_archives(
    settings: &Settings,
    runner: &dyn ProcessRunner,
) -> Result<(Vec<ClassRecord>, IndexSummary)> {
    let mut records = Vec::new();
    let mut summary = IndexSummary::default();

    let roots = [
        (settings.maven_repo.as_path(), RepoKind::Maven),
        (settings.gradle_repo.as_path(), RepoKind::Gradle),
    ];
    for (root, repo) in roots {
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "{} repository not found, skipping", repo.dir_name());
            continue;
        }

        let archives = match scan_archives(root, repo) {
            Ok(archives) => archives,
            Err(err) => {
                tracing::warn!(root = %root.display(), "failed to scan repository: {err:#}");
                continue;
            }
        };
        tracing::info!(root = %root.display(), count = archives.len(), "found archives");

        for archive in &archives {
            summary.archives += 1;
            match process_archive(settings, runner, archive, &mut summary) {
                Ok(mut harvested) => records.append(&mut harvested),
                Err(err) => {
                    summary.failed += 1;
                    tracing::warn!(archive = %archive.path.display(), "skipping archive: {err:#}");
                }
            }
        }
    }

    if let Some(src_zip) = &settings.jdk_src {
        let target = settings.output.join(SOURCES_TREE).join(JDK_SOURCES_DIR);
        match extract_archive(src_zip, &target) {
            Ok(Extraction::Extracted { .. }) => summary.extracted += 1,
            Ok(Extraction::AlreadyPresent) => {}
            Err(err) => tracing::warn!(src = %src_zip.display(), "skipping JDK sources: {err:#}"),
        }
    }

    if settings.include_jdk {
        match jdk::harvest_stdlib(settings, runner) {
            Ok(mut stdlib) => {
                summary.stdlib_classes = stdlib.len();
                records.append(&mut stdlib);
            }
            Err(err) if err.downcast_ref::<JdocError>().is_some() => return Err(err),
            Err(err) => tracing::warn!("skipping standard library: {err:#}"),
        }
    }

    if settings.build_tags
        && let Err(err) = build_tags(settings, runner)
    {
        tracing::warn!("tag file not built: {err:#}");
    }

    summary.classes = records.len();
    Ok((records, summary))
}

fn process_archive(
    settings: &Settings,
    runner: &dyn ProcessRunner,
    archive: &Archive,
    summary: &mut IndexSummary,
) -> Result<Vec<ClassRecord>> {
    let target = archive.target(&settings.output);
    if let Extraction::Extracted { entries } = extract_archive(&archive.path, &target)? {
        tracing::debug!(archive = %archive.path.display(), entries, "extracted");
        summary.extracted += 1;
    }

    let doc_root = match archive.kind {
        ArchiveKind::Javadoc => target,
        ArchiveKind::Sources => {
            let has_javadoc = archive.javadoc_sibling().is_some_and(|p| p.exists());
            if has_javadoc || !settings.generate_docs {
                return Ok(Vec::new());
            }
            let doc_dir = archive.target_in(&settings.output, ArchiveKind::Javadoc);
            if generate_docs(settings, runner, &target, &doc_dir)? {
                summary.generated += 1;
            }
            doc_dir
        }
    };

    harvest_doc_tree(&settings.output, &doc_root, &archive.file_name())
}

/// Runs javadoc over an extracted source tree unless `doc_dir` already
/// exists. Returns whether documentation was generated.
pub fn generate_docs(
    settings: &Settings,
    runner: &dyn ProcessRunner,
    source_dir: &Path,
    doc_dir: &Path,
) -> Result<bool> {
    if doc_dir.exists() {
        return Ok(false);
    }

    let mut staging_os = doc_dir.as_os_str().to_os_string();
    staging_os.push(".partial");
    let staging = PathBuf::from(staging_os);
    if staging.exists() {
        std::fs::remove_dir_all(&staging)?;
    }

    let args = vec![
        "-sourcepath".to_string(),
        source_dir.to_string_lossy().to_string(),
        "-d".to_string(),
        staging.to_string_lossy().to_string(),
        "-subpackages".to_string(),
        ".".to_string(),
    ];
    let out = runner.run(&settings.tools.javadoc, &args)?;
    if !out.success {
        let _ = std::fs::remove_dir_all(&staging);
        bail!("javadoc failed: {}", out.stderr.trim());
    }

    std::fs::rename(&staging, doc_dir)
        .with_context(|| format!("Failed to move generated docs into place: {}", doc_dir.display()))?;
    Ok(true)
}

/// Class records for every type linked from the "all classes" pages found
/// below `doc_root`. Paths are relative to `output`.
pub fn harvest_doc_tree(output: &Path, doc_root: &Path, jar: &str) -> Result<Vec<ClassRecord>> {
    let root_rel = relative_slash_path(output, doc_root)?;
    let pages = find_files_named(doc_root, &ALLCLASSES_PAGES)?;
    if pages.is_empty() {
        tracing::debug!(doc_root = %doc_root.display(), "no class list page");
    }

    let mut records = Vec::new();
    for page in pages {
        let html = match std::fs::read_to_string(&page) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(page = %page.display(), "unreadable class list: {err}");
                continue;
            }
        };
        let page_dir = page
            .parent()
            .map(|dir| relative_slash_path(doc_root, dir))
            .transpose()?
            .unwrap_or_default();

        for href in ClassLinks::parse(&html, LinkMode::LocalOnly).iter() {
            let Some(doc_rel) = join_href(&page_dir, strip_anchor(href)) else {
                continue;
            };
            let Some(name) = class_name_from_href(&doc_rel) else {
                continue;
            };
            records.push(ClassRecord::new(name, format!("{root_rel}/{doc_rel}"), Some(jar)));
        }
    }
    Ok(records)
}

/// `org/acme/Foo.html` → `org.acme.Foo`. A leading module directory such as
/// `java.base/` is dropped.
pub fn class_name_from_href(href: &str) -> Option<String> {
    let stem = href.strip_suffix(".html")?;
    let mut segments: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 1 && segments[0].contains('.') {
        segments.remove(0);
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("."))
}

/// Resolves `href` against the directory `base` (both `/`-separated and
/// relative to the same root). `None` when the result escapes the root.
fn join_href(base: &str, href: &str) -> Option<String> {
    let mut parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

pub fn relative_slash_path(base: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base).with_context(|| {
        format!("{} is not below {}", path.display(), base.display())
    })?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

/// Builds `<output>/tags` over every extracted source tree.
pub fn build_tags(settings: &Settings, runner: &dyn ProcessRunner) -> Result<()> {
    let sources = settings.output.join(SOURCES_TREE);
    if !sources.is_dir() {
        bail!("no extracted sources under {}", sources.display());
    }
    let args = vec![
        "-R".to_string(),
        "--languages=Java".to_string(),
        "--fields=+K".to_string(),
        "-f".to_string(),
        settings.tags_path().to_string_lossy().to_string(),
        sources.to_string_lossy().to_string(),
    ];
    runner.run(&settings.tools.ctags, &args)?.into_stdout("ctags")?;
    Ok(())
}
