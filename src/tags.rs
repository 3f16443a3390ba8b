//! Identifier lookup through a ctags file built over the extracted sources.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::Settings;
use crate::error::JdocError;
use crate::index::{ClassRecord, Index};
use crate::indexer::{JDK_SOURCES_DIR, relative_slash_path};
use crate::matcher::{Query, finish};
use crate::scan::{JAVADOC_TREE, SOURCES_TREE, find_in_version_dir};

static VERSION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*([-.+_][0-9A-Za-z.+_-]*)?$").expect("static regex")
});

const TYPE_KINDS: [&str; 4] = ["class", "interface", "c", "i"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub file: String,
    pub kind: String,
}

pub fn parse_tag_line(line: &str) -> Option<TagEntry> {
    if line.starts_with("!_TAG") {
        return None;
    }
    let mut fields = line.split('\t');
    let name = fields.next()?.to_string();
    let file = fields.next()?.to_string();
    // The ex command may itself contain tabs only in pathological cases;
    // the kind is the first extension field after `;"`.
    let kind = fields
        .skip_while(|f| !f.ends_with(";\""))
        .nth(1)
        .map(|k| k.trim_start_matches("kind:").to_string())?;
    Some(TagEntry { name, file, kind })
}

/// Class records for type tags whose identifier equals one of the query
/// patterns, pushed through the same ordering and filtering as index
/// matches.
pub fn find_tagged(settings: &Settings, index: &Index, query: &Query) -> Result<Vec<ClassRecord>> {
    let tags_path = settings.tags_path();
    if !tags_path.exists() {
        return Err(JdocError::Config(format!(
            "tag file not found at {} (run `jdoc index --tags`)",
            tags_path.display()
        ))
        .into());
    }
    let raw = std::fs::read_to_string(&tags_path)
        .with_context(|| format!("Failed to read tag file: {}", tags_path.display()))?;

    let wanted = |name: &str| {
        query.patterns.iter().any(|p| {
            if query.ignorecase {
                p.eq_ignore_ascii_case(name)
            } else {
                p == name
            }
        })
    };

    let records = raw
        .lines()
        .filter_map(parse_tag_line)
        .filter(|tag| TYPE_KINDS.contains(&tag.kind.as_str()) && wanted(&tag.name))
        .filter_map(|tag| record_from_tag(&settings.output, index, &tag))
        .collect();
    Ok(finish(records, query.latest))
}

/// Splits a tagged source path into provenance and class path at the
/// version directory, e.g.
/// `sources/maven/org/acme/acme/1.0/acme-1.0-sources/org/acme/Foo.java`.
pub fn record_from_tag(output: &Path, index: &Index, tag: &TagEntry) -> Option<ClassRecord> {
    let file = Path::new(&tag.file);
    let rel = if file.is_absolute() {
        relative_slash_path(output, file).ok()?
    } else {
        tag.file.replace('\\', "/")
    };
    let segments: Vec<&str> = rel.split('/').collect();
    if segments.first() != Some(&SOURCES_TREE) {
        return None;
    }

    if segments.get(1) == Some(&JDK_SOURCES_DIR) {
        let name = class_name(&segments[2..], &tag.name, true)?;
        return index
            .classnames
            .iter()
            .find(|r| r.is_stdlib() && r.name == name)
            .cloned();
    }

    let version_at = segments
        .iter()
        .skip(2)
        .position(|s| VERSION_SEGMENT.is_match(s))?
        + 2;
    let archive_at = segments[version_at + 1..]
        .iter()
        .position(|s| s.ends_with("-sources"))?
        + version_at
        + 1;

    let name = class_name(&segments[archive_at + 1..], &tag.name, false)?;
    let class_html = format!("{}.html", segments[archive_at + 1..].join("/").strip_suffix(".java")?);
    let sources_stem = segments[archive_at];
    let javadoc_stem = format!("{}-javadoc", sources_stem.strip_suffix("-sources")?);

    let prefix = segments[1..archive_at].join("/");
    // The javadoc jar may sit in a different Gradle hash directory.
    let version_dir = output
        .join(JAVADOC_TREE)
        .join(segments[1..=version_at].join("/"));
    let published = find_in_version_dir(&version_dir, &javadoc_stem)
        .and_then(|dir| relative_slash_path(output, &dir).ok());
    let (doc_dir, jar) = match published {
        Some(dir) => (dir, format!("{javadoc_stem}.jar")),
        None => (
            format!("{JAVADOC_TREE}/{prefix}/{sources_stem}"),
            format!("{sources_stem}.jar"),
        ),
    };

    Some(ClassRecord::new(
        name,
        format!("{doc_dir}/{class_html}"),
        Some(&jar),
    ))
}

/// Dotted name of the type `tag_name` declared in the source file at
/// `segments`; nested types are appended to the file's top-level type.
fn class_name(segments: &[&str], tag_name: &str, modular: bool) -> Option<String> {
    let mut parts: Vec<&str> = segments.to_vec();
    if modular && parts.len() > 1 && parts[0].contains('.') {
        parts.remove(0);
    }
    let file = parts.pop()?.strip_suffix(".java")?;
    parts.push(file);
    if file != tag_name {
        parts.push(tag_name);
    }
    Some(parts.join("."))
}
