//! Output for query results: a listing when a query is ambiguous, a
//! plaintext transcript of the class page when it is unique, the raw source
//! file on request, or machine-readable rows.

#[cfg(test)]
mod fixtures;
pub mod regions;

use anyhow::{Context, Result};
use scraper::Html;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::coordinate::coordinate;
use crate::error::JdocError;
use crate::index::ClassRecord;
use crate::indexer::JDK_SOURCES_DIR;
use crate::scan::{JAVADOC_TREE, RepoKind, SOURCES_TREE, find_in_version_dir};
use regions::{Extracted, Layout, RegionExtractor};

pub const WRAP_WIDTH: usize = 80;
const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub source: bool,
}

pub fn render(
    output: &Path,
    matches: &[ClassRecord],
    options: RenderOptions,
    out: &mut dyn Write,
) -> Result<()> {
    if options.source && matches.len() == 1 {
        let path = source_path(output, &matches[0]);
        let source = std::fs::read_to_string(&path).map_err(|_| JdocError::SourceNotFound(path))?;
        out.write_all(source.as_bytes())?;
        return Ok(());
    }

    match options.format {
        OutputFormat::Plain => match matches {
            [single] => render_document(output, single, out),
            _ => write_listing(matches, out),
        },
        OutputFormat::Tsv => write_rows(output, matches, '\t', out),
        OutputFormat::Csv => write_rows(output, matches, ',', out),
        OutputFormat::Json => write_json_lines(output, matches, out),
    }
}

/// `coordinate<TAB>name`, one line per match, sorted.
pub fn write_listing(matches: &[ClassRecord], out: &mut dyn Write) -> Result<()> {
    let mut lines: Vec<String> = matches
        .iter()
        .map(|r| format!("{}\t{}", coordinate(r), r.name))
        .collect();
    lines.sort();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_rows(output: &Path, matches: &[ClassRecord], sep: char, out: &mut dyn Write) -> Result<()> {
    for record in matches {
        let fields = [
            record.name.clone(),
            record.jar.clone().unwrap_or_default(),
            document_url(output, record),
        ];
        let line: Vec<String> = fields
            .iter()
            .map(|f| if sep == ',' { csv_field(f) } else { f.clone() })
            .collect();
        writeln!(out, "{}", line.join(&sep.to_string()))?;
    }
    Ok(())
}

fn write_json_lines(output: &Path, matches: &[ClassRecord], out: &mut dyn Write) -> Result<()> {
    for record in matches {
        let row = serde_json::json!({
            "name": record.name,
            "jar": record.jar,
            "path": record.path,
            "url": document_url(output, record),
            "coordinate": coordinate(record),
        });
        writeln!(out, "{}", serde_json::to_string(&row)?)?;
    }
    Ok(())
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn is_remote(record: &ClassRecord) -> bool {
    record.path.starts_with("http://") || record.path.starts_with("https://")
}

/// Absolute URL of a record's documentation page.
pub fn document_url(output: &Path, record: &ClassRecord) -> String {
    if is_remote(record) {
        return record.path.clone();
    }
    let full = std::path::absolute(output.join(&record.path)).unwrap_or_else(|_| output.join(&record.path));
    let display = full.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{display}")
    } else {
        format!("file:///{display}")
    }
}

/// Where the extracted source of a record's class lives.
pub fn source_path(output: &Path, record: &ClassRecord) -> PathBuf {
    let candidate = if is_remote(record) {
        let relative = record
            .path
            .split_once("/api/")
            .map(|(_, rest)| rest)
            .unwrap_or(&record.path);
        output
            .join(SOURCES_TREE)
            .join(JDK_SOURCES_DIR)
            .join(swap_extension(relative))
    } else {
        local_source_path(output, &record.path)
    };

    if candidate.exists() {
        return candidate;
    }
    // Nested types (`Map.Entry.html`) live in their top-level type's file.
    outer_type_file(&candidate).unwrap_or(candidate)
}

fn local_source_path(output: &Path, doc_path: &str) -> PathBuf {
    let mut segments: Vec<String> = doc_path.split('/').map(str::to_string).collect();
    if segments.first().map(String::as_str) == Some(JAVADOC_TREE) {
        segments[0] = SOURCES_TREE.to_string();
    }
    let Some(archive_at) = segments
        .iter()
        .skip(2)
        .position(|s| s.ends_with("-javadoc"))
        .map(|i| i + 2)
    else {
        return output.join(swap_extension(&segments.join("/")));
    };

    let stem = segments[archive_at].trim_end_matches("-javadoc").to_string();
    segments[archive_at] = format!("{stem}-sources");
    let class_path = swap_extension(&segments[archive_at + 1..].join("/"));
    let archive_dir = output.join(segments[..=archive_at].join("/"));
    if archive_dir.is_dir() || segments[1] != RepoKind::Gradle.dir_name() {
        return archive_dir.join(class_path);
    }

    // Gradle extracts the sources jar under its own hash directory.
    let version_dir = output.join(segments[..archive_at - 1].join("/"));
    find_in_version_dir(&version_dir, &segments[archive_at])
        .unwrap_or(archive_dir)
        .join(class_path)
}

fn swap_extension(path: &str) -> String {
    match path.strip_suffix(".html") {
        Some(stem) => format!("{stem}.java"),
        None => path.to_string(),
    }
}

fn outer_type_file(path: &Path) -> Option<PathBuf> {
    let file = path.file_name()?.to_str()?;
    let (outer, _) = file.split_once('.')?;
    let outer_file = path.with_file_name(format!("{outer}.java"));
    (outer_file != path && outer_file.exists()).then_some(outer_file)
}

fn render_document(output: &Path, record: &ClassRecord, out: &mut dyn Write) -> Result<()> {
    if is_remote(record) {
        writeln!(out, "{}\t{}", record.name, record.path)?;
        return Ok(());
    }
    let path = output.join(&record.path);
    let html = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read documentation: {}", path.display()))?;
    let transcript = transcript(&path, &html)?;
    out.write_all(transcript.as_bytes())?;
    Ok(())
}

/// Plaintext rendering of a class page: PACKAGE, CLASS, INHERITANCE,
/// DESCRIPTION (when present) and METHOD SUMMARY.
pub fn transcript(path: &Path, html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let layout = Layout::detect(&document);

    let header = required(path, "header", layout.header.extract(&document))?;
    let inheritance = required(path, "inheritance", layout.inheritance.extract(&document))?;
    let description = match layout.description.extract(&document) {
        Extracted::Found(d) => Some(d),
        Extracted::Absent => None,
        Extracted::Malformed(_) => {
            return Err(JdocError::MalformedDocument {
                path: path.to_path_buf(),
                region: "description",
            }
            .into());
        }
    };
    let methods = required(path, "method summary", layout.methods.extract(&document))?;

    let mut text = String::new();
    section(&mut text, "PACKAGE");
    text.push_str(&format!("{INDENT}{}\n", header.package));
    section(&mut text, "CLASS");
    text.push_str(&format!("{INDENT}{}\n", header.title));

    section(&mut text, "INHERITANCE");
    for (depth, name) in inheritance.0.iter().enumerate() {
        text.push_str(&format!("{INDENT}{}{name}\n", "  ".repeat(depth)));
    }

    if let Some(description) = description {
        section(&mut text, "DESCRIPTION");
        for line in wrap(&description.0, WRAP_WIDTH - INDENT.len()) {
            text.push_str(&format!("{INDENT}{line}\n"));
        }
    }

    section(&mut text, "METHOD SUMMARY");
    for method in &methods.0 {
        text.push_str(&format!("{INDENT}{} {}\n", method.return_type, method.signature));
        if let Some(desc) = &method.description {
            for line in wrap(desc, WRAP_WIDTH - 2 * INDENT.len()) {
                text.push_str(&format!("{INDENT}{INDENT}{line}\n"));
            }
        }
    }
    Ok(text)
}

fn required<T>(path: &Path, region: &'static str, extracted: Extracted<T>) -> Result<T> {
    match extracted {
        Extracted::Found(value) => Ok(value),
        Extracted::Absent | Extracted::Malformed(_) => Err(JdocError::MalformedDocument {
            path: path.to_path_buf(),
            region,
        }
        .into()),
    }
}

fn section(text: &mut String, title: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(title);
    text.push('\n');
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
