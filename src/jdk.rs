//! Standard-library coverage: the installed JDK's major version decides
//! which published "all classes" page is harvested.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::Settings;
use crate::error::JdocError;
use crate::index::{ClassRecord, STDLIB_JAR};
use crate::indexer::class_name_from_href;
use crate::links::{ClassLinks, LinkMode};
use crate::runner::ProcessRunner;

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version "(\d+)(?:\.(\d+))?"#).expect("static regex"));

pub const ALLCLASSES_PAGE: &str = "allclasses-index.html";

/// Major version from `java -version` output. Pre-9 runtimes report
/// `1.N`, which maps to `N`.
pub fn parse_major_version(output: &str) -> Result<u32> {
    let caps = VERSION_TOKEN.captures(output).ok_or_else(|| {
        JdocError::Config(format!(
            "could not find a version string in `java -version` output: {}",
            output.trim()
        ))
    })?;

    let first: u32 = caps[1]
        .parse()
        .map_err(|_| JdocError::Config(format!("invalid java version: {}", &caps[0])))?;
    if first == 1
        && let Some(minor) = caps.get(2)
        && let Ok(minor) = minor.as_str().parse::<u32>()
    {
        return Ok(minor);
    }
    Ok(first)
}

pub fn detect_major_version(settings: &Settings, runner: &dyn ProcessRunner) -> Result<u32> {
    let out = runner.run(&settings.tools.java, &["-version".to_string()])?;
    // `java -version` historically prints to stderr.
    let combined = format!("{}\n{}", out.stderr, out.stdout);
    parse_major_version(&combined)
}

pub fn fetch(settings: &Settings, runner: &dyn ProcessRunner, url: &str) -> Result<String> {
    let args = ["-L", "--fail", "--silent", "--show-error", url].map(str::to_string);
    runner.run(&settings.tools.curl, &args)?.into_stdout("curl")
}

/// Class records for the standard library of the installed JDK, pointing at
/// the published documentation.
pub fn harvest_stdlib(settings: &Settings, runner: &dyn ProcessRunner) -> Result<Vec<ClassRecord>> {
    let major = detect_major_version(settings, runner)?;
    let base = settings.jdk_docs_base_for(major);
    let url = format!("{base}/{ALLCLASSES_PAGE}");
    tracing::info!(%url, "fetching standard library class list");

    let body = fetch(settings, runner, &url)?;
    Ok(stdlib_records(&base, &body))
}

pub fn stdlib_records(base: &str, html: &str) -> Vec<ClassRecord> {
    ClassLinks::parse(html, LinkMode::IncludeExternal)
        .iter()
        .filter_map(|href| {
            let href = strip_anchor(href);
            let url = if href.starts_with("http://") || href.starts_with("https://") {
                href.to_string()
            } else {
                format!("{base}/{}", href.trim_start_matches("./"))
            };
            let relative = url.strip_prefix(base).unwrap_or(&url).trim_start_matches('/');
            let name = class_name_from_href(relative)?;
            Some(ClassRecord::new(name, url.clone(), Some(STDLIB_JAR)))
        })
        .collect()
}

pub fn strip_anchor(href: &str) -> &str {
    let end = href.find(['#', '?']).unwrap_or(href.len());
    &href[..end]
}
