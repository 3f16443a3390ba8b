use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

pub const INDEX_FILE: &str = "index.json";
pub const TAGS_FILE: &str = "tags";
pub const DEFAULT_JDK_DOCS_BASE: &str = "https://docs.oracle.com/en/java/javase/{version}/docs/api";

/// External programs invoked during indexing.
#[derive(Debug, Clone)]
pub struct Tools {
    pub java: String,
    pub javadoc: String,
    pub ctags: String,
    pub curl: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            javadoc: "javadoc".to_string(),
            ctags: "ctags".to_string(),
            curl: "curl".to_string(),
        }
    }
}

/// Everything the indexer and query engine need to know about the
/// environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub maven_repo: PathBuf,
    pub gradle_repo: PathBuf,
    pub jdk_src: Option<PathBuf>,
    pub output: PathBuf,
    pub project_root: PathBuf,
    pub tools: Tools,
    /// Contains a `{version}` placeholder for the JDK major version.
    pub jdk_docs_base: String,
    pub include_jdk: bool,
    pub generate_docs: bool,
    pub build_tags: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let home = home_dir()?;
        Ok(Self {
            maven_repo: resolve_maven_repo(cli, &home),
            gradle_repo: resolve_gradle_repo(cli, &home),
            jdk_src: resolve_jdk_src(cli),
            output: resolve_output(cli, &home),
            project_root: home.clone(),
            tools: resolve_tools(),
            jdk_docs_base: DEFAULT_JDK_DOCS_BASE.to_string(),
            include_jdk: true,
            generate_docs: true,
            build_tags: false,
        })
    }

    /// Settings rooted entirely under `output`, with no JDK harvesting.
    pub fn for_output(output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        Self {
            maven_repo: output.join("m2"),
            gradle_repo: output.join("gradle"),
            jdk_src: None,
            project_root: output.clone(),
            output,
            tools: Tools::default(),
            jdk_docs_base: DEFAULT_JDK_DOCS_BASE.to_string(),
            include_jdk: false,
            generate_docs: true,
            build_tags: false,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        index_path(&self.output)
    }

    pub fn tags_path(&self) -> PathBuf {
        self.output.join(TAGS_FILE)
    }

    pub fn jdk_docs_base_for(&self, major: u32) -> String {
        self.jdk_docs_base
            .replace("{version}", &major.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

pub fn index_path(output: &Path) -> PathBuf {
    output.join(INDEX_FILE)
}

pub fn resolve_maven_repo(cli: &Cli, home: &Path) -> PathBuf {
    if let Some(p) = cli.maven_repo.clone() {
        return p;
    }
    home.join(".m2").join("repository")
}

pub fn resolve_gradle_repo(cli: &Cli, home: &Path) -> PathBuf {
    if let Some(p) = cli.gradle_repo.clone() {
        return p;
    }
    home.join(".gradle")
        .join("caches")
        .join("modules-2")
        .join("files-2.1")
}

pub fn resolve_output(cli: &Cli, home: &Path) -> PathBuf {
    if let Some(p) = cli.output.clone() {
        return p;
    }
    home.join(".jdoc")
}

pub fn resolve_jdk_src(cli: &Cli) -> Option<PathBuf> {
    if let Some(p) = cli.jdk_src.clone() {
        return Some(p);
    }

    let java_home = env::var_os("JAVA_HOME")?;
    let src = PathBuf::from(java_home).join("lib").join("src.zip");
    src.exists().then_some(src)
}

fn resolve_tools() -> Tools {
    let tool = |var: &str, default: &str| env::var(var).unwrap_or_else(|_| default.to_string());
    Tools {
        java: tool("JDOC_JAVA", "java"),
        javadoc: tool("JDOC_JAVADOC", "javadoc"),
        ctags: tool("JDOC_CTAGS", "ctags"),
        curl: tool("JDOC_CURL", "curl"),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to resolve home directory")
}
