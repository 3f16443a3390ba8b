use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "jdoc")]
#[command(about = "Find and read Javadoc for classes in local Maven/Gradle caches and the JDK")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, value_name = "DIR")]
    pub maven_repo: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    pub gradle_repo: Option<PathBuf>,

    /// JDK source archive (defaults to $JAVA_HOME/lib/src.zip)
    #[arg(long, value_name = "FILE")]
    pub jdk_src: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract archives and rebuild the class index
    Index {
        /// Delete the output directory before indexing
        #[arg(long)]
        clean: bool,

        #[arg(long)]
        skip_jdk: bool,

        /// Do not run javadoc for archives that only ship sources
        #[arg(long)]
        skip_docgen: bool,

        /// Also build a ctags file over the extracted sources
        #[arg(long)]
        tags: bool,

        /// Directory searched for pom.xml / build.gradle files
        #[arg(long, value_name = "DIR")]
        project_root: Option<PathBuf>,
    },
    /// Query the index (default when no subcommand is given)
    Find {
        /// Regular expressions (or names with -e/--tags); all classes when omitted
        #[arg(value_name = "PATTERN")]
        patterns: Vec<String>,

        #[arg(short = 'i', long)]
        ignorecase: bool,

        /// Match the simple class name literally
        #[arg(short = 'e', long)]
        exact: bool,

        /// Keep only the newest version of each artifact
        #[arg(short = 'l', long)]
        latest: bool,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,

        /// Print the source file instead of the documentation
        #[arg(short = 's', long)]
        source: bool,

        /// Look patterns up as identifiers in the ctags file
        #[arg(long)]
        tags: bool,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Tsv,
    Csv,
    Json,
}
