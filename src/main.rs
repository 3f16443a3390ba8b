use anyhow::{Context, Result};
use clap::Parser;
use jdoc::cli::{Cli, Commands};
use jdoc::config::Settings;
use jdoc::error::JdocError;
use jdoc::index;
use jdoc::matcher::{Query, find_matches};
use jdoc::render::{RenderOptions, render};
use jdoc::runner::SystemRunner;
use jdoc::tags::find_tagged;
use std::io::Write;
use tracing_subscriber::EnvFilter;

const MATCH_ALL: &str = ".*";

fn main() -> Result<()> {
    let cli = parse_cli()?;
    init_tracing(cli.debug);

    let mut settings = Settings::resolve(&cli)?;
    match cli.command.clone() {
        Commands::Index {
            clean,
            skip_jdk,
            skip_docgen,
            tags,
            project_root,
        } => {
            if clean && settings.output.exists() {
                tracing::info!(output = %settings.output.display(), "removing previous output");
                std::fs::remove_dir_all(&settings.output).with_context(|| {
                    format!("Failed to remove output directory: {}", settings.output.display())
                })?;
            }
            settings.include_jdk = !skip_jdk;
            settings.generate_docs = !skip_docgen;
            settings.build_tags = tags;
            if let Some(root) = project_root {
                settings.project_root = root;
            }

            let (built, summary) = index::build(&settings, &SystemRunner)?;
            index::save(&built, &settings.output)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Find {
            patterns,
            ignorecase,
            exact,
            latest,
            format,
            source,
            tags,
        } => {
            let loaded = index::load(&settings.output)?;
            for warning in index::check_staleness(&loaded) {
                tracing::warn!("{warning}");
            }

            let query = Query {
                patterns: resolve_patterns(patterns, exact, tags)?,
                ignorecase,
                latest,
                exact_name: exact,
            };
            let matches = if tags {
                find_tagged(&settings, &loaded, &query)?
            } else {
                find_matches(&loaded, &query)?
            };
            tracing::debug!(count = matches.len(), "query matched");

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render(&settings.output, &matches, RenderOptions { format, source }, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

/// No pattern lists every class; names are required when looking up by
/// exact name or through the tag file.
fn resolve_patterns(patterns: Vec<String>, exact: bool, tags: bool) -> Result<Vec<String>> {
    if !patterns.is_empty() {
        return Ok(patterns);
    }
    if exact || tags {
        let flag = if tags { "--tags" } else { "--exact" };
        return Err(JdocError::Config(format!("{flag} needs at least one class name")).into());
    }
    Ok(vec![MATCH_ALL.to_string()])
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_cli() -> Result<Cli> {
    let args: Vec<String> = std::env::args().collect();
    Ok(Cli::parse_from(rewrite_args_for_implicit_find(args)))
}

/// `jdoc Foo` means `jdoc find Foo`.
fn rewrite_args_for_implicit_find(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["index", "find", "help"];
    let value_options = ["--maven-repo", "--gradle-repo", "--jdk-src", "--output", "-o"];
    let flags = ["--debug", "--help", "-h"];

    // Only global options may precede the subcommand; anything else starts
    // the implicit `find`.
    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if value_options.contains(&a) {
            idx += 2;
            continue;
        }

        let inline_value = value_options
            .iter()
            .any(|o| o.starts_with("--") && a.starts_with(&format!("{o}=")));
        if flags.contains(&a) || inline_value {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "find".to_string());
        }
    }

    args
}
