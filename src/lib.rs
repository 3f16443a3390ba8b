//! # jdoc
//!
//! Find and read Javadoc for classes in local Maven/Gradle caches and the
//! JDK, from the terminal.
//!
//! ## Architecture
//!
//! - **scan**: Archive and build descriptor discovery in repository layouts
//! - **extract**: Idempotent unpacking of javadoc/sources archives
//! - **runner**: External program invocation (java, javadoc, ctags, curl)
//! - **links**: Class link extraction from "all classes" pages
//! - **jdk**: Standard library harvesting from the remote API docs
//! - **indexer**: Per-archive build pipeline with failure isolation
//! - **index**: JSON index persistence and staleness checks
//! - **jar**: Artifact/version parsing of archive names
//! - **matcher**: Pattern matching, latest-version filtering and dedup
//! - **tags**: Identifier lookup through a ctags file
//! - **coordinate**: `group:artifact:version` labels for listings
//! - **render**: Listing, plaintext transcript, source and row output

pub mod cli;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod extract;
pub mod index;
pub mod indexer;
pub mod jar;
pub mod jdk;
pub mod links;
pub mod matcher;
pub mod render;
pub mod runner;
pub mod scan;
pub mod tags;
