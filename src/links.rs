//! Harvesting of class-reference hyperlinks from Javadoc HTML.
//!
//! Javadoc marks links to types with a `title` attribute such as
//! `"class in org.acme"` or `"interface in org.acme"`. Those links are what
//! the "all classes" pages consist of, so extracting them yields the class
//! list of a documentation tree.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[title]").expect("static selector"));

const TYPE_TITLE_MARKERS: [&str; 2] = ["class in", "interface in"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Only links that resolve inside the local documentation tree.
    LocalOnly,
    /// Every type link, used for pages fetched from a remote host.
    IncludeExternal,
}

/// A parsed HTML document from which type links are read lazily.
pub struct ClassLinks {
    document: Html,
    mode: LinkMode,
}

impl ClassLinks {
    /// Parsing never fails; broken markup is recovered or skipped by the
    /// HTML parser.
    pub fn parse(html: &str, mode: LinkMode) -> Self {
        Self {
            document: Html::parse_document(html),
            mode,
        }
    }

    /// Link targets in document order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(&ANCHOR)
            .filter(|a| is_type_link(a))
            .filter_map(|a| a.value().attr("href"))
            .filter(move |href| self.mode == LinkMode::IncludeExternal || is_local_href(href))
    }
}

pub fn extract_links(html: &str, mode: LinkMode) -> Vec<String> {
    ClassLinks::parse(html, mode)
        .iter()
        .map(str::to_string)
        .collect()
}

fn is_type_link(anchor: &ElementRef<'_>) -> bool {
    anchor
        .value()
        .attr("title")
        .is_some_and(|title| TYPE_TITLE_MARKERS.iter().any(|m| title.contains(m)))
}

pub fn is_local_href(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    !href.trim().is_empty()
        && !lower.starts_with("http://")
        && !lower.starts_with("https://")
        && !href.contains("is-external=true")
}
