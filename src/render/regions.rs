//! Structural regions of a Javadoc class page.
//!
//! Each region has its own extractor so that a change in the generated
//! markup only needs a new extractor, not new branches in the renderer.
//! [`Layout`] bundles the extractors for one generation of the javadoc
//! page format.

use scraper::{ElementRef, Html, Selector};

/// Outcome of looking for one region. `Absent` means the page legitimately
/// has no such region; `Malformed` means it exists but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Found(T),
    Absent,
    Malformed(String),
}

pub trait RegionExtractor {
    type Region;

    fn extract(&self, document: &Html) -> Extracted<Self::Region>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub package: String,
    pub title: String,
}

/// Ancestors first; the depth of an entry is its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inheritance(pub Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodEntry {
    pub return_type: String,
    pub signature: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSummary(pub Vec<MethodEntry>);

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

pub fn normalize_whitespace(s: &str) -> String {
    s.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

pub struct HeaderExtractor {
    container: Selector,
    sub_title: Selector,
    title: Selector,
}

impl RegionExtractor for HeaderExtractor {
    type Region = Header;

    fn extract(&self, document: &Html) -> Extracted<Header> {
        let Some(header) = document.select(&self.container).next() else {
            return Extracted::Absent;
        };

        let package = header
            .select(&self.sub_title)
            .map(|el| element_text(&el))
            .find_map(|text| text.strip_prefix("Package").map(|p| p.trim().to_string()));
        let Some(package) = package.filter(|p| !p.is_empty()) else {
            return Extracted::Malformed("package name".to_string());
        };

        let Some(title) = header.select(&self.title).next().map(|el| element_text(&el)) else {
            return Extracted::Malformed("class title".to_string());
        };
        Extracted::Found(Header { package, title })
    }
}

pub struct InheritanceExtractor {
    tree: Selector,
}

impl InheritanceExtractor {
    fn walk(&self, el: ElementRef<'_>, out: &mut Vec<String>) {
        let mut own = String::new();
        let mut nested = None;
        for child in el.children() {
            if let Some(text) = child.value().as_text() {
                own.push_str(text);
                continue;
            }
            let Some(child_el) = ElementRef::wrap(child) else {
                continue;
            };
            let inner = if self.tree.matches(&child_el) {
                Some(child_el)
            } else {
                child_el.select(&self.tree).next()
            };
            match inner {
                Some(inner) if nested.is_none() => nested = Some(inner),
                Some(_) => {}
                None => own.push_str(&child_el.text().collect::<String>()),
            }
        }

        let own = normalize_whitespace(&own);
        if !own.is_empty() {
            out.push(own);
        }
        if let Some(inner) = nested {
            self.walk(inner, out);
        }
    }
}

impl RegionExtractor for InheritanceExtractor {
    type Region = Inheritance;

    fn extract(&self, document: &Html) -> Extracted<Inheritance> {
        let Some(root) = document.select(&self.tree).next() else {
            return Extracted::Absent;
        };
        let mut chain = Vec::new();
        self.walk(root, &mut chain);
        if chain.is_empty() {
            return Extracted::Malformed("empty inheritance tree".to_string());
        }
        Extracted::Found(Inheritance(chain))
    }
}

pub struct DescriptionExtractor {
    block: Selector,
}

impl RegionExtractor for DescriptionExtractor {
    type Region = Description;

    fn extract(&self, document: &Html) -> Extracted<Description> {
        match document.select(&self.block).next().map(|el| element_text(&el)) {
            Some(text) if !text.is_empty() => Extracted::Found(Description(text)),
            _ => Extracted::Absent,
        }
    }
}

/// JDK 17+ method summary: a CSS grid of `col-first` / `col-second` /
/// `col-last` cells.
pub struct GridMethodTable {
    section: Selector,
    table: Selector,
    block: Selector,
}

impl RegionExtractor for GridMethodTable {
    type Region = MethodSummary;

    fn extract(&self, document: &Html) -> Extracted<MethodSummary> {
        let Some(section) = document.select(&self.section).next() else {
            return Extracted::Absent;
        };
        let Some(table) = section.select(&self.table).next() else {
            return Extracted::Malformed("method summary table".to_string());
        };

        let mut entries: Vec<MethodEntry> = Vec::new();
        for cell in table.children().filter_map(ElementRef::wrap) {
            let classes: Vec<&str> = cell.value().classes().collect();
            if classes.contains(&"table-header") {
                continue;
            }
            if classes.contains(&"col-first") {
                entries.push(MethodEntry {
                    return_type: element_text(&cell),
                    ..Default::default()
                });
            } else if classes.contains(&"col-second") {
                match entries.last_mut() {
                    Some(entry) => entry.signature = element_text(&cell),
                    None => return Extracted::Malformed("method cell without type".to_string()),
                }
            } else if classes.contains(&"col-last")
                && let Some(entry) = entries.last_mut()
            {
                entry.description = block_text(&cell, &self.block);
            }
        }

        if entries.iter().any(|e| e.signature.is_empty()) {
            return Extracted::Malformed("method without signature".to_string());
        }
        Extracted::Found(MethodSummary(entries))
    }
}

/// Pre-17 method summary: a `<table>` with `colFirst` / `colSecond` /
/// `colLast` cells per row.
pub struct RowMethodTable {
    table: Selector,
    row: Selector,
    first: Selector,
    second: Selector,
    last: Selector,
    block: Selector,
}

impl RegionExtractor for RowMethodTable {
    type Region = MethodSummary;

    fn extract(&self, document: &Html) -> Extracted<MethodSummary> {
        let Some(table) = document.select(&self.table).next() else {
            return Extracted::Absent;
        };

        let mut entries = Vec::new();
        for row in table.select(&self.row) {
            let (Some(first), Some(second)) = (
                row.select(&self.first).next(),
                row.select(&self.second).next(),
            ) else {
                continue;
            };
            entries.push(MethodEntry {
                return_type: element_text(&first),
                signature: element_text(&second),
                description: row
                    .select(&self.last)
                    .next()
                    .and_then(|cell| block_text(&cell, &self.block)),
            });
        }

        if entries.is_empty() {
            return Extracted::Malformed("method summary rows".to_string());
        }
        Extracted::Found(MethodSummary(entries))
    }
}

fn block_text(cell: &ElementRef<'_>, block: &Selector) -> Option<String> {
    let text = match cell.select(block).next() {
        Some(b) => element_text(&b),
        None => element_text(cell),
    };
    (!text.is_empty()).then_some(text)
}

/// The extractors for one javadoc page format.
pub struct Layout {
    pub header: HeaderExtractor,
    pub inheritance: InheritanceExtractor,
    pub description: DescriptionExtractor,
    pub methods: Box<dyn RegionExtractor<Region = MethodSummary>>,
}

impl Layout {
    /// Pages generated by JDK 17 and later.
    pub fn modern() -> Self {
        Self {
            header: HeaderExtractor {
                container: selector("div.header"),
                sub_title: selector(".sub-title"),
                title: selector(".title"),
            },
            inheritance: InheritanceExtractor {
                tree: selector("div.inheritance"),
            },
            description: DescriptionExtractor {
                block: selector("section.class-description div.block"),
            },
            methods: Box::new(GridMethodTable {
                section: selector("section.method-summary"),
                table: selector("div.summary-table"),
                block: selector("div.block"),
            }),
        }
    }

    /// Pages generated by JDK 9 through 16.
    pub fn legacy() -> Self {
        Self {
            header: HeaderExtractor {
                container: selector("div.header"),
                sub_title: selector(".subTitle"),
                title: selector(".title"),
            },
            inheritance: InheritanceExtractor {
                tree: selector("ul.inheritance"),
            },
            description: DescriptionExtractor {
                block: selector("div.description div.block"),
            },
            methods: Box::new(RowMethodTable {
                table: selector("table.memberSummary"),
                row: selector("tr"),
                first: selector("td.colFirst"),
                second: selector("th.colSecond, td.colSecond"),
                last: selector("td.colLast"),
                block: selector("div.block"),
            }),
        }
    }

    pub fn detect(document: &Html) -> Self {
        let legacy_marker = selector("div.subTitle, ul.inheritance, table.memberSummary");
        if document.select(&legacy_marker).next().is_some() {
            Self::legacy()
        } else {
            Self::modern()
        }
    }
}
