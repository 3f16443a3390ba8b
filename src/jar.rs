use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static NUMERIC_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?$").expect("static regex")
});

const CLASSIFIERS: [&str; 2] = ["-javadoc", "-sources"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionParts {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// An archive file name split into artifact and version,
/// e.g. `httpclient-4.5.3-javadoc.jar` → `httpclient` / `4.5.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedJar {
    pub artifact: String,
    pub version: String,
    pub version_parts: Option<VersionParts>,
}

impl ParsedJar {
    pub fn parse(jar: &str) -> Self {
        let mut stem = jar.strip_suffix(".jar").unwrap_or(jar);
        for classifier in CLASSIFIERS {
            if let Some(s) = stem.strip_suffix(classifier) {
                stem = s;
                break;
            }
        }

        let tokens: Vec<&str> = stem.split('-').collect();
        let version_at = tokens
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, t)| t.starts_with(|c: char| c.is_ascii_digit()))
            .map(|(i, _)| i);

        let (artifact, version) = match version_at {
            Some(i) => (tokens[..i].join("-"), tokens[i..].join("-")),
            None => (stem.to_string(), String::new()),
        };
        let version_parts = parse_version(&version);

        Self {
            artifact,
            version,
            version_parts,
        }
    }

    /// Newest first; unparsed versions after every parsed one.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.version_parts, other.version_parts) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Dotted numeric versions of one to three components; missing components are 0.
pub fn parse_version(version: &str) -> Option<VersionParts> {
    let caps = NUMERIC_VERSION.captures(version)?;
    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(VersionParts {
        major: part(1)?,
        minor: part(2)?,
        patch: part(3)?,
    })
}
