use crate::index::ClassRecord;
use crate::jar::ParsedJar;

/// `group:artifact:version` for a record, read back from the repository
/// layout preserved in its documentation path. Falls back to the jar name
/// when the layout is not recognised.
pub fn coordinate(record: &ClassRecord) -> String {
    if record.is_stdlib() {
        return match jdk_version_in_url(&record.path) {
            Some(v) => format!("openjdk:jdk:{v}"),
            None => "openjdk:jdk".to_string(),
        };
    }
    let Some(jar) = record.jar.as_deref() else {
        return "-".to_string();
    };
    from_layout(&record.path, jar).unwrap_or_else(|| jar.to_string())
}

fn from_layout(path: &str, jar: &str) -> Option<String> {
    let stem = jar.strip_suffix(".jar").unwrap_or(jar);
    let segments: Vec<&str> = path.split('/').collect();
    // <tree>/<repo>/<layout dirs...>/<archive dir>/<class path...>
    let archive_at = segments.iter().position(|s| *s == stem)?;
    let dirs = segments.get(2..archive_at)?;

    let parsed = ParsedJar::parse(jar);
    let artifact_at = dirs.iter().rposition(|d| *d == parsed.artifact)?;
    if artifact_at == 0 {
        return None;
    }
    let group = dirs[..artifact_at].join(".");
    Some(format!("{group}:{}:{}", parsed.artifact, parsed.version))
}

fn jdk_version_in_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/javase/")?;
    let version = rest.split('/').next()?;
    (!version.is_empty() && version.chars().all(|c| c.is_ascii_digit())).then_some(version)
}
