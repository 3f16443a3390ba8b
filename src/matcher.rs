use anyhow::Result;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::JdocError;
use crate::index::{ClassRecord, Index};
use crate::jar::ParsedJar;

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub patterns: Vec<String>,
    pub ignorecase: bool,
    pub latest: bool,
    pub exact_name: bool,
}

enum Matcher {
    Exact { names: Vec<String>, ignorecase: bool },
    Regex(Vec<Regex>),
}

impl Matcher {
    fn new(query: &Query) -> Result<Self> {
        if query.exact_name {
            return Ok(Matcher::Exact {
                names: query.patterns.clone(),
                ignorecase: query.ignorecase,
            });
        }
        let regexes = query
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(query.ignorecase)
                    .build()
                    .map_err(JdocError::from)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Matcher::Regex(regexes))
    }

    fn matches(&self, record: &ClassRecord) -> bool {
        match self {
            Matcher::Exact { names, ignorecase } => {
                let simple = record.simple_name();
                names.iter().any(|n| {
                    if *ignorecase {
                        n.eq_ignore_ascii_case(simple)
                    } else {
                        n == simple
                    }
                })
            }
            Matcher::Regex(regexes) => regexes.iter().any(|re| {
                re.is_match(&record.name) || record.jar.as_deref().is_some_and(|j| re.is_match(j))
            }),
        }
    }
}

/// Records matching any of the query's patterns, sorted by `(name, jar)`,
/// optionally narrowed to the newest archive per artifact, without
/// duplicate `(name, jar)` rows.
pub fn find_matches(index: &Index, query: &Query) -> Result<Vec<ClassRecord>> {
    if query.patterns.is_empty() {
        return Ok(Vec::new());
    }
    let matcher = Matcher::new(query)?;
    let matched: Vec<ClassRecord> = index
        .classnames
        .iter()
        .filter(|r| matcher.matches(r))
        .cloned()
        .collect();
    Ok(finish(matched, query.latest))
}

/// Sorting, latest-version filtering and deduplication shared by every
/// lookup path.
pub fn finish(mut records: Vec<ClassRecord>, latest: bool) -> Vec<ClassRecord> {
    records.sort_by(cmp_name_jar);
    if latest {
        records = latest_only(records);
    }
    dedup(records)
}

fn cmp_name_jar(a: &ClassRecord, b: &ClassRecord) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.jar.cmp(&b.jar))
}

/// Keeps, per artifact, only the records of its newest jar. Standard-library
/// and unattributed records always survive.
pub fn latest_only(records: Vec<ClassRecord>) -> Vec<ClassRecord> {
    let mut seen = HashSet::new();
    let mut groups: HashMap<String, Vec<ParsedJar>> = HashMap::new();
    let mut jar_names: HashMap<String, String> = HashMap::new();
    for record in &records {
        let Some(jar) = record.jar.as_deref() else {
            continue;
        };
        if record.is_stdlib() || !seen.insert(jar) {
            continue;
        }
        let parsed = ParsedJar::parse(jar);
        jar_names.insert(jar.to_string(), parsed.artifact.clone());
        groups.entry(parsed.artifact.clone()).or_default().push(parsed);
    }

    let newest: HashMap<String, String> = groups
        .into_iter()
        .filter_map(|(artifact, mut jars)| {
            jars.sort_by(ParsedJar::cmp_newest_first);
            let top = jars.first()?;
            Some((artifact, top.version.clone()))
        })
        .collect();

    records
        .into_iter()
        .filter(|record| {
            let Some(jar) = record.jar.as_deref() else {
                return true;
            };
            if record.is_stdlib() {
                return true;
            }
            let artifact = &jar_names[jar];
            newest.get(artifact).is_some_and(|v| *v == ParsedJar::parse(jar).version)
        })
        .collect()
}

fn dedup(records: Vec<ClassRecord>) -> Vec<ClassRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.name.clone(), r.jar.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::STDLIB_JAR;

    fn record(name: &str, jar: Option<&str>) -> ClassRecord {
        ClassRecord::new(name, format!("docs/{}.html", name.replace('.', "/")), jar)
    }

    fn index(records: Vec<ClassRecord>) -> Index {
        Index {
            classnames: records,
            ..Default::default()
        }
    }

    fn query(patterns: &[&str]) -> Query {
        Query {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn names_and_jars(records: &[ClassRecord]) -> Vec<(String, Option<String>)> {
        records
            .iter()
            .map(|r| (r.name.clone(), r.jar.clone()))
            .collect()
    }

    #[test]
    fn exact_name_matches_last_segment_only() -> Result<()> {
        let idx = index(vec![
            record("org.apache.http.client.HttpClient", Some("httpclient-4.5.3.jar")),
            record("org.apache.http.client.HttpClientBuilder", Some("httpclient-4.5.3.jar")),
            record("org.other.HttpClient.Inner", Some("other-1.0.jar")),
        ]);
        let mut q = query(&["HttpClient"]);
        q.exact_name = true;

        let found = find_matches(&idx, &q)?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "org.apache.http.client.HttpClient");
        Ok(())
    }

    #[test]
    fn exact_name_respects_ignorecase() -> Result<()> {
        let idx = index(vec![record("org.acme.Foo", Some("acme-1.0.jar"))]);
        let mut q = query(&["foo"]);
        q.exact_name = true;
        assert!(find_matches(&idx, &q)?.is_empty());
        q.ignorecase = true;
        assert_eq!(find_matches(&idx, &q)?.len(), 1);
        Ok(())
    }

    #[test]
    fn regex_searches_name_or_jar() -> Result<()> {
        let idx = index(vec![
            record("org.acme.Foo", Some("acme-1.0.jar")),
            record("org.other.Bar", Some("other-2.0.jar")),
            record("org.loose.Baz", None),
        ]);

        let by_name = find_matches(&idx, &query(&["acme\\.F"]))?;
        assert_eq!(by_name.len(), 1);

        let by_jar = find_matches(&idx, &query(&["other-2"]))?;
        assert_eq!(by_jar[0].name, "org.other.Bar");

        let insensitive = find_matches(
            &idx,
            &Query {
                ignorecase: true,
                ..query(&["BAZ"])
            },
        )?;
        assert_eq!(insensitive.len(), 1);
        assert!(find_matches(&idx, &query(&["BAZ"]))?.is_empty());
        Ok(())
    }

    #[test]
    fn empty_patterns_match_nothing() -> Result<()> {
        let idx = index(vec![record("org.acme.Foo", Some("acme-1.0.jar"))]);
        assert!(find_matches(&idx, &query(&[]))?.is_empty());
        assert_eq!(find_matches(&idx, &query(&[".*"]))?.len(), 1);
        Ok(())
    }

    #[test]
    fn invalid_regex_is_pattern_error() {
        let idx = index(vec![]);
        let err = find_matches(&idx, &query(&["(unclosed"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JdocError>(),
            Some(JdocError::Pattern(_))
        ));
    }

    #[test]
    fn results_are_sorted_by_name_then_jar() -> Result<()> {
        let idx = index(vec![
            record("org.b.Thing", Some("b-1.0.jar")),
            record("org.a.Thing", Some("z-1.0.jar")),
            record("org.a.Thing", Some("a-1.0.jar")),
            record("org.a.Thing", None),
        ]);
        let found = find_matches(&idx, &query(&["Thing"]))?;
        assert_eq!(
            names_and_jars(&found),
            vec![
                ("org.a.Thing".to_string(), None),
                ("org.a.Thing".to_string(), Some("a-1.0.jar".to_string())),
                ("org.a.Thing".to_string(), Some("z-1.0.jar".to_string())),
                ("org.b.Thing".to_string(), Some("b-1.0.jar".to_string())),
            ]
        );
        Ok(())
    }

    #[test]
    fn duplicate_harvests_collapse_to_one_row() -> Result<()> {
        let idx = index(vec![
            record("org.acme.Foo", Some("acme-1.0.jar")),
            ClassRecord::new("org.acme.Foo", "other/page/Foo.html", Some("acme-1.0.jar")),
        ]);
        let found = find_matches(&idx, &query(&["Foo"]))?;
        assert_eq!(found.len(), 1);
        Ok(())
    }

    #[test]
    fn latest_keeps_newest_jar_per_artifact() -> Result<()> {
        let idx = index(vec![
            record("org.acme.Foo", Some("acme-1.0.jar")),
            record("org.acme.Foo", Some("acme-2.0.jar")),
        ]);
        let found = find_matches(
            &idx,
            &Query {
                latest: true,
                ..query(&["Foo"])
            },
        )?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].jar.as_deref(), Some("acme-2.0.jar"));
        Ok(())
    }

    #[test]
    fn latest_prefers_parsed_versions_over_qualified_ones() {
        let records = vec![
            record("foo.A", Some("foo-1.0.0.jar")),
            record("foo.A", Some("foo-1.2.0.jar")),
            record("foo.A", Some("foo-2.0.0-SNAPSHOT.jar")),
            record("bar.B", Some("bar-3.0.0-RC1.jar")),
        ];
        let kept = finish(records, true);
        assert_eq!(
            names_and_jars(&kept),
            vec![
                ("bar.B".to_string(), Some("bar-3.0.0-RC1.jar".to_string())),
                ("foo.A".to_string(), Some("foo-1.2.0.jar".to_string())),
            ]
        );
    }

    #[test]
    fn latest_always_keeps_stdlib_and_unattributed_records() {
        let records = vec![
            record("java.lang.String", Some(STDLIB_JAR)),
            record("org.loose.Thing", None),
            record("org.acme.Foo", Some("acme-1.0.0-javadoc.jar")),
            record("org.acme.Foo", Some("acme-1.1.0-javadoc.jar")),
        ];
        let kept = finish(records, true);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().any(|r| r.is_stdlib()));
        assert!(kept.iter().any(|r| r.jar.is_none()));
        assert!(
            kept.iter()
                .any(|r| r.jar.as_deref() == Some("acme-1.1.0-javadoc.jar"))
        );
    }

    #[test]
    fn latest_groups_across_different_classes_of_one_artifact() {
        let records = vec![
            record("org.acme.Old", Some("acme-1.0.0.jar")),
            record("org.acme.New", Some("acme-2.0.0.jar")),
        ];
        let kept = finish(records, true);
        assert_eq!(
            names_and_jars(&kept),
            vec![("org.acme.New".to_string(), Some("acme-2.0.0.jar".to_string()))]
        );
    }
}
