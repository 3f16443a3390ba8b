use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "jdoc_it_{}_{}_{}",
        std::process::id(),
        nanos,
        name
    ))
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    use std::io::Write;
    use zip::write::FileOptions;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(())
}

const ALLCLASSES: &str = r#"<html><body><main>
<div class="col-first"><a href="org/acme/Foo.html" title="class in org.acme">Foo</a></div>
<div class="col-first"><a href="org/acme/Bar.html" title="interface in org.acme">Bar</a></div>
<div class="col-first"><a href="org/acme/Baz.html" title="class in org.acme">Baz</a></div>
<div class="col-first"><a href="https://docs.oracle.com/en/java/javase/21/docs/api/java.base/java/lang/Object.html" title="class in java.lang">Object</a></div>
</main></body></html>"#;

const FOO_PAGE: &str = r#"<html><body>
<div class="header">
<div class="sub-title"><span class="package-label-in-type">Package</span>&nbsp;<a href="package-summary.html">org.acme</a></div>
<h1 title="Class Foo" class="title">Class Foo</h1>
</div>
<div class="inheritance" title="Inheritance Tree">java.lang.Object
<div class="inheritance">org.acme.Foo</div>
</div>
<section class="class-description"><div class="block">Foo does things.</div></section>
<section class="method-summary">
<div class="summary-table three-column-summary">
<div class="table-header col-first">Modifier and Type</div>
<div class="table-header col-second">Method</div>
<div class="table-header col-last">Description</div>
<div class="col-first"><code>void</code></div>
<div class="col-second"><code>run()</code></div>
<div class="col-last"><div class="block">Runs the foo.</div></div>
</div>
</section>
</body></html>"#;

const FOO_SOURCE: &str = "package org.acme;\n\npublic class Foo {\n    public void run() {}\n}\n";

struct Fixture {
    base: PathBuf,
    out: PathBuf,
    pom: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> anyhow::Result<Self> {
        let base = temp_dir(name);
        let m2 = base.join("m2");
        write_jar(
            &m2.join("org/acme/acme/1.0/acme-1.0-javadoc.jar"),
            &[
                ("allclasses-index.html", ALLCLASSES.as_bytes()),
                ("org/acme/Foo.html", FOO_PAGE.as_bytes()),
            ],
        )?;
        write_jar(
            &m2.join("org/acme/acme/1.0/acme-1.0-sources.jar"),
            &[("org/acme/Foo.java", FOO_SOURCE.as_bytes())],
        )?;
        let pom = base.join("project/pom.xml");
        write_file(&pom, "<project/>")?;
        Ok(Self {
            out: base.join("out"),
            base,
            pom,
        })
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<Output> {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jdoc"));
        cmd.arg("--maven-repo")
            .arg(self.base.join("m2"))
            .arg("--gradle-repo")
            .arg(self.base.join("no-gradle"))
            .arg("-o")
            .arg(&self.out)
            .args(args)
            .env_remove("JAVA_HOME")
            .env_remove("RUST_LOG");
        Ok(cmd.output()?)
    }

    fn index(&self) -> anyhow::Result<serde_json::Value> {
        let project = self.base.join("project");
        let out = self.run(&[
            "index",
            "--skip-jdk",
            "--skip-docgen",
            "--project-root",
            project.to_str().unwrap(),
        ])?;
        assert!(
            out.status.success(),
            "index failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(serde_json::from_slice(&out.stdout)?)
    }

    fn find(&self, args: &[&str]) -> anyhow::Result<String> {
        let out = self.run(args)?;
        assert!(
            out.status.success(),
            "find failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(String::from_utf8(out.stdout)?)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

#[test]
fn index_then_query_flow() -> anyhow::Result<()> {
    let fx = Fixture::new("flow")?;

    let summary = fx.index()?;
    assert_eq!(summary["archives"], 2);
    assert_eq!(summary["classes"], 3);
    assert_eq!(summary["extracted"], 2);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["build_files"], 1);

    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fx.out.join("index.json"))?)?;
    assert_eq!(index["classnames"].as_array().map(Vec::len), Some(3));
    let pom_key = fx.pom.to_string_lossy().to_string();
    assert!(index["pomfiles"][pom_key.as_str()]["last_modified"].is_u64());

    // Broad query: a listing, not a document.
    let listing = fx.find(&["acme"])?;
    assert_eq!(
        listing,
        "org.acme:acme:1.0\torg.acme.Bar\norg.acme:acme:1.0\torg.acme.Baz\norg.acme:acme:1.0\torg.acme.Foo\n"
    );

    // Unique query: the plaintext transcript.
    let transcript = fx.find(&["find", "-e", "Foo"])?;
    assert!(transcript.starts_with("PACKAGE\n    org.acme\n\nCLASS\n    Class Foo\n"));
    assert!(transcript.contains("INHERITANCE\n    java.lang.Object\n      org.acme.Foo\n"));
    assert!(transcript.contains("METHOD SUMMARY\n    void run()\n        Runs the foo.\n"));

    let leading_flags = fx.find(&["-e", "Foo", "-l"])?;
    assert_eq!(leading_flags, transcript);

    let tsv = fx.find(&["Ba", "--format", "tsv"])?;
    let rows: Vec<Vec<&str>> = tsv.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == 3));
    assert_eq!(rows[0][0], "org.acme.Bar");
    assert_eq!(rows[0][1], "acme-1.0-javadoc.jar");
    assert!(rows[0][2].starts_with("file:///"));
    assert!(rows[0][2].ends_with("acme-1.0-javadoc/org/acme/Bar.html"));

    let source = fx.find(&["Foo", "-e", "--source"])?;
    assert_eq!(source, FOO_SOURCE);

    assert_eq!(fx.find(&["NoSuchClass"])?, "");
    Ok(())
}

#[test]
fn stale_build_file_warns_but_still_answers() -> anyhow::Result<()> {
    let fx = Fixture::new("stale")?;
    fx.index()?;

    let later = SystemTime::now() + Duration::from_secs(120);
    std::fs::File::options()
        .write(true)
        .open(&fx.pom)?
        .set_modified(later)?;

    let out = fx.run(&["Foo", "-e"])?;
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("changed since the index was built"), "{stderr}");
    assert!(String::from_utf8(out.stdout)?.starts_with("PACKAGE\n"));
    Ok(())
}

#[test]
fn query_before_index_fails_with_guidance() -> anyhow::Result<()> {
    let fx = Fixture::new("noindex")?;
    let out = fx.run(&["Foo"])?;
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("jdoc index"), "{stderr}");
    Ok(())
}

#[test]
fn exact_lookup_without_a_name_is_rejected() -> anyhow::Result<()> {
    let fx = Fixture::new("noname")?;
    fx.index()?;
    let out = fx.run(&["find", "-e"])?;
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--exact needs at least one class name"), "{stderr}");
    Ok(())
}

#[test]
fn invalid_pattern_fails() -> anyhow::Result<()> {
    let fx = Fixture::new("badpattern")?;
    fx.index()?;
    let out = fx.run(&["(unclosed"])?;
    assert!(!out.status.success());
    Ok(())
}
