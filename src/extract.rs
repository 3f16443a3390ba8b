use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Extracted { entries: usize },
    AlreadyPresent,
}

/// Unpacks `archive` into `target` unless `target` already exists.
///
/// Entries are written to a `.partial` sibling first and renamed into place,
/// so an interrupted run leaves nothing that a later run would mistake for a
/// finished extraction.
pub fn extract_archive(archive: &Path, target: &Path) -> Result<Extraction> {
    if target.exists() {
        return Ok(Extraction::AlreadyPresent);
    }

    let staging = staging_path(target);
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Failed to remove stale directory: {}", staging.display()))?;
    }
    fs::create_dir_all(&staging)
        .with_context(|| format!("Failed to create directory: {}", staging.display()))?;

    let entries = match unpack(archive, &staging) {
        Ok(entries) => entries,
        Err(err) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(err);
        }
    };

    fs::rename(&staging, target).with_context(|| {
        format!(
            "Failed to move extracted archive into place: {}",
            target.display()
        )
    })?;
    Ok(Extraction::Extracted { entries })
}

fn unpack(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    // SAFETY: The file is opened read-only and remains valid for the lifetime of the mmap.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip structure: {}", archive_path.display()))?;

    let mut written = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::debug!(entry = entry.name(), "skipping entry outside archive root");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("Failed to create file: {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }
    Ok(written)
}

fn staging_path(target: &Path) -> PathBuf {
    let mut os = target.as_os_str().to_os_string();
    os.push(".partial");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};
    use zip::write::FileOptions;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "jdoc_extract_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, content) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }

        zip.finish()?;
        Ok(())
    }

    #[test]
    fn extracts_entries_into_target() -> Result<()> {
        let base = temp_path("extract_ok");
        let jar = base.join("acme-1.0-javadoc.jar");
        write_jar(
            &jar,
            &[
                ("allclasses-index.html", b"<html></html>"),
                ("org/acme/Foo.html", b"foo"),
            ],
        )?;
        let target = base.join("out/acme-1.0-javadoc");

        let result = extract_archive(&jar, &target)?;
        assert_eq!(result, Extraction::Extracted { entries: 2 });
        assert_eq!(fs::read_to_string(target.join("org/acme/Foo.html"))?, "foo");
        assert!(!staging_path(&target).exists());

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn existing_target_is_not_extracted_again() -> Result<()> {
        let base = temp_path("extract_skip");
        let jar = base.join("acme-1.0-javadoc.jar");
        write_jar(&jar, &[("org/acme/Foo.html", b"new")])?;
        let target = base.join("out/acme-1.0-javadoc");
        fs::create_dir_all(target.join("org/acme"))?;
        fs::write(target.join("org/acme/Foo.html"), "old")?;

        assert_eq!(extract_archive(&jar, &target)?, Extraction::AlreadyPresent);
        assert_eq!(fs::read_to_string(target.join("org/acme/Foo.html"))?, "old");

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn corrupt_archive_leaves_no_target_behind() -> Result<()> {
        let base = temp_path("extract_corrupt");
        fs::create_dir_all(&base)?;
        let jar = base.join("broken-javadoc.jar");
        fs::write(&jar, b"not a zip")?;
        let target = base.join("out/broken-javadoc");

        assert!(extract_archive(&jar, &target).is_err());
        assert!(!target.exists());
        assert!(!staging_path(&target).exists());

        let _ = fs::remove_dir_all(base);
        Ok(())
    }
}
