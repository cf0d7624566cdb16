//! Writing template files into the project directory

use anyhow::{Context, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Version-control metadata never copied into a new project
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Extract one template folder out of a branch archive into `target_dir`.
///
/// GitHub archives wrap everything in a `<repo>-<branch>/` folder, so the
/// first path component of every entry is ignored. Only entries under
/// `template_path` (e.g. `project-templates/react`) are written, with that
/// prefix removed. Returns the written paths relative to `target_dir`.
pub fn extract_template(
    zip_bytes: &[u8],
    template_path: &str,
    target_dir: &Path,
) -> Result<Vec<String>> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read template archive")?;

    let prefix: PathBuf = template_path.split('/').collect();
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        // Entries that would escape the target directory come back as None
        let Some(entry_path) = file.enclosed_name() else {
            continue;
        };
        let inside_root: PathBuf = entry_path.components().skip(1).collect();
        let Ok(relative) = inside_root.strip_prefix(&prefix) else {
            continue;
        };
        if relative.as_os_str().is_empty() || is_skipped(relative) {
            continue;
        }

        let target_path = target_dir.join(relative);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        fs::write(&target_path, &contents)
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode().filter(|m| m & 0o777 != 0) {
                fs::set_permissions(&target_path, fs::Permissions::from_mode(mode & 0o777))?;
            }
        }

        written.push(to_slash(relative));
    }

    if written.is_empty() {
        anyhow::bail!("Archive has no files under {}", template_path);
    }

    Ok(written)
}

/// Recursively copy `source_dir` into `target_dir`, skipping VCS metadata.
/// Returns the copied paths relative to `target_dir`.
pub fn copy_dir(source_dir: &Path, target_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;

    let mut copied = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && SKIPPED_DIRS.iter().any(|skip| entry.file_name() == *skip))
        });

    for entry in walker {
        let entry = entry.context("Failed to walk template directory")?;
        let relative = entry.path().strip_prefix(source_dir)?;
        let target_path = target_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)
                .with_context(|| format!("Failed to create directory: {}", target_path.display()))?;
        } else {
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            // fs::copy carries permission bits along
            fs::copy(entry.path(), &target_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target_path.display()
                )
            })?;
            copied.push(to_slash(relative));
        }
    }

    Ok(copied)
}

fn is_skipped(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => SKIPPED_DIRS.iter().any(|skip| name == *skip),
        _ => false,
    })
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_only_requested_template() {
        let zip = testing::archive(&[
            ("starters-main/README.md", "root readme"),
            ("starters-main/project-templates/react/package.json", "{}"),
            ("starters-main/project-templates/react/src/main.jsx", "render()"),
            ("starters-main/project-templates/react-tailwind/package.json", "{\"tw\":1}"),
            ("starters-main/project-templates/nextjs/package.json", "{}"),
        ]);
        let temp = tempfile::TempDir::new().unwrap();

        let mut written = extract_template(&zip, "project-templates/react", temp.path()).unwrap();
        written.sort();

        assert_eq!(written, vec!["package.json", "src/main.jsx"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("src/main.jsx")).unwrap(),
            "render()"
        );
        assert!(!temp.path().join("README.md").exists());
    }

    #[test]
    fn test_extract_missing_template_fails() {
        let zip = testing::archive(&[("starters-main/project-templates/react/package.json", "{}")]);
        let temp = tempfile::TempDir::new().unwrap();

        assert!(extract_template(&zip, "project-templates/nextjs", temp.path()).is_err());
    }

    #[test]
    fn test_extract_skips_git_metadata() {
        let zip = testing::archive(&[
            ("starters-main/project-templates/react/package.json", "{}"),
            ("starters-main/project-templates/react/.git/HEAD", "ref"),
        ]);
        let temp = tempfile::TempDir::new().unwrap();

        let written = extract_template(&zip, "project-templates/react", temp.path()).unwrap();
        assert_eq!(written, vec!["package.json"]);
        assert!(!temp.path().join(".git").exists());
    }

    #[test]
    fn test_extract_rejects_garbage_bytes() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(extract_template(b"not a zip", "project-templates/react", temp.path()).is_err());
    }

    #[test]
    fn test_copy_dir_recurses_and_skips_git() {
        let source = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("src/components")).unwrap();
        fs::create_dir_all(source.path().join(".git")).unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::write(source.path().join("src/components/App.jsx"), "app").unwrap();
        fs::write(source.path().join(".git/config"), "[core]").unwrap();

        let target = tempfile::TempDir::new().unwrap();
        let dest = target.path().join("nested/demo");
        let mut copied = copy_dir(source.path(), &dest).unwrap();
        copied.sort();

        assert_eq!(copied, vec!["package.json", "src/components/App.jsx"]);
        assert_eq!(
            fs::read_to_string(dest.join("src/components/App.jsx")).unwrap(),
            "app"
        );
        assert!(!dest.join(".git").exists());
    }
}
