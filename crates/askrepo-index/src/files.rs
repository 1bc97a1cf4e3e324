//! Supported-file enumeration and kind detection.

use std::path::{Path, PathBuf};

/// Extensions eligible for indexing.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "py", "txt", "md", "markdown", "json", "yaml", "yml", "js", "jsx", "ts", "tsx", "html", "css",
    "java", "c", "cpp", "dart", "php", "rs", "go", "toml",
];

/// File kind deciding which chunking strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Python,
    Markdown,
    Generic,
}

/// Classify a path by extension. `None` means the file is not indexed.
#[must_use]
pub fn detect_kind(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "py" => FileKind::Python,
        "md" | "markdown" | "txt" => FileKind::Markdown,
        _ => FileKind::Generic,
    })
}

/// Walk `root` collecting supported files, honoring `.gitignore` and
/// skipping hidden entries.
#[must_use]
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|p| detect_kind(p).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_kind_python() {
        assert_eq!(detect_kind(Path::new("src/app.py")), Some(FileKind::Python));
    }

    #[test]
    fn detect_kind_markdown_variants() {
        for name in ["README.md", "notes.markdown", "todo.txt"] {
            assert_eq!(
                detect_kind(Path::new(name)),
                Some(FileKind::Markdown),
                "failed for {name}"
            );
        }
    }

    #[test]
    fn detect_kind_generic() {
        for name in ["index.js", "main.rs", "style.css", "page.html", "app.java"] {
            assert_eq!(
                detect_kind(Path::new(name)),
                Some(FileKind::Generic),
                "failed for {name}"
            );
        }
    }

    #[test]
    fn detect_kind_unsupported() {
        assert_eq!(detect_kind(Path::new("binary.exe")), None);
        assert_eq!(detect_kind(Path::new("Makefile")), None);
    }

    #[test]
    fn detect_kind_case_insensitive() {
        assert_eq!(detect_kind(Path::new("README.MD")), Some(FileKind::Markdown));
    }

    #[test]
    fn collect_files_filters_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "x = 1").unwrap();
        std::fs::write(dir.path().join("image.png"), [0_u8, 1]).unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn collect_files_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join(".cache").join("hidden.py"), "x = 1").unwrap();
        std::fs::write(dir.path().join("visible.py"), "x = 1").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("visible.py"));
    }
}
