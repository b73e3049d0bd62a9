//! Finding the source files that may hold todos.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Result;

pub struct FileSearcher;

impl FileSearcher {
    /// Whether a file name ends with one of `extensions`. Case matters.
    ///
    /// ```rust
    /// use todome_lib::finder::FileSearcher;
    ///
    /// let exts = vec![".java".to_string(), ".kts".to_string()];
    /// assert!(FileSearcher::has_extension("Main.java", &exts));
    /// assert!(FileSearcher::has_extension("build.gradle.kts", &exts));
    /// assert!(!FileSearcher::has_extension("Main.JAVA", &exts));
    /// assert!(!FileSearcher::has_extension("Main.javax", &exts));
    /// ```
    pub fn has_extension(file_name: &str, extensions: &[String]) -> bool {
        extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// Find every file below `root` with one of the given extensions.
    ///
    /// Files come back in the order the platform lists directories, with a
    /// directory's contents following it directly. Symbolic links are
    /// followed, and a link that loops back on itself is an error.
    pub fn find(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = vec![];
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_source = Self::has_extension(&entry.file_name().to_string_lossy(), extensions);
            if is_source {
                log::trace!("Found source file {:?}", entry.path());
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;

    fn exts(exts: &[&str]) -> Vec<String> {
        exts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_files_recursively_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/main/java/a")).unwrap();
        fs::create_dir_all(root.join("src/main/kotlin")).unwrap();
        fs::write(root.join("build.gradle.kts"), "").unwrap();
        fs::write(root.join("README.md"), "// TODO: docs").unwrap();
        fs::write(root.join("src/main/java/a/A.java"), "").unwrap();
        fs::write(root.join("src/main/java/a/A.JAVA"), "").unwrap();
        fs::write(root.join("src/main/kotlin/B.kt"), "").unwrap();

        let mut found = FileSearcher::find(root, &exts(&[".java", ".kt", ".kts"]))
            .unwrap()
            .into_iter()
            .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
            .collect::<Vec<_>>();
        found.sort();
        assert_eq!(
            found,
            vec![
                PathBuf::from("build.gradle.kts"),
                PathBuf::from("src/main/java/a/A.java"),
                PathBuf::from("src/main/kotlin/B.kt"),
            ]
        );
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSearcher::find(dir.path(), &exts(&[".java"]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn no_extensions_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.java"), "").unwrap();
        assert!(FileSearcher::find(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileSearcher::find(&missing, &exts(&[".java"])),
            Err(Error::Walk { .. })
        ));
    }
}
