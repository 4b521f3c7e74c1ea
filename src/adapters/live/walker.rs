//! Live directory walker built on the `ignore` crate.

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::ports::walker::FileWalker;

/// Live walker that visits every file under a directory and keeps the ones
/// matching the configured glob.
///
/// Standard ignore filters (gitignore, hidden files) are disabled: every
/// file is a candidate, only the glob decides. Results are sorted so the
/// manifest order is reproducible regardless of directory enumeration
/// order.
pub struct LiveFileWalker;

impl FileWalker for LiveFileWalker {
    fn walk(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut builder = OverrideBuilder::new(dir);
        builder.add(pattern).map_err(|e| format!("invalid file pattern `{pattern}`: {e}"))?;
        let overrides =
            builder.build().map_err(|e| format!("invalid file pattern `{pattern}`: {e}"))?;

        let mut files = Vec::new();
        for entry in WalkBuilder::new(dir).standard_filters(false).build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            if overrides.matched(entry.path(), false).is_whitelist() {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_filters_by_glob_and_sorts() {
        let dir = std::env::temp_dir().join("amdcfg_live_walker");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("js")).unwrap();
        std::fs::write(dir.join("js/b.js"), "b").unwrap();
        std::fs::write(dir.join("js/a.js"), "a").unwrap();
        std::fs::write(dir.join("js/readme.md"), "m").unwrap();
        std::fs::write(dir.join("top.js"), "t").unwrap();

        let walker = LiveFileWalker;
        let files = walker.walk(&dir, "**/*.js").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["js/a.js", "js/b.js", "top.js"]);

        let files = walker.walk(&dir, "**/a*.js").unwrap();
        assert_eq!(files.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
