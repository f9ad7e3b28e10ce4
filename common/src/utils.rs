use std::path::{Path, PathBuf};

/// Searches all ancestor directories of the current working directory
/// (including itself) for a file or directory with the given name.
/// If found, returns the path to the file or directory.
pub fn search_current_ancestor_dirs_for(name: &str) -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .and_then(|dir| search_ancestor_dirs_for(&dir, name))
}

pub fn search_ancestor_dirs_for(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|p| p.join(name))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_file_in_ancestor() {
        let root = std::env::temp_dir().join(format!("bvxcmn-utils-{}", std::process::id()));
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("marker.toml"), "").unwrap();

        let found = search_ancestor_dirs_for(&nested, "marker.toml");
        assert_eq!(found, Some(root.join("marker.toml")));
        assert_eq!(search_ancestor_dirs_for(&nested, "missing.toml"), None);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
