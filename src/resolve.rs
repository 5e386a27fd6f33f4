//! Lookup of command names on the executable search path.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Ordered list of directories searched for executables.
///
/// Built from a `PATH`-style variable; entries keep their original order and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Split a colon-separated variable value into directories.
    pub fn from_var(value: impl AsRef<OsStr>) -> Self {
        Self {
            dirs: std::env::split_paths(value.as_ref()).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Resolve a command name to an executable file.
///
/// Behavior:
/// - Name containing a path separator (`/bin/ls`, `./run.sh`, `bin/tool`): not searched,
///   returned if it is an executable file. A relative one is taken relative to `base_dir`.
/// - Bare name: each directory of `search_path` is tried in order and the first
///   `dir/name` that is an executable file wins. Relative entries also start at `base_dir`.
/// - Empty name: `None`.
pub fn find_command_path(
    search_path: &SearchPath,
    name: &str,
    base_dir: &Path,
) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let path = Path::new(name);
    if path.components().count() > 1 || path.is_absolute() {
        let candidate = base_dir.join(path);
        return is_executable(&candidate).then_some(candidate);
    }

    search_path
        .dirs()
        .iter()
        .map(|dir| base_dir.join(dir).join(name))
        .find(|candidate| is_executable(candidate))
}

/// True for an existing non-directory entry with at least one execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => !meta.is_dir() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn touch(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, b"#!/bin/sh\n").expect("write fixture");
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod fixture");
    }

    #[test]
    fn test_from_var_keeps_order() {
        let sp = SearchPath::from_var("/usr/local/bin:/usr/bin:/bin");
        assert_eq!(
            sp.dirs(),
            [
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin")
            ]
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_first_directory_in_order_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        touch(&second.path().join("tool"), 0o755);
        touch(&first.path().join("tool"), 0o755);

        let sp = SearchPath::new(vec![first.path().into(), second.path().into()]);
        assert_eq!(
            find_command_path(&sp, "tool", Path::new("/")),
            Some(first.path().join("tool"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_non_executable_candidate_is_skipped() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        touch(&first.path().join("tool"), 0o644);
        touch(&second.path().join("tool"), 0o700);

        let sp = SearchPath::new(vec![first.path().into(), second.path().into()]);
        assert_eq!(
            find_command_path(&sp, "tool", Path::new("/")),
            Some(second.path().join("tool"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_any_execute_bit_is_enough() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("others_only"), 0o601);
        let sp = SearchPath::new(vec![dir.path().into()]);
        assert!(find_command_path(&sp, "others_only", Path::new("/")).is_some());
    }

    #[test]
    #[cfg(unix)]
    fn test_directory_is_not_a_command() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let sp = SearchPath::new(vec![dir.path().into()]);
        assert_eq!(find_command_path(&sp, "sub", Path::new("/")), None);
    }

    #[test]
    fn test_missing_command() {
        let dir = tempdir().unwrap();
        let sp = SearchPath::new(vec![dir.path().into()]);
        assert_eq!(find_command_path(&sp, "nonexisting", Path::new("/")), None);
        assert_eq!(
            find_command_path(&SearchPath::default(), "nonexisting", Path::new("/")),
            None
        );
    }

    #[test]
    fn test_empty_name_is_none() {
        let sp = SearchPath::from_var("/bin");
        assert_eq!(find_command_path(&sp, "", Path::new("/")), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_path_with_separator_is_not_searched() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("tool");
        touch(&tool, 0o755);

        let name = tool.to_string_lossy().to_string();
        assert_eq!(
            find_command_path(&SearchPath::default(), &name, Path::new("/")),
            Some(tool.clone())
        );

        // The bare name is only found through the search path.
        assert_eq!(
            find_command_path(&SearchPath::default(), "tool", Path::new("/")),
            None
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_relative_name_starts_at_base_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let tool = dir.path().join("sub").join("tool.sh");
        touch(&tool, 0o755);

        let sp = SearchPath::default();
        assert_eq!(
            find_command_path(&sp, "./tool.sh", &dir.path().join("sub")),
            Some(dir.path().join("sub").join("./tool.sh"))
        );
        assert!(find_command_path(&sp, "sub/tool.sh", dir.path()).is_some());
        assert_eq!(find_command_path(&sp, "./tool.sh", dir.path()), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_relative_search_path_entry_starts_at_base_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("bin")).unwrap();
        touch(&dir.path().join("bin").join("tool"), 0o755);

        let sp = SearchPath::from_var("bin");
        assert_eq!(
            find_command_path(&sp, "tool", dir.path()),
            Some(dir.path().join("bin").join("tool"))
        );
    }
}
