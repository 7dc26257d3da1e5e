use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve a command word to an executable path the way the shell does.
///
/// Behavior:
/// - A word containing a path separator (absolute or relative) is tested
///   directly for execute permission; no search-path lookup happens.
/// - A bare word is looked up as `dir/word` in each directory of
///   `search_paths` (colon-separated), left to right; the first existing
///   executable wins.
/// - A missing search path, or exhaustion without a hit, yields `None`.
///
/// The lookup is side-effect-free and repeatable: a pipeline resolves each
/// segment's program name with an independent call.
pub fn resolve(search_paths: Option<&OsStr>, word: &str) -> Option<PathBuf> {
    if word.is_empty() {
        return None;
    }

    let path = Path::new(word);
    if word.contains('/') {
        return is_executable(path).then(|| path.to_path_buf());
    }

    for dir in std::env::split_paths(search_paths?) {
        let candidate = dir.join(word);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// True when `path` names an existing regular file with an execute bit set.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
