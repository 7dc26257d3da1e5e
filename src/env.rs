use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment used by the shell.
///
/// The environment carries:
/// - `vars`: the variables visible to launched commands (`PATH`, `HOME`, ...).
/// - `current_dir`: the working directory commands are launched in.
/// - `should_exit`: a flag the read loop checks to know when to terminate;
///   set by the `exit` builtin after the job table has been drained.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables.
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When true, the interactive loop should stop after the current line.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment`.
    ///
    /// Copies `std::env::vars()` and initializes `current_dir` from
    /// `std::env::current_dir()`. `should_exit` starts out false.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for (k, v) in stdenv::vars() {
            vars.insert(k, v);
        }
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The colon-separated executable search path, if set.
    pub fn search_paths(&self) -> Option<OsString> {
        self.get_var("PATH").map(OsString::from)
    }

    /// The user's home directory, if set and non-empty.
    pub fn home(&self) -> Option<String> {
        self.get_var("HOME").filter(|h| !h.is_empty())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
