use crate::env::Environment;
use crate::jobs::{JobTable, Register};
use crate::redirect::Redirection;
use crate::resolve;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use thiserror::Error;

/// Maximum number of `|` separators accepted per line (3 commands).
pub const MAX_PIPES: usize = 2;

#[derive(Debug, Error)]
pub enum ExecError {
    /// More than [`MAX_PIPES`] separators; nothing is launched.
    #[error("too many pipes: {count} (max {MAX_PIPES})")]
    TooManyPipes { count: usize },
    /// A leading, trailing or doubled `|` produced a command with no tokens.
    #[error("empty command in pipeline")]
    EmptySegment,
    /// A segment's program name did not resolve to an executable.
    #[error("{name}: command not found")]
    CommandNotFound { name: String },
    /// The `<` target is missing, unreadable or not a regular file.
    #[error("{}: input file error", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The `>` target could not be created or truncated.
    #[error("{}: output file error", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The OS refused to create the process.
    #[error("failed to launch {name}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// What `run` did with the launched processes.
#[derive(Debug)]
pub enum Launch {
    /// Foreground: every segment was waited for, statuses in launch order.
    Completed(Vec<ExitStatus>),
    /// Background: the last segment's process was handed to the job table.
    /// `number` is `None` when the table was full and the job was dropped.
    Background { number: Option<u32>, pid: u32 },
}

/// Launch a command line: 1-3 segments split on `|`, wired together with
/// pipes, with `redir` applied to the first segment's stdin and the last
/// segment's stdout.
///
/// Each segment's program is resolved independently before anything is
/// spawned, so a resolution failure launches no process at all. Child
/// stdout handles are moved directly into the next child's stdin; once a
/// spawn completes the controller holds no end of that pipe, so downstream
/// readers observe EOF as soon as the writer exits.
///
/// Foreground lines block until every segment has been waited for, in
/// launch order. Background lines register the last segment in `jobs`
/// (earlier segments ride along for later reaping) and print
/// `[<job>] <pid>` to `out` without blocking.
pub fn run(
    env: &Environment,
    jobs: &mut JobTable,
    tokens: &[String],
    redir: &Redirection,
    background: bool,
    out: &mut dyn Write,
) -> Result<Launch, ExecError> {
    let segments = split_segments(tokens)?;
    let last = segments.len() - 1;

    let search = env.search_paths();
    let mut programs = Vec::with_capacity(segments.len());
    for seg in &segments {
        let name = &seg[0];
        let program = resolve::resolve(search.as_deref(), name)
            .ok_or_else(|| ExecError::CommandNotFound { name: name.clone() })?;
        programs.push(program);
    }

    // redirection targets are opened before any process exists, so an
    // open failure abandons the line with nothing launched
    let mut stdin_redir = match &redir.input {
        Some(path) => Some(open_input(path)?),
        None => None,
    };
    let mut stdout_redir = match &redir.output {
        Some(path) => Some(open_output(path)?),
        None => None,
    };

    let mut children: Vec<Child> = Vec::with_capacity(segments.len());
    let mut carry: Option<ChildStdout> = None;
    for (i, seg) in segments.iter().enumerate() {
        let mut cmd = Command::new(&programs[i]);
        cmd.args(&seg[1..])
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir);

        if let Some(upstream) = carry.take() {
            cmd.stdin(Stdio::from(upstream));
        } else if i == 0
            && let Some(file) = stdin_redir.take()
        {
            cmd.stdin(file);
        }

        if i < last {
            cmd.stdout(Stdio::piped());
        } else if let Some(file) = stdout_redir.take() {
            cmd.stdout(file);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                drop(cmd);
                reap_abandoned(children);
                return Err(ExecError::Spawn {
                    name: seg[0].clone(),
                    source,
                });
            }
        };
        if i < last {
            carry = child.stdout.take();
        }
        children.push(child);
    }

    if background {
        let tracked = children.pop().expect("a pipeline has at least one segment");
        let pid = tracked.id();
        let number = match jobs.register(tracked, children, display_command(tokens, true)) {
            Register::Registered(number) => {
                let _ = writeln!(out, "[{number}] {pid}");
                Some(number)
            }
            Register::Dropped => None,
        };
        Ok(Launch::Background { number, pid })
    } else {
        let mut statuses = Vec::with_capacity(children.len());
        for child in &mut children {
            if let Ok(status) = child.wait() {
                statuses.push(status);
            }
        }
        Ok(Launch::Completed(statuses))
    }
}

/// Reconstruct the user-visible command text from residual tokens.
pub(crate) fn display_command(tokens: &[String], background: bool) -> String {
    let mut text = tokens.join(" ");
    if background {
        text.push_str(" &");
    }
    text
}

/// Release the segments launched before a mid-pipeline spawn failure.
///
/// The pipeline can no longer complete once a later segment fails to
/// launch, so the stages already running are terminated and waited for
/// rather than left as zombies for the shell's lifetime.
fn reap_abandoned(mut children: Vec<Child>) {
    for child in children.iter_mut() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn split_segments(tokens: &[String]) -> Result<Vec<&[String]>, ExecError> {
    let count = tokens.iter().filter(|t| *t == "|").count();
    if count > MAX_PIPES {
        return Err(ExecError::TooManyPipes { count });
    }
    let mut segments = Vec::with_capacity(count + 1);
    for seg in tokens.split(|t| t == "|") {
        if seg.is_empty() {
            return Err(ExecError::EmptySegment);
        }
        segments.push(seg);
    }
    Ok(segments)
}

fn open_input(path: &Path) -> Result<Stdio, ExecError> {
    let input_err = |source| ExecError::InputFile {
        path: path.to_path_buf(),
        source,
    };
    let meta = path.metadata().map_err(input_err)?;
    if !meta.is_file() {
        return Err(input_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let file = File::open(path).map_err(input_err)?;
    Ok(Stdio::from(file))
}

fn open_output(path: &Path) -> Result<Stdio, ExecError> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let file = opts.open(path).map_err(|source| ExecError::OutputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Stdio::from(file))
}
