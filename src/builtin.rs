use crate::ExitCode;
use crate::env::Environment;
use crate::history::History;
use crate::jobs::JobTable;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Mutable shell state a builtin may act on.
///
/// Builtins execute synchronously in the controller and never fork.
pub(crate) struct ShellContext<'a> {
    pub env: &'a mut Environment,
    pub jobs: &'a mut JobTable,
    pub history: &'a mut History,
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed with [`argh`] (`FromArgs`) and run in-process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command. 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, ctx: &mut ShellContext) -> Result<ExitCode>;
}

/// Intercept `name` if it is a builtin, before any external lookup.
///
/// Returns `None` when `name` is not a builtin; the caller then falls
/// through to external resolution.
pub(crate) fn dispatch(
    name: &str,
    args: &[&str],
    stdout: &mut dyn Write,
    ctx: &mut ShellContext,
) -> Option<Result<ExitCode>> {
    if let Some(r) = try_builtin::<Exit>(name, args, stdout, ctx) {
        return Some(r);
    }
    if let Some(r) = try_builtin::<Cd>(name, args, stdout, ctx) {
        return Some(r);
    }
    if let Some(r) = try_builtin::<Jobs>(name, args, stdout, ctx) {
        return Some(r);
    }
    None
}

fn try_builtin<T: BuiltinCommand>(
    name: &str,
    args: &[&str],
    stdout: &mut dyn Write,
    ctx: &mut ShellContext,
) -> Option<Result<ExitCode>> {
    if name != T::name() {
        return None;
    }
    Some(match T::from_args(&[name], args) {
        Ok(cmd) => cmd.execute(stdout, ctx),
        Err(EarlyExit { output, status }) => {
            let _ = stdout.write_all(output.as_bytes());
            Ok(if status.is_err() { 1 } else { 0 })
        }
    })
}

#[derive(FromArgs)]
/// Wait for background jobs, show recent commands, and leave the shell.
pub(crate) struct Exit {
    #[argh(positional, greedy)]
    /// ignored; exit takes no meaningful arguments.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut ShellContext) -> Result<ExitCode> {
        writeln!(stdout, "Waiting for background processes to complete...")?;
        ctx.jobs.drain_blocking(stdout)?;

        writeln!(stdout, "Last valid commands:")?;
        ctx.history.display(stdout)?;

        ctx.env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// With no target, changes to the directory named by HOME.
pub(crate) struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut ShellContext) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match ctx.env.home() {
                Some(home) => PathBuf::from(home),
                None => return Err(anyhow::anyhow!("cd: HOME not set")),
            },
        };

        let new_dir = if target.is_absolute() {
            target.clone()
        } else {
            ctx.env.current_dir.join(&target)
        };

        let meta = fs::metadata(&new_dir)
            .map_err(|_| anyhow::anyhow!("cd: {}: No such file or directory", target.display()))?;
        if !meta.is_dir() {
            return Err(anyhow::anyhow!("cd: {}: Not a directory", target.display()));
        }

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: can't canonicalize {}", new_dir.display()))?;
        std::env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        ctx.env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List tracked background jobs in registration order.
pub(crate) struct Jobs {}

impl BuiltinCommand for Jobs {
    fn name() -> &'static str {
        "jobs"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut ShellContext) -> Result<ExitCode> {
        if ctx.jobs.is_empty() {
            writeln!(stdout, "No active background processes.")?;
            return Ok(0);
        }
        for job in ctx.jobs.iter() {
            writeln!(stdout, "[{}]+ {} {}", job.number(), job.pid(), job.command())?;
        }
        Ok(0)
    }
}
