//! A small interactive command interpreter.
//!
//! The crate reads a line, resolves it into up to three processes connected
//! by pipes, applies `<`/`>` file redirection, tracks background jobs in a
//! bounded table, and handles the `cd`, `jobs` and `exit` builtins
//! in-process. Everything a command execution touches — the environment,
//! the job table, the command history — is explicit owned state threaded
//! through each call, which keeps the pieces independently testable.
//!
//! The main entry point is [`Shell`], which owns the state and drives the
//! read-resolve-execute loop. The public modules expose the building
//! blocks: token expansion ([`lexer`]), redirection splitting
//! ([`redirect`]), executable lookup ([`resolve`]), the pipeline
//! builder/executor ([`pipeline`]) and the job table ([`jobs`]).

mod builtin;
pub mod env;
pub mod history;
pub mod jobs;
pub mod lexer;
pub mod pipeline;
pub mod redirect;
pub mod resolve;
mod shell;

pub use env::Environment;
pub use shell::Shell;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure,
/// mirroring the convention used by POSIX shells.
pub type ExitCode = i32;
