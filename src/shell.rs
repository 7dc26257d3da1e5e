use crate::builtin::{self, ShellContext};
use crate::env::Environment;
use crate::history::History;
use crate::jobs::JobTable;
use crate::lexer;
use crate::pipeline::{self, ExecError};
use crate::redirect;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// The interactive shell: a single controller thread driving a
/// read-resolve-execute loop.
///
/// All state (environment, job table, history) is owned here and threaded
/// explicitly into each component call; concurrency comes entirely from
/// OS-level process creation. The job table is polled non-blocking once
/// per loop iteration and drained fully on `exit`.
pub struct Shell {
    env: Environment,
    jobs: JobTable,
    history: History,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            jobs: JobTable::new(),
            history: History::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Read-Eval-Print Loop over rustyline.
    ///
    /// Ctrl-C abandons the current line; Ctrl-D triggers the same
    /// shutdown protocol as `exit` (blocking drain of background jobs).
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        loop {
            self.jobs.reap_nonblocking(&mut stdout)?;

            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.execute_line(&line, &mut stdout)?;
                    stdout.flush()?;
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    // end-of-input shuts down exactly like a typed `exit`
                    self.execute_line("exit", &mut stdout)?;
                    stdout.flush()?;
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Tokenize, expand and execute one input line.
    ///
    /// Recoverable conditions (bad redirection, unknown command, too many
    /// pipes, builtin failures) are reported and consume the line; only
    /// hard I/O failures on `out` propagate as `Err`.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        let mut tokens = lexer::split_into_tokens(line);
        lexer::expand_tokens(&self.env, &mut tokens);
        self.execute_tokens(tokens, out)
    }

    fn execute_tokens(&mut self, mut tokens: Vec<String>, out: &mut dyn Write) -> Result<()> {
        if tokens.is_empty() {
            return Ok(());
        }

        // trailing `&` marks backgrounding and is stripped before the
        // redirection scan
        let background = tokens.last().is_some_and(|t| t == "&");
        if background {
            tokens.pop();
        }

        let (residual, redir) = match redirect::split(&tokens) {
            Ok(split) => split,
            Err(err) => {
                eprintln!("{err}");
                return Ok(());
            }
        };
        if residual.is_empty() {
            return Ok(());
        }

        let display = pipeline::display_command(&residual, background);

        if !residual.iter().any(|t| t == "|") {
            let name = residual[0].as_str();
            let args: Vec<&str> = residual[1..].iter().map(String::as_str).collect();
            let mut ctx = ShellContext {
                env: &mut self.env,
                jobs: &mut self.jobs,
                history: &mut self.history,
            };
            if let Some(result) = builtin::dispatch(name, &args, out, &mut ctx) {
                if let Err(err) = result {
                    eprintln!("{err}");
                }
                if !self.env.should_exit {
                    self.history.record(display);
                }
                return Ok(());
            }
        }

        match pipeline::run(&self.env, &mut self.jobs, &residual, &redir, background, out) {
            Ok(_launch) => self.history.record(display),
            Err(ExecError::CommandNotFound { name }) => {
                writeln!(out, "{name}: command not found")?;
            }
            Err(err) => eprintln!("{err}"),
        }
        Ok(())
    }

    /// `user@host:pwd> `, mirroring the classic interactive prompt.
    fn prompt(&self) -> String {
        let user = self.env.get_var("USER").unwrap_or_else(|| "user".into());
        let host = self
            .env
            .get_var("HOSTNAME")
            .or_else(|| {
                std::fs::read_to_string("/etc/hostname")
                    .ok()
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| "localhost".into());
        format!("{user}@{host}:{}> ", self.env.current_dir.display())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
