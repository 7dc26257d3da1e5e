use std::collections::VecDeque;
use std::io::Write;

/// Number of commands retained.
pub const HISTORY_CAPACITY: usize = 3;

/// Bounded record of the most recent valid commands.
///
/// Recording at capacity evicts the oldest entry; entries are owned,
/// growable strings and are never truncated.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a command, evicting the oldest entry when at capacity.
    pub fn record(&mut self, command: impl Into<String>) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(command.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in recording order, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Write the history listing shown by the `exit` builtin.
    pub fn display(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if self.entries.is_empty() {
            writeln!(out, "No commands in history.")?;
            return Ok(());
        }
        for entry in &self.entries {
            writeln!(out, "\t{entry}")?;
        }
        Ok(())
    }
}
