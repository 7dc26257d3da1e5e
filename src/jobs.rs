use std::io::Write;
use std::process::Child;

/// Maximum number of background jobs tracked at once.
pub const JOB_CAPACITY: usize = 10;

/// One tracked background process.
///
/// For a background pipeline only the last segment's process carries the
/// job number; handles for the earlier segments ride along in `upstream`
/// so they can be reaped together with the job instead of lingering as
/// zombies.
#[derive(Debug)]
pub struct Job {
    number: u32,
    pid: u32,
    command: String,
    child: Child,
    upstream: Vec<Child>,
}

impl Job {
    /// User-visible job number, monotonically assigned and never reused.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Process id of the tracked (last) segment.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Display text for `jobs` listings and completion reports.
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Outcome of [`JobTable::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// The job was accepted and assigned this number.
    Registered(u32),
    /// The table was full; the job is silently untracked. This is a
    /// documented capacity ceiling, not an error.
    Dropped,
}

/// Bounded, insertion-ordered registry of background jobs.
///
/// Mutated only by the controller thread; jobs move through exactly one
/// life cycle: running, observed complete by a wait, reported, removed.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    next_number: u32,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            next_number: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Jobs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Track a new background job.
    ///
    /// The job number counter advances only on acceptance, so dropped jobs
    /// leave no gap in the numbering.
    pub fn register(&mut self, child: Child, upstream: Vec<Child>, command: String) -> Register {
        if self.jobs.len() >= JOB_CAPACITY {
            return Register::Dropped;
        }
        let number = self.next_number;
        self.next_number += 1;
        let pid = child.id();
        self.jobs.push(Job {
            number,
            pid,
            command,
            child,
            upstream,
        });
        Register::Registered(number)
    }

    /// Non-blocking scan for completed jobs.
    ///
    /// Every tracked job gets one `try_wait`; each completion is reported
    /// as `[<n>] + complete <command>` and the job is removed, preserving
    /// the relative order of the survivors. Safe to call every read-loop
    /// iteration, including on an empty table.
    pub fn reap_nonblocking(&mut self, out: &mut dyn Write) -> std::io::Result<()> {
        let mut i = 0;
        while i < self.jobs.len() {
            match self.jobs[i].child.try_wait() {
                Ok(Some(_status)) => {
                    let mut job = self.jobs.remove(i);
                    reap_upstream(&mut job.upstream);
                    writeln!(out, "[{}] + complete {}", job.number, job.command)?;
                }
                Ok(None) | Err(_) => i += 1,
            }
        }
        Ok(())
    }

    /// Blocking drain used at shutdown.
    ///
    /// Waits on the earliest-registered job until the table is empty,
    /// reporting each completion in registration order.
    pub fn drain_blocking(&mut self, out: &mut dyn Write) -> std::io::Result<()> {
        while !self.jobs.is_empty() {
            let mut job = self.jobs.remove(0);
            let _ = job.child.wait();
            reap_upstream(&mut job.upstream);
            writeln!(out, "[{}] + complete {}", job.number, job.command)?;
        }
        Ok(())
    }
}

/// Best-effort reap of a pipeline's earlier segments.
///
/// These processes were never tracked by job number; once the tracked last
/// segment has exited they have normally seen EOF and exited too. A stage
/// that is still running is left to the OS, matching the tracked-last-only
/// accounting of the job table.
fn reap_upstream(upstream: &mut Vec<Child>) {
    for child in upstream.iter_mut() {
        let _ = child.try_wait();
    }
    upstream.clear();
}
