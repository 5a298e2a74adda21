//! External command execution with a timeout.
//!
//! Every git/gh invocation goes through [`CommandRunner`]. The runner never returns an error and
//! never retries: a nonzero exit, a timeout, or a spawn failure all come back as a failed
//! [`CmdOutput`], and retry policy lives entirely in the callers.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::utils::config::Timeouts;

/// Poll interval while waiting on a child.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// stderr text reported for a command that ran past its deadline.
pub const TIMED_OUT: &str = "timed out";

/// Environment that turns every interactive credential prompt into a fast failure.
const NON_INTERACTIVE_ENV: [(&str, &str); 3] = [
    ("GIT_TERMINAL_PROMPT", "0"),
    ("GCM_INTERACTIVE", "never"),
    ("GH_PROMPT_DISABLED", "1"),
];

/// A command line to run: program, arguments, optional working directory and a timeout.
#[derive(Clone, Debug)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: Timeouts::GENERAL,
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git").args(args)
    }

    pub fn gh<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("gh").args(args)
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when the argument list starts with `prefix` (program excluded).
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of one command: exit status collapsed to a flag, plus both output streams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Set only when the runner killed the command at its deadline.
    pub timed_out: bool,
}

impl CmdOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    pub fn timeout() -> Self {
        Self {
            success: false,
            stderr: TIMED_OUT.to_string(),
            timed_out: true,
            ..Default::default()
        }
    }

    /// Non-empty trimmed stdout lines.
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Executes commands for the publish workflow. Implementations must be shareable across workers.
pub trait CommandRunner: Send + Sync {
    fn run(&self, cmd: &Cmd) -> CmdOutput;
}

/// Runs commands as real OS processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &Cmd) -> CmdOutput {
        debug!("$ {}", cmd);
        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .envs(NON_INTERACTIVE_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(c) => c,
            Err(e) => return CmdOutput::failed(format!("{}: {}", cmd.program, e)),
        };

        // Drain both pipes on their own threads so a chatty child can't fill a pipe and stall.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + cmd.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
                Ok(None) => thread::sleep(WAIT_POLL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return CmdOutput::failed(e.to_string());
                }
            }
        };

        match status {
            // Readers are detached: a grandchild (e.g. a credential helper) may still hold the pipes.
            None => {
                debug!("timed out after {:?}: {}", cmd.timeout, cmd);
                CmdOutput::timeout()
            }
            Some(status) => CmdOutput {
                success: status.success(),
                stdout: join_reader(stdout_reader),
                stderr: join_reader(stderr_reader),
                timed_out: false,
            },
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
