//! The git subprocess seam.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::errors::GitError;

/// Default deadline for a single git call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between `try_wait` polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs one git command and returns its standard output.
#[cfg_attr(test, mockall::automock)]
pub trait GitRunner {
    /// Run `git <args>` in `cwd`.
    fn run<'a>(&self, args: &[&'a str], cwd: &Path) -> Result<String, GitError>;
}

/// Spawns the real `git` binary with a hard deadline.
#[derive(Clone, Debug)]
pub struct SystemGit {
    program: String,
    timeout: Duration,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SystemGit {
    /// `git` from `PATH` with the given deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    /// Use a different executable (for tests and unusual installs).
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The configured deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str], cwd: &Path) -> Result<String, GitError> {
        let command = args.join(" ");
        trace!(%command, cwd = %cwd.display(), "running git");

        let mut child = match Command::new(&self.program)
            // keep non-ASCII paths unescaped in --name-only output
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(GitError::NotFound),
            Err(e) => return Err(GitError::Io(e)),
        };

        // Drain pipes on threads so a large listing cannot block the child.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stdout {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        });
        let err_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        });

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                debug!(%command, timeout_ms = self.timeout.as_millis(), "git timed out");
                return Err(GitError::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = out_handle.join().unwrap_or_default();
        let stderr = err_handle.join().unwrap_or_default();

        if !status.success() {
            return Err(GitError::Failed {
                command,
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
