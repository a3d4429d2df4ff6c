//! Subprocess seam for the statistics provider.
//!
//! The `CommandRunner` trait allows the collector to invoke the real
//! provider binary in production and canned report text in tests.

use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Abstraction over running the provider and capturing its stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and returns its captured stdout.
    ///
    /// Implementations must enforce `deadline` and report an elapsed
    /// deadline as `io::ErrorKind::TimedOut`.
    fn run(&self, program: &str, args: &[String], deadline: Duration) -> io::Result<String>;
}

/// Production implementation that spawns the provider as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], deadline: Duration) -> io::Result<String> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The provider blocks for its whole sampling window, so poll for
        // completion and kill it once the deadline elapses.
        let started = Instant::now();
        let poll = Duration::from_millis(100);
        loop {
            if child.try_wait()?.is_some() {
                break;
            }
            if started.elapsed() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!(
                        "{} did not finish within {}s",
                        program,
                        deadline.as_secs()
                    ),
                ));
            }
            std::thread::sleep(poll);
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} produced non-UTF-8 output", program),
            )
        })
    }
}
