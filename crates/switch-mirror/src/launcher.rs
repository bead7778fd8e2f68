//! Starting and supervising the mirror process

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use crate::{Error, MirrorTool, Result, RetryPolicy};

/// Final state of a mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOutcome {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Captured standard output of the tool
    pub output: String,
}

impl MirrorOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            output: output.into(),
        }
    }
}

/// A running mirror operation.
pub trait MirrorHandle {
    /// Non-blocking check whether the operation has finished.
    fn has_exited(&mut self) -> Result<bool>;

    /// Block until the operation finishes.
    fn wait(self: Box<Self>) -> Result<MirrorOutcome>;
}

/// Starts mirror operations.
pub trait MirrorLauncher {
    fn launch(&self, source: &Path, destination: &Path) -> Result<Box<dyn MirrorHandle>>;
}

/// Launches a [`MirrorTool`] as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher {
    tool: MirrorTool,
    retry: RetryPolicy,
}

impl CommandLauncher {
    pub fn new(tool: MirrorTool, retry: RetryPolicy) -> Self {
        Self { tool, retry }
    }

    pub fn tool(&self) -> MirrorTool {
        self.tool
    }
}

impl MirrorLauncher for CommandLauncher {
    fn launch(&self, source: &Path, destination: &Path) -> Result<Box<dyn MirrorHandle>> {
        let program = self.tool.program();
        let args = self.tool.args(source, destination, self.retry);
        tracing::info!(
            "Executing cmd {} {}",
            program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        // rsync only creates the last path component of the destination.
        fs::create_dir_all(destination)?;

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Drained off-thread so a chatty tool never blocks on a full pipe.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        Ok(Box::new(ChildHandle {
            tool: self.tool,
            child,
            stdout,
            stderr,
        }))
    }
}

fn drain(mut stream: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader.and_then(|r| r.join().ok()).unwrap_or_default()
}

struct ChildHandle {
    tool: MirrorTool,
    child: Child,
    stdout: Option<JoinHandle<String>>,
    stderr: Option<JoinHandle<String>>,
}

impl MirrorHandle for ChildHandle {
    fn has_exited(&mut self) -> Result<bool> {
        Ok(self.child.try_wait()?.is_some())
    }

    fn wait(mut self: Box<Self>) -> Result<MirrorOutcome> {
        let status = self.child.wait()?;
        let mut output = collect(self.stdout.take());
        let errors = collect(self.stderr.take());
        if !errors.trim().is_empty() {
            output.push_str(&errors);
        }

        let exit_code = status.code();
        let success = exit_code.is_some_and(|code| self.tool.is_success(code));
        Ok(MirrorOutcome {
            exit_code,
            success,
            output,
        })
    }
}
