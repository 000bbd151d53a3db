//! Blocking invocation of external compilers and pretty-printers.
//!
//! Tools are called as `program <source> -o <dest> [flags...]`. Both output
//! streams are captured in full; the editor buffer is never touched.

use crate::error::CoreError;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

/// One external tool call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub flags: Vec<String>,
}

impl ToolInvocation {
    pub fn new(
        program: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            source: source.into(),
            dest: dest.into(),
            flags: Vec::new(),
        }
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.source)
            .arg("-o")
            .arg(&self.dest)
            .args(&self.flags);
        command
    }
}

/// Captured result of a finished tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; `-1` when terminated by a signal.
    pub exit_code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Text for the output area: stderr on failure (or the exit code when
    /// stderr is empty), stdout otherwise.
    pub fn message(&self) -> String {
        if self.success() {
            return self.stdout.trim_end().to_string();
        }
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            format!("tool exited with code {}", self.exit_code)
        } else {
            stderr.to_string()
        }
    }
}

/// Run the tool to completion.
///
/// # Errors
/// [`CoreError::ToolLaunch`] when the program cannot be started (missing
/// binary, permissions). A non-zero exit is not an error; inspect
/// [`ToolOutput::exit_code`].
pub fn run_tool(invocation: &ToolInvocation) -> Result<ToolOutput, CoreError> {
    debug!(
        program = %invocation.program.display(),
        source = %invocation.source.display(),
        dest = %invocation.dest.display(),
        "running external tool"
    );
    let output = invocation
        .command()
        .output()
        .map_err(|source| CoreError::ToolLaunch {
            program: invocation.program.display().to_string(),
            source,
        })?;
    let result = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    };
    if !result.success() {
        warn!(
            program = %invocation.program.display(),
            exit_code = result.exit_code,
            "external tool failed"
        );
    }
    Ok(result)
}
