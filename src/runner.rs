//! Subprocess seam for the external tools used while indexing
//! (`java`, `javadoc`, `ctags`, `curl`).

use anyhow::{Context, Result, bail};
use std::process::Command;

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Fails with the tool's stderr when it exited unsuccessfully.
    pub fn into_stdout(self, program: &str) -> Result<String> {
        if !self.success {
            bail!("{program} failed: {}", self.stderr.trim());
        }
        Ok(self.stdout)
    }
}

pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Runs programs on the host with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        tracing::debug!(program, ?args, "running");
        let output = command(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {program} (is it installed and on PATH?)"))?;

        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn command(program: &str) -> Command {
    #[cfg(windows)]
    {
        let lower = program.to_ascii_lowercase();
        if lower.ends_with(".cmd") || lower.ends_with(".bat") {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(program);
            return cmd;
        }
    }

    Command::new(program)
}
