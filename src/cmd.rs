use std::io::Write;
use std::process::{Command, Output, Stdio};

use crate::error::{ProvisionError, ProvisionResult};

/// Run a command and capture its trimmed stdout. Fails if the
/// command returns a non-zero exit code.
pub fn run(program: &str, args: &[&str]) -> ProvisionResult<String> {
    let output = spawn(program, args)?;
    finish(program, args, &output)
}

/// Run a command that reads `stdin_data` on its standard input.
///
/// Used for secrets that must not show up in the process list,
/// such as the PFX export password.
pub fn run_with_stdin(program: &str, args: &[&str], stdin_data: &[u8]) -> ProvisionResult<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| not_found_or_io(program, e))?;

    if let Some(stdin) = &mut child.stdin {
        stdin.write_all(stdin_data)?;
    }
    drop(child.stdin.take());

    let output = child.wait_with_output()?;
    finish(program, args, &output)
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Render a program and its arguments as a single line.
#[must_use]
pub fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}

fn spawn(program: &str, args: &[&str]) -> ProvisionResult<Output> {
    tracing::debug!(command = %format_command(program, args), "running");
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| not_found_or_io(program, e))
}

fn finish(program: &str, args: &[&str], output: &Output) -> ProvisionResult<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    tracing::debug!(program, stderr = %stderr.trim(), "command failed");
    Err(ProvisionError::CommandFailed {
        command: format_command(program, args),
        status: output.status,
    })
}

fn not_found_or_io(program: &str, e: std::io::Error) -> ProvisionError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ProvisionError::CommandNotFound(program.to_string())
    } else {
        ProvisionError::Io(e)
    }
}
