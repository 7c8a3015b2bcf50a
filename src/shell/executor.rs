//! Shell Executor
//!
//! Runs a gated command through `sh -c` with stdout and stderr captured
//! separately and a hard wall-clock timeout. On timeout the wait is
//! abandoned and the child is killed via `kill_on_drop`; grandchildren
//! spawned by the shell are not chased.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::gates::shell::vet_command;
use crate::types::{ActionError, CommandOutput};

/// Execute a shell command with a hard timeout.
///
/// The Shell Gate runs first; a blocked command never spawns a process.
pub async fn execute(command: &str, timeout: Duration) -> Result<CommandOutput, ActionError> {
    vet_command(command).into_result()?;

    debug!("Executing shell command: {}", command);

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| {
            warn!("Command timed out after {}s: {}", timeout.as_secs(), command);
            ActionError::ShellTimeout(timeout.as_secs())
        })?
        .map_err(|e| ActionError::ShellSpawnFailure(e.to_string()))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Compose the outcome text from whichever streams are non-empty.
pub fn compose_outcome(output: &CommandOutput) -> String {
    match (output.stdout.is_empty(), output.stderr.is_empty()) {
        (false, false) => format!(
            "Command Output:\n{}\nCommand Error:\n{}",
            output.stdout, output.stderr
        ),
        (false, true) => format!("Command Output:\n{}", output.stdout),
        (true, false) => format!("Command Error:\n{}", output.stderr),
        (true, true) => "Command executed with no output.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = execute("echo hello", Duration::from_secs(5)).await.unwrap();
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn test_captures_stderr_separately() {
        let output = execute("echo oops >&2", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.stdout, "");
        assert_eq!(output.stderr, "oops");
    }

    #[tokio::test]
    async fn test_silent_command_yields_empty_streams() {
        let output = execute("true", Duration::from_secs(5)).await.unwrap();
        assert_eq!(output, CommandOutput::default());
    }

    #[tokio::test]
    async fn test_blocked_command_never_spawns() {
        let err = execute("rm -rf /tmp/x", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Blocked unsafe command: rm -rf /tmp/x");
    }

    #[tokio::test]
    async fn test_timeout_kills_the_wait() {
        let err = execute("sleep 30", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, ActionError::ShellTimeout(1)));
    }

    #[tokio::test]
    async fn test_failing_command_reports_via_stderr() {
        // The shell itself spawns fine; the missing binary shows up on
        // stderr, not as a spawn failure.
        let output = execute("definitely_not_a_real_binary_xyz", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!output.stderr.is_empty());
    }

    #[test]
    fn test_compose_both_streams() {
        let output = CommandOutput {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(
            compose_outcome(&output),
            "Command Output:\nout\nCommand Error:\nerr"
        );
    }

    #[test]
    fn test_compose_single_streams() {
        let stdout_only = CommandOutput {
            stdout: "out".to_string(),
            stderr: String::new(),
        };
        assert_eq!(compose_outcome(&stdout_only), "Command Output:\nout");

        let stderr_only = CommandOutput {
            stdout: String::new(),
            stderr: "err".to_string(),
        };
        assert_eq!(compose_outcome(&stderr_only), "Command Error:\nerr");
    }

    #[test]
    fn test_compose_silence() {
        assert_eq!(
            compose_outcome(&CommandOutput::default()),
            "Command executed with no output."
        );
    }
}
