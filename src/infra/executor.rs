//! Usage: Async external-command execution with timeouts and captured output (infra adapter).

use crate::domain::command::ExternalCommand;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

pub(crate) const DEFAULT_CONTROL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

fn base_command(program: &str) -> Command {
    let cmd = Command::new(program);

    #[cfg(windows)]
    let cmd = {
        let mut cmd = cmd;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    };

    cmd
}

/// Runs a single command step to completion, killing it once `timeout` elapses.
///
/// Non-zero exit codes fail the call unless the step lists them as tolerated;
/// stderr output on an otherwise successful run is logged as a warning only.
pub(crate) async fn run(
    step: &ExternalCommand,
    timeout: Duration,
) -> Result<CommandOutput, String> {
    let label = step.display();
    let mut cmd = base_command(&step.program);
    cmd.args(&step.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| format!("SPAWN_ERROR: failed to execute {label}: {e}"))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => {
            result.map_err(|e| format!("SPAWN_ERROR: failed to collect output {label}: {e}"))?
        }
        // Dropping the in-flight future drops the child handle, which kills it (kill_on_drop).
        Err(_) => {
            return Err(format!(
                "TIMEOUT: {label} timed out after {}ms",
                timeout.as_millis()
            ))
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let exit_code = output.status.code();

    let tolerated = exit_code
        .map(|code| step.tolerated_exit_codes.contains(&code))
        .unwrap_or(false);

    if !output.status.success() && !tolerated {
        let detail = if stderr.is_empty() { &stdout } else { &stderr };
        let code = exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(format!("EXIT_STATUS: {label} exited with code {code}: {detail}"));
    }

    if !stderr.is_empty() {
        tracing::warn!(command = %label, "命令产生 stderr 输出: {}", stderr);
    }

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

/// Runs a resolved command sequence in order and returns the concatenated stdout.
pub(crate) async fn run_steps(
    steps: &[ExternalCommand],
    timeout: Duration,
) -> Result<String, String> {
    let mut combined = String::new();
    for step in steps {
        let output = run(step, timeout).await?;
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&output.stdout);
    }
    Ok(combined)
}

/// Spawns a long-lived child with piped stdio; the handle stays owned by the caller.
pub(crate) fn spawn_long_lived(
    program: &str,
    args: &[String],
    cwd: &Path,
    envs: &[(String, String)],
) -> Result<Child, String> {
    let mut cmd = base_command(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    for (key, value) in envs {
        cmd.env(key, value);
    }

    cmd.spawn()
        .map_err(|e| format!("SPAWN_ERROR: failed to spawn {program}: {e}"))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ExternalCommand {
        ExternalCommand::new("sh", &["-c", script])
    }

    #[tokio::test]
    async fn run_captures_stdout() {
        let output = run(&sh("echo hello"), DEFAULT_CONTROL_TIMEOUT)
            .await
            .expect("run");
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn run_fails_on_non_zero_exit() {
        let err = run(&sh("echo boom >&2; exit 3"), DEFAULT_CONTROL_TIMEOUT)
            .await
            .expect_err("must fail");
        assert!(err.starts_with("EXIT_STATUS:"), "{err}");
        assert!(err.contains("code 3"), "{err}");
        assert!(err.contains("boom"), "{err}");
    }

    #[tokio::test]
    async fn run_accepts_tolerated_exit_codes() {
        let mut step = sh("exit 10");
        step.tolerated_exit_codes = vec![10];
        let output = run(&step, DEFAULT_CONTROL_TIMEOUT).await.expect("tolerated");
        assert_eq!(output.exit_code, Some(10));
    }

    #[tokio::test]
    async fn run_times_out_and_kills_the_child() {
        let started = std::time::Instant::now();
        let err = run(&sh("sleep 30"), Duration::from_millis(200))
            .await
            .expect_err("must time out");
        assert!(err.starts_with("TIMEOUT:"), "{err}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn run_steps_concatenates_stdout_in_order() {
        let combined = run_steps(
            &[sh("echo one"), sh("echo two")],
            DEFAULT_CONTROL_TIMEOUT,
        )
        .await
        .expect("run_steps");
        assert_eq!(combined, "one\ntwo");
    }
}
