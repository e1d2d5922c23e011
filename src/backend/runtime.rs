//! Usage: Validate that a runtime for the backend entry point is available.

use crate::domain::command::ExternalCommand;
use crate::executor;
use std::time::Duration;

/// Runtime commands tried in order; the first one answering `--version` wins.
pub(crate) const RUNTIME_CANDIDATES: &[&str] = &["python3", "python"];

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub(crate) struct ResolvedRuntime {
    pub command: String,
    pub version: String,
}

pub(crate) async fn resolve_runtime() -> Result<ResolvedRuntime, String> {
    for candidate in RUNTIME_CANDIDATES {
        let step = ExternalCommand::new(candidate, &["--version"]);
        match executor::run(&step, VERSION_TIMEOUT).await {
            Ok(output) => {
                // Older interpreters print the version banner to stderr.
                let banner = if output.stdout.is_empty() {
                    &output.stderr
                } else {
                    &output.stdout
                };
                let version = banner.lines().next().unwrap_or("unknown").trim().to_string();
                return Ok(ResolvedRuntime {
                    command: candidate.to_string(),
                    version,
                });
            }
            Err(err) => {
                tracing::debug!(runtime = candidate, "运行时探测失败: {}", err);
            }
        }
    }

    Err(format!(
        "RUNTIME_MISSING: none of {RUNTIME_CANDIDATES:?} answered --version"
    ))
}
