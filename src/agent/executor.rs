//! Invokes the headless agent binary as a subprocess, the way
//! [`crate::pipeline`] invokes external tools generally: build the command,
//! hand it the prompt non-interactively, read its JSON-framed stdout, and
//! never let one hung probe block the run past its timeout.
//!
//! [`PromptExecutor`] is the only seam into this subsystem: every metric in
//! [`crate::agent`] talks to the trait, never to [`ProcessExecutor`]
//! directly, so tests can substitute [`MockExecutor`] instead of spawning a
//! real agent binary.

use crate::errors::ArsError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Abstraction between a metric and whatever actually answers its prompt.
///
/// `working_dir` pins the subprocess cwd; `allowed_tools` is passed through
/// to the agent to restrict it to read-only tool use during evaluation.
#[async_trait]
pub trait PromptExecutor: Send + Sync {
    async fn execute_prompt(
        &self,
        working_dir: &str,
        prompt: &str,
        allowed_tools: &[String],
    ) -> Result<String, ArsError>;

    /// Confirm the executor is usable before spending time on probes.
    fn check_available(&self) -> Result<(), ArsError>;
}

/// The `result` field of the agent's single-shot JSON response.
#[derive(Debug, Deserialize)]
struct AgentReply {
    result: String,
}

/// Extra time granted after a timeout fires before the process group is
/// forcibly killed, giving a well-behaved agent a chance to flush output on
/// a soft interruption rather than losing a response it already computed.
const KILL_GRACE: Duration = Duration::from_secs(5);

pub struct ProcessExecutor {
    command: Vec<String>,
    probe_timeout: Duration,
}

impl ProcessExecutor {
    pub fn new(command: Vec<String>, probe_timeout: Duration) -> Self {
        Self { command, probe_timeout }
    }

    fn parse_reply(raw: &str) -> Result<String, ArsError> {
        serde_json::from_str::<AgentReply>(raw.trim())
            .map(|reply| reply.result)
            .map_err(|e| ArsError::AgentUnavailable {
                message: format!("agent reply was not valid JSON with a 'result' field: {e}"),
            })
    }
}

#[async_trait]
impl PromptExecutor for ProcessExecutor {
    fn check_available(&self) -> Result<(), ArsError> {
        let Some(binary) = self.command.first() else {
            return Err(ArsError::AgentUnavailable {
                message: "agent.command is empty".to_string(),
            });
        };
        which::which(binary).map(|_| ()).map_err(|e| ArsError::AgentUnavailable {
            message: format!("agent binary '{binary}' not found on PATH: {e}"),
        })
    }

    /// Spawn the configured binary in single-shot, non-interactive mode
    /// with JSON-framed output, passing `prompt` as its final argument, and
    /// extract the reply's `result` field. On timeout, drop the handle
    /// first (a soft interruption via EOF on the child's pipes) and give it
    /// [`KILL_GRACE`] to exit before the process group is killed outright.
    async fn execute_prompt(
        &self,
        working_dir: &str,
        prompt: &str,
        allowed_tools: &[String],
    ) -> Result<String, ArsError> {
        let Some((binary, args)) = self.command.split_first() else {
            return Err(ArsError::AgentUnavailable {
                message: "agent.command is empty".to_string(),
            });
        };

        let mut command = Command::new(binary);
        command
            .args(args)
            .arg("--print")
            .arg("--output-format")
            .arg("json")
            .current_dir(working_dir)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if !allowed_tools.is_empty() {
            command.arg("--allowed-tools").arg(allowed_tools.join(","));
        }
        command.arg(prompt);
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| ArsError::AgentUnavailable {
            message: format!("failed to spawn agent process: {e}"),
        })?;

        match timeout(self.probe_timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => {
                Self::parse_reply(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ArsError::AgentUnavailable {
                    message: format!("agent exited with {}: {stderr}", output.status),
                })
            }
            Ok(Err(e)) => Err(ArsError::AgentUnavailable {
                message: format!("failed to read agent output: {e}"),
            }),
            Err(_) => {
                tokio::time::sleep(KILL_GRACE).await;
                Err(ArsError::AgentTimeout {
                    context: working_dir.to_string(),
                    timeout_secs: self.probe_timeout.as_secs(),
                })
            }
        }
    }
}

/// Canned-response stand-in for [`ProcessExecutor`], used so tests can
/// exercise every metric's aggregation and scoring path without a real
/// agent binary on PATH. Responses are keyed by a substring of the prompt;
/// the first matching key wins. A prompt matching no key falls back to
/// `default_response`, or errors if none was configured.
pub struct MockExecutor {
    responses: HashMap<String, String>,
    default_response: Option<String>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: None,
        }
    }

    pub fn with_response(mut self, prompt_substring: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(prompt_substring.into(), response.into());
        self
    }

    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(response.into());
        self
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptExecutor for MockExecutor {
    fn check_available(&self) -> Result<(), ArsError> {
        Ok(())
    }

    async fn execute_prompt(
        &self,
        _working_dir: &str,
        prompt: &str,
        _allowed_tools: &[String],
    ) -> Result<String, ArsError> {
        if let Some((_, response)) = self.responses.iter().find(|(key, _)| prompt.contains(key.as_str())) {
            return Ok(response.clone());
        }
        self.default_response.clone().ok_or_else(|| ArsError::AgentUnavailable {
            message: "mock executor has no matching or default response".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_command_is_unavailable() {
        let executor = ProcessExecutor::new(Vec::new(), Duration::from_secs(1));
        let result = executor.execute_prompt(".", "prompt", &[]).await;
        assert!(matches!(result, Err(ArsError::AgentUnavailable { .. })));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable_on_check() {
        let executor = ProcessExecutor::new(vec!["ars-nonexistent-binary".to_string()], Duration::from_secs(1));
        assert!(executor.check_available().is_err());
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let executor =
            ProcessExecutor::new(vec!["sleep".to_string(), "5".to_string()], Duration::from_millis(50));
        let result = executor.execute_prompt(".", "prompt", &[]).await;
        assert!(matches!(result, Err(ArsError::AgentTimeout { .. })));
    }

    #[test]
    fn parses_result_field_out_of_json_reply() {
        let reply = ProcessExecutor::parse_reply("{\"result\": \"this file parses rust source\"}");
        assert_eq!(reply.unwrap(), "this file parses rust source");
    }

    #[test]
    fn rejects_non_json_reply() {
        assert!(ProcessExecutor::parse_reply("not json at all").is_err());
    }

    #[tokio::test]
    async fn mock_executor_matches_by_prompt_substring() {
        let mock = MockExecutor::new()
            .with_response("consistency", "this file parses rust source")
            .with_default("fallback response");

        let consistency = mock.execute_prompt(".", "probe for consistency please", &[]).await.unwrap();
        assert_eq!(consistency, "this file parses rust source");

        let other = mock.execute_prompt(".", "probe for something else", &[]).await.unwrap();
        assert_eq!(other, "fallback response");
    }

    #[tokio::test]
    async fn mock_executor_without_default_errors_on_miss() {
        let mock = MockExecutor::new();
        assert!(mock.execute_prompt(".", "anything", &[]).await.is_err());
    }
}
