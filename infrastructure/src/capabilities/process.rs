//! Child-process text generation.
//!
//! Each request spawns the configured command and writes one JSON document
//! to its stdin:
//!
//! ```json
//! {"messages":[{"role":"system","content":"..."},{"role":"user","content":"..."}],
//!  "options":{"temperature":0.7,"max_tokens":512}}
//! ```
//!
//! The completion is whatever the process prints to stdout. A non-zero exit
//! status fails the request with the process's stderr.

use crate::config::FileCapabilityConfig;
use async_trait::async_trait;
use council_application::{GatewayError, GenerationOptions, StreamHandle, TextGenerator};
use council_domain::{Message, StreamEvent};
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Serialize)]
struct Request<'a> {
    messages: &'a [Message],
    options: &'a GenerationOptions,
}

/// A capability backed by an external command
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    name: String,
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl ProcessGenerator {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn from_config(name: impl Into<String>, config: &FileCapabilityConfig) -> Self {
        Self::new(name, config.command.clone())
            .with_args(config.args.clone())
            .with_env(config.env.clone())
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn request_body(
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Vec<u8>, GatewayError> {
        serde_json::to_vec(&Request { messages, options })
            .map_err(|e| GatewayError::Other(format!("failed to encode request: {}", e)))
    }

    /// Spawn the command and feed it the request in the background.
    fn spawn(&self, body: Vec<u8>) -> Result<Child, GatewayError> {
        debug!(
            "[{}] spawning {} {:?} ({} bytes on stdin)",
            self.name,
            self.command,
            self.args,
            body.len()
        );

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::Process(format!(
                    "[{}] failed to spawn {}: {}",
                    self.name, self.command, e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GatewayError::Process(format!("[{}] stdin unavailable", self.name)))?;
        let name = self.name.clone();
        tokio::spawn(async move {
            // A backend may exit without reading its input; its exit status decides.
            if let Err(e) = stdin.write_all(&body).await {
                debug!("[{}] stdin write failed: {}", name, e);
            }
        });

        Ok(child)
    }

    fn exit_error(&self, status: std::process::ExitStatus, stderr: &[u8]) -> GatewayError {
        let stderr = String::from_utf8_lossy(stderr);
        let stderr = stderr.trim();
        let detail = if stderr.is_empty() {
            String::new()
        } else {
            format!(": {}", stderr)
        };
        GatewayError::Process(format!(
            "[{}] {} exited with {}{}",
            self.name, self.command, status, detail
        ))
    }
}

#[async_trait]
impl TextGenerator for ProcessGenerator {
    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let child = self.spawn(Self::request_body(messages, options)?)?;
        let output = child.wait_with_output().await.map_err(|e| {
            GatewayError::Process(format!(
                "[{}] failed to wait for {}: {}",
                self.name, self.command, e
            ))
        })?;

        if !output.status.success() {
            return Err(self.exit_error(output.status, &output.stderr));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        debug!("[{}] completed ({} bytes)", self.name, text.len());
        Ok(text)
    }

    /// Forward stdout line by line as it is produced.
    async fn generate_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<StreamHandle, GatewayError> {
        let mut child = self.spawn(Self::request_body(messages, options)?)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GatewayError::Process(format!("[{}] stdout unavailable", self.name)))?;

        // Drained alongside stdout so a chatty backend cannot fill the pipe.
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut stderr = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_end(&mut stderr).await;
            }
            stderr
        });

        let (tx, rx) = mpsc::channel(64);
        let this = self.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut full_text = String::new();
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => {
                        full_text.push_str(&line);
                        if tx.send(StreamEvent::Delta(line.clone())).await.is_err() {
                            // Receiver dropped; kill_on_drop reaps the child.
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(StreamEvent::Error(format!("[{}] read failed: {}", this.name, e)))
                            .await;
                        return;
                    }
                }
            }

            let stderr = stderr_task.await.unwrap_or_default();

            let event = match child.wait().await {
                Ok(status) if status.success() => StreamEvent::Completed(full_text),
                Ok(status) => {
                    let err = this.exit_error(status, &stderr);
                    warn!("{}", err);
                    StreamEvent::Error(err.to_string())
                }
                Err(e) => StreamEvent::Error(format!("[{}] failed to wait: {}", this.name, e)),
            };
            let _ = tx.send(event).await;
        });

        Ok(StreamHandle::new(rx))
    }
}
