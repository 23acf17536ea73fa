//! MathJax CLI engine
//!
//! Drives the `tex2svg` command from mathjax-node-cli. The process is
//! spawned per invocation and awaited asynchronously; a missing binary is
//! the explicit "engine unavailable" failure mode.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::{EngineError, TypesetEngine};

/// Typesetting engine backed by the MathJax `tex2svg` command line tool
#[derive(Debug, Clone)]
pub struct MathJaxCli {
    cli_path: PathBuf,
}

impl MathJaxCli {
    pub fn new(cli_path: PathBuf) -> Self {
        Self { cli_path }
    }

    /// Engine at the conventional binary name, resolved via `PATH`
    pub fn from_path() -> Self {
        Self::new(PathBuf::from("tex2svg"))
    }
}

#[async_trait]
impl TypesetEngine for MathJaxCli {
    async fn typeset(&self, source: &str, display_mode: bool) -> Result<String, EngineError> {
        let started_at = Instant::now();
        let mut command = Command::new(&self.cli_path);
        if !display_mode {
            command.arg("--inline");
        }
        command
            .arg("--")
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = command.output().await.map_err(|err| {
            warn!(
                target: "mathsmith::engine",
                op = "typeset",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                error = %err,
                "Failed to spawn MathJax CLI"
            );
            if err.kind() == ErrorKind::NotFound {
                EngineError::Unavailable(format!(
                    "{} not found on this system",
                    self.cli_path.display()
                ))
            } else {
                EngineError::Failed(err.to_string())
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(
                target: "mathsmith::engine",
                op = "typeset",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                exit_code = output.status.code().map(i64::from).unwrap_or(-1),
                stderr = %stderr,
                "MathJax CLI rejected input"
            );
            let diagnostic = stderr.trim();
            if diagnostic.is_empty() {
                return Err(EngineError::Failed(format!(
                    "exit status {:?} with no diagnostic",
                    output.status.code()
                )));
            }
            return Err(EngineError::Syntax(diagnostic.to_string()));
        }

        // MathJax 3 reports TeX errors inside otherwise valid SVG output
        if let Some(message) = extract_mjx_error(&stdout) {
            warn!(
                target: "mathsmith::engine",
                op = "typeset",
                result = "syntax_error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                diagnostic = %message,
                "MathJax reported a TeX error"
            );
            return Err(EngineError::Syntax(message));
        }

        info!(
            target: "mathsmith::engine",
            op = "typeset",
            result = "ok",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            svg_bytes = stdout.len(),
            "Formula typeset via MathJax CLI"
        );
        Ok(stdout)
    }
}

/// Pull the diagnostic out of a `data-mjx-error="..."` attribute
fn extract_mjx_error(svg: &str) -> Option<String> {
    let tail = svg.split_once("data-mjx-error=\"")?.1;
    let (message, _) = tail.split_once('"')?;
    Some(unescape_entities(message))
}

fn unescape_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
