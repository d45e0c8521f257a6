use crate::cli::Cli;
use crate::history::{
    AssumeYes, Confirm, Decision, RollbackError, RollbackPrompt, VersionHistoryView,
};
use crate::models::VersionRecord;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use polyfmt::println;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Stderr, StdinLock, Write};
use std::path::PathBuf;
use tracing::info;

/// What gets handed off once a rollback is confirmed. Whoever consumes it is responsible for
/// actually redeploying the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackRequest {
    pub app_name: String,
    pub version: u64,
    pub image_name: String,
    pub git_hash: Option<String>,
    pub requested_at: String,
}

impl RollbackRequest {
    pub fn new(app_name: &str, record: &VersionRecord, requested_at: DateTime<Utc>) -> Self {
        Self {
            app_name: app_name.to_string(),
            version: record.version,
            image_name: record.image_name().unwrap_or_default().to_string(),
            git_hash: record.git_hash.clone(),
            requested_at: requested_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Where confirmed rollback requests are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSink {
    Stdout,
    File(PathBuf),
}

impl RequestSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => RequestSink::File(path),
            None => RequestSink::Stdout,
        }
    }

    pub fn send(&self, request: &RollbackRequest) -> Result<()> {
        let document = serde_json::to_string_pretty(request)
            .context("Could not serialize rollback request")?;

        match self {
            RequestSink::Stdout => {
                println!("{}", document);
            }
            RequestSink::File(path) => {
                std::fs::write(path, document).with_context(|| {
                    format!(
                        "Could not write rollback request to '{}'",
                        path.to_string_lossy()
                    )
                })?;
            }
        }

        Ok(())
    }
}

/// Anything starting with 'y' is a yes; everything else, including no answer at all, is a no.
pub fn parse_answer(answer: &str) -> Decision {
    if answer.trim().to_lowercase().starts_with('y') {
        Decision::Confirmed
    } else {
        Decision::Cancelled
    }
}

/// Asks on the terminal. The prompt goes to stderr so stdout only ever carries the request
/// document.
#[derive(Debug)]
pub struct TerminalConfirmer<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirmer<StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &RollbackPrompt) -> std::io::Result<String> {
        writeln!(self.output, "{}\n", prompt.title.bold())?;
        writeln!(self.output, "{}\n", prompt.warning)?;
        write!(self.output, "{} [y/N]: ", prompt.question)?;
        self.output.flush()?;

        // EOF leaves the answer empty, which counts as a no.
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        writeln!(self.output)?;

        Ok(answer)
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirmer<R, W> {
    fn confirm(&mut self, prompt: &RollbackPrompt) -> Result<Decision, RollbackError> {
        let answer = self
            .ask(prompt)
            .map_err(|e| RollbackError::Prompt(e.to_string()))?;

        Ok(parse_answer(&answer))
    }
}

impl Cli {
    pub fn version_rollback(&self, version: u64, assume_yes: bool) -> Result<()> {
        let history = self.load_history()?;
        let view = VersionHistoryView::new(&history.versions, history.deployed_version);

        let record = view
            .find(version)
            .ok_or_else(|| anyhow!("Version {} not found for '{}'", version, history.app_name))?;

        let sink = RequestSink::from_path(self.conf.rollback.request_path.clone());

        let mut confirmer: Box<dyn Confirm> = if assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(TerminalConfirmer::stdio())
        };

        let mut sent = Ok(());
        let decision = view
            .request_rollback(record, confirmer.as_mut(), |record| {
                let request = RollbackRequest::new(&history.app_name, record, Utc::now());
                info!(version = request.version, sink = ?sink, "forwarding rollback request");
                sent = sink.send(&request);
            })
            .context("Could not roll back")?;

        match decision {
            Decision::Confirmed => {
                sent?;
                eprintln!(
                    "{} Rollback of '{}' to version {} requested!",
                    "✓".green(),
                    history.app_name,
                    version
                );
            }
            Decision::Cancelled => {
                eprintln!("{} Rollback cancelled", "x".red());
            }
        }

        Ok(())
    }
}
