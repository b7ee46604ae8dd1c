//! The final submission payload and the collaborators that receive it.
//!
//! Handing a submission to a sink is fire-and-forget: sinks report their own
//! failures through `tracing` and never feed anything back into the session.
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::identity::SessionIdentity;
use crate::value::ValueMap;

/// `{ "identity": {...}, "formValues": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub identity: SessionIdentity,
    pub form_values: ValueMap,
}

impl Submission {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Receiver of a completed form.
pub trait SubmissionSink {
    fn submit(&self, submission: &Submission);
}

/// Logs the payload as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&self, submission: &Submission) {
        match serde_json::to_string(submission) {
            Ok(json) => info!(payload = %json, "form submitted"),
            Err(e) => error!("failed to encode submission: {e}"),
        }
    }
}

/// Writes the payload as pretty JSON to a file, replacing earlier content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionSink for FileSink {
    fn submit(&self, submission: &Submission) {
        let json = match submission.to_json_pretty() {
            Ok(json) => json,
            Err(e) => {
                error!("failed to encode submission: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("failed to create {}: {e}", parent.display());
                return;
            }
        }
        match fs::write(&self.path, json) {
            Ok(()) => info!("submission written to {}", self.path.display()),
            Err(e) => error!("failed to write submission to {}: {e}", self.path.display()),
        }
    }
}

/// Fans a submission out to several sinks in order.
#[derive(Default)]
pub struct SinkChain {
    sinks: Vec<Box<dyn SubmissionSink + Send + Sync>>,
}

impl SinkChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl SubmissionSink + Send + Sync + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SubmissionSink for SinkChain {
    fn submit(&self, submission: &Submission) {
        for sink in &self.sinks {
            sink.submit(submission);
        }
    }
}
