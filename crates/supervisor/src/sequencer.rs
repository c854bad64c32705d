//! Batch sequencer: drives one conversion job to completion.
//!
//! Inputs are processed strictly one at a time, in job order. A file's
//! failure never aborts the batch; every per-file error is converted into
//! a `FileFailed` event and the sequencer moves on. The terminal
//! `BatchCompleted` event is emitted exactly once per job, after the last
//! input, empty jobs included.

use crate::encode::EncoderInvocation;
use crate::events::{event_channel, BatchSummary, ConversionEvent, EventReceiver, EventSender};
use crate::job::{is_supported_input, ConversionJob};
use crate::resolve::resolve_output_path;
use crate::runner::{run_encoder, RunnerError};
use std::path::Path;
use std::process::ExitStatus;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use ts2mp4_config::Config;

/// Reason attached to `Skipped` events for ineligible inputs.
const SKIP_REASON_UNSUPPORTED: &str = "unsupported file";

/// Sequences per-file conversions for one job at a time.
pub struct BatchSequencer {
    encoder_binary: String,
}

impl BatchSequencer {
    /// Create a sequencer using the configured encoder binary.
    pub fn new(config: &Config) -> Self {
        Self {
            encoder_binary: config.encoder.binary.clone(),
        }
    }

    /// Create a sequencer for an explicit encoder binary.
    pub fn with_encoder_binary<S: Into<String>>(binary: S) -> Self {
        Self {
            encoder_binary: binary.into(),
        }
    }

    /// Start the job on a dedicated worker task.
    ///
    /// Returns the receiving half of the event channel for the
    /// presentation layer to drain, plus the join handle resolving to the
    /// batch summary once every input has been processed.
    pub fn spawn(self, job: ConversionJob) -> (EventReceiver, JoinHandle<BatchSummary>) {
        let (events, receiver) = event_channel();
        let handle = tokio::spawn(async move { self.run(&job, &events).await });
        (receiver, handle)
    }

    /// Process every input of the job in order, emitting events as it goes.
    pub async fn run(&self, job: &ConversionJob, events: &EventSender) -> BatchSummary {
        info!(job = %job.id, inputs = job.len(), "starting batch");

        let mut summary = BatchSummary::default();

        for input in &job.inputs {
            if !is_supported_input(input) {
                debug!(input = %input.display(), "input not eligible, skipping");
                summary.skipped += 1;
                emit(
                    events,
                    ConversionEvent::Skipped {
                        input: input.clone(),
                        reason: SKIP_REASON_UNSUPPORTED.to_string(),
                    },
                );
                continue;
            }

            match self
                .convert_one(input, job.output_dir.as_deref(), events)
                .await
            {
                Ok(status) => {
                    summary.converted += 1;
                    emit(
                        events,
                        ConversionEvent::FileCompleted {
                            input: input.clone(),
                            exit_code: status.code(),
                        },
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    emit(
                        events,
                        ConversionEvent::FileFailed {
                            input: input.clone(),
                            message: e.to_string(),
                        },
                    );
                }
            }
        }

        info!(
            job = %job.id,
            converted = summary.converted,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch finished"
        );
        emit(
            events,
            ConversionEvent::BatchCompleted {
                summary: summary.clone(),
            },
        );

        summary
    }

    /// Convert a single eligible input, relaying encoder output lines.
    async fn convert_one(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        events: &EventSender,
    ) -> Result<ExitStatus, RunnerError> {
        let output_path = resolve_output_path(input, output_dir);
        emit(
            events,
            ConversionEvent::Info {
                message: format!(
                    "Converting {} to {}",
                    input.display(),
                    output_path.display()
                ),
            },
        );

        let invocation = EncoderInvocation::new(input.to_path_buf(), output_path);
        run_encoder(&self.encoder_binary, &invocation, |line| {
            emit(
                events,
                ConversionEvent::EncoderLine {
                    input: input.to_path_buf(),
                    line: line.to_string(),
                },
            );
        })
        .await
    }
}

/// Send an event, tolerating a dropped receiver.
///
/// The batch runs to completion even if the presentation layer has gone
/// away; there is no cancellation path.
fn emit(events: &EventSender, event: ConversionEvent) {
    if events.send(event).is_err() {
        debug!("event receiver dropped, batch continues");
    }
}
