//! Conversion events and the channel carrying them to the presentation layer.
//!
//! Events flow one way, from the worker task running the batch to whatever
//! frontend renders them. The channel is single-producer/single-consumer,
//! FIFO, lossless, and never blocks the producer.

use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Aggregate outcome counters for one batch run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    /// Inputs whose encoder process ran to completion.
    pub converted: u64,
    /// Inputs rejected by the eligibility filter.
    pub skipped: u64,
    /// Inputs that failed during resolution or encoding.
    pub failed: u64,
}

impl BatchSummary {
    /// Total number of inputs processed.
    pub fn total(&self) -> u64 {
        self.converted + self.skipped + self.failed
    }
}

/// A discrete, ordered notification describing batch progress.
///
/// For every input the sequencer emits either exactly one `Skipped` or a
/// run of zero-or-more `EncoderLine`s closed by exactly one of
/// `FileCompleted`/`FileFailed`; `Info` lines may appear in between. One
/// `BatchCompleted` ends the stream.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionEvent {
    /// Informational log line.
    Info { message: String },
    /// An input was not eligible for conversion.
    Skipped { input: PathBuf, reason: String },
    /// One line of raw output from the encoder process for this input.
    EncoderLine { input: PathBuf, line: String },
    /// The encoder process for this input exited. The exit code is carried
    /// as a diagnostic only; it does not affect completed/failed status.
    FileCompleted {
        input: PathBuf,
        exit_code: Option<i32>,
    },
    /// Supervising this input raised an error before or while encoding.
    FileFailed { input: PathBuf, message: String },
    /// Every input has been processed. Terminal, emitted exactly once.
    BatchCompleted { summary: BatchSummary },
}

impl std::fmt::Display for ConversionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionEvent::Info { message } => write!(f, "{}", message),
            ConversionEvent::Skipped { input, reason } => {
                write!(f, "Skipping {}: {}", reason, input.display())
            }
            ConversionEvent::EncoderLine { line, .. } => write!(f, "{}", line),
            ConversionEvent::FileCompleted { input, .. } => {
                write!(f, "Conversion of {} completed.", input.display())
            }
            ConversionEvent::FileFailed { input, message } => {
                write!(f, "Error converting {}: {}", input.display(), message)
            }
            ConversionEvent::BatchCompleted { .. } => write!(f, "Conversion completed."),
        }
    }
}

/// Sending half of the event channel, held by the sequencer.
pub type EventSender = mpsc::UnboundedSender<ConversionEvent>;

/// Receiving half of the event channel, held by the presentation layer.
pub type EventReceiver = mpsc::UnboundedReceiver<ConversionEvent>;

/// Creates the event channel for one batch run.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
