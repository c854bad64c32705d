//! ts2mp4 batch transcoding supervisor
//!
//! Sequences per-file conversions of transport-stream files to MP4,
//! spawns and supervises the external encoder process for each input,
//! and reports structured progress events to a presentation layer over
//! a one-way channel.

pub mod encode;
pub mod events;
pub mod job;
pub mod resolve;
pub mod runner;
pub mod scan;
pub mod sequencer;
pub mod startup;

pub use ts2mp4_config as config;
pub use ts2mp4_config::Config;

pub use encode::{build_encoder_command, EncoderInvocation};
pub use events::{event_channel, BatchSummary, ConversionEvent, EventReceiver, EventSender};
pub use job::{is_supported_input, ConversionJob, SOURCE_SUFFIX};
pub use resolve::{resolve_output_path, OUTPUT_EXTENSION};
pub use runner::{run_encoder, RunnerError};
pub use scan::find_source_files;
pub use sequencer::BatchSequencer;
pub use startup::{check_encoder_available, StartupError};
