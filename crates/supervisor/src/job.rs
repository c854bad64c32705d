//! Conversion job model and input eligibility filtering.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File suffix recognized as an eligible conversion source.
///
/// Matched case-sensitively against the end of the path, so `CLIP.TS`
/// is not eligible while a bare `.ts` dotfile is.
pub const SOURCE_SUFFIX: &str = ".ts";

/// One user-initiated batch of input-to-output conversions.
///
/// Inputs keep their given order (it is the processing order) and may
/// contain duplicates. The job is immutable once created and owned by
/// the sequencer for the duration of one run.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Unique run identifier, used in log output only.
    pub id: String,
    /// Ordered input file paths.
    pub inputs: Vec<PathBuf>,
    /// Optional output directory; outputs land beside their inputs if None.
    pub output_dir: Option<PathBuf>,
}

impl ConversionJob {
    /// Create a new job over the given inputs.
    pub fn new(inputs: Vec<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            inputs,
            output_dir,
        }
    }

    /// Number of inputs in the job.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the job has no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Checks whether a path is an eligible conversion source.
pub fn is_supported_input(path: &Path) -> bool {
    path.to_string_lossy().ends_with(SOURCE_SUFFIX)
}
