//! Preflight checks run before starting a batch.
//!
//! A failed check is advisory for the frontends; the sequencer itself
//! reports a missing encoder per-file as `FileFailed` either way.

use std::process::Command;
use thiserror::Error;

/// Error type for startup checks
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Encoder not available: {0}")]
    EncoderUnavailable(String),
}

/// Check that the encoder binary can be executed.
///
/// Runs `<binary> -version` and verifies it exits successfully.
pub fn check_encoder_available(binary: &str) -> Result<(), StartupError> {
    let output = Command::new(binary).arg("-version").output().map_err(|e| {
        StartupError::EncoderUnavailable(format!(
            "{} -version failed; is it installed and in PATH? Error: {}",
            binary, e
        ))
    })?;

    if !output.status.success() {
        return Err(StartupError::EncoderUnavailable(format!(
            "{} -version exited with {}",
            binary, output.status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_check() {
        let result = check_encoder_available("/nonexistent/path/to/encoder");
        assert!(matches!(result, Err(StartupError::EncoderUnavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_available_binary_passes_check() {
        // `true` ignores -version and exits 0
        check_encoder_available("true").expect("check should pass");
    }
}
