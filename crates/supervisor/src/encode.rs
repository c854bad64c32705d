//! Encoder invocation descriptions and command construction.
//!
//! The argument template is a fixed policy: the video stream is copied
//! verbatim and audio is re-encoded to AAC. Nothing here is configurable
//! beyond the encoder binary itself.

use std::path::PathBuf;
use tokio::process::Command;

/// Describes one external encoder launch.
///
/// Created per input file and discarded once the process has been
/// supervised; never persisted.
#[derive(Debug, Clone)]
pub struct EncoderInvocation {
    /// Path to the input media file.
    pub input_path: PathBuf,
    /// Resolved path for the converted output file.
    pub output_path: PathBuf,
}

impl EncoderInvocation {
    /// Create a new invocation description.
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
        }
    }
}

/// Build the encoder command for one invocation.
///
/// Argument vector: `-i <input> -c:v copy -c:a aac <output>`. The binary
/// is resolved via the host's executable search path when given as a
/// bare name.
pub fn build_encoder_command(binary: &str, invocation: &EncoderInvocation) -> Command {
    let mut cmd = Command::new(binary);

    cmd.arg("-i").arg(&invocation.input_path);
    cmd.arg("-c:v").arg("copy");
    cmd.arg("-c:a").arg("aac");
    cmd.arg(&invocation.output_path);

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::ffi::OsStr;

    /// Helper to convert Command args to a Vec of strings for easier testing
    fn get_command_args(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .filter_map(|arg| arg.to_str().map(String::from))
            .collect()
    }

    // Strategy for generating valid path-like strings
    fn path_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z0-9_/.-]{1,50}")
            .unwrap()
            .prop_filter("non-empty path", |s| !s.is_empty())
    }

    // For any input/output path pair, the built command carries the complete
    // fixed argument vector in template order.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_encoder_command_matches_template(
            input_path in path_strategy(),
            output_path in path_strategy(),
        ) {
            let invocation = EncoderInvocation::new(
                PathBuf::from(&input_path),
                PathBuf::from(&output_path),
            );

            let cmd = build_encoder_command("ffmpeg", &invocation);
            let args = get_command_args(&cmd);

            prop_assert_eq!(cmd.as_std().get_program(), OsStr::new("ffmpeg"));
            prop_assert_eq!(
                args,
                vec![
                    "-i".to_string(),
                    input_path,
                    "-c:v".to_string(),
                    "copy".to_string(),
                    "-c:a".to_string(),
                    "aac".to_string(),
                    output_path,
                ]
            );
        }
    }

    #[test]
    fn test_custom_binary_name() {
        let invocation = EncoderInvocation::new(
            PathBuf::from("/media/clip.ts"),
            PathBuf::from("/media/clip.mp4"),
        );

        let cmd = build_encoder_command("/opt/ffmpeg/bin/ffmpeg", &invocation);
        assert_eq!(
            cmd.as_std().get_program(),
            OsStr::new("/opt/ffmpeg/bin/ffmpeg")
        );
    }
}
