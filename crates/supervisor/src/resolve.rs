//! Output path resolution for conversion jobs.
//!
//! Pure path arithmetic: no filesystem access, no existence checks, no
//! directory creation. Two inputs mapping to the same output are not
//! detected or disambiguated.

use std::path::{Path, PathBuf};

/// Container extension for converted outputs.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Resolves the destination path for a converted file.
///
/// If `output_dir` is present and non-empty, the result is `output_dir`
/// joined with the input's base name with the extension replaced by
/// `.mp4`. Otherwise the output is placed next to the input file.
pub fn resolve_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);

    match output_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => input.with_extension(OUTPUT_EXTENSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_beside_input() {
        assert_eq!(
            resolve_output_path(Path::new("a/b/clip.ts"), None),
            PathBuf::from("a/b/clip.mp4")
        );
    }

    #[test]
    fn test_resolve_into_output_dir() {
        assert_eq!(
            resolve_output_path(Path::new("a/b/clip.ts"), Some(Path::new("/out"))),
            PathBuf::from("/out/clip.mp4")
        );
    }

    #[test]
    fn test_empty_output_dir_falls_back_to_input_dir() {
        assert_eq!(
            resolve_output_path(Path::new("a/b/clip.ts"), Some(Path::new(""))),
            PathBuf::from("a/b/clip.mp4")
        );
    }

    #[test]
    fn test_bare_file_name() {
        assert_eq!(
            resolve_output_path(Path::new("clip.ts"), None),
            PathBuf::from("clip.mp4")
        );
    }

    #[test]
    fn test_multi_dot_name_strips_last_extension_only() {
        assert_eq!(
            resolve_output_path(Path::new("show.s01e02.ts"), Some(Path::new("/out"))),
            PathBuf::from("/out/show.s01e02.mp4")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // Resolution is pure path arithmetic: the output always carries the
        // input's stem plus .mp4, and the directory follows the output_dir rule.
        #[test]
        fn prop_resolved_path_structure(
            dir in "[a-z][a-z0-9/]{0,20}",
            stem in "[a-zA-Z0-9_-]{1,20}",
            out_dir in proptest::option::of("/[a-z][a-z0-9/]{0,20}"),
        ) {
            let input = PathBuf::from(&dir).join(format!("{}.ts", stem));
            let resolved =
                resolve_output_path(&input, out_dir.as_ref().map(Path::new));

            let expected_name = format!("{}.mp4", stem);
            prop_assert_eq!(
                resolved.file_name().and_then(|n| n.to_str()),
                Some(expected_name.as_str())
            );

            let expected_parent = match out_dir {
                Some(ref d) => PathBuf::from(d),
                None => input.parent().map(PathBuf::from).unwrap_or_default(),
            };
            prop_assert_eq!(resolved.parent(), Some(expected_parent.as_path()));
        }

        // Same input, same answer: no hidden state.
        #[test]
        fn prop_resolution_is_deterministic(
            stem in "[a-zA-Z0-9_-]{1,20}",
        ) {
            let input = PathBuf::from(format!("media/{}.ts", stem));
            let first = resolve_output_path(&input, Some(Path::new("/out")));
            let second = resolve_output_path(&input, Some(Path::new("/out")));
            prop_assert_eq!(first, second);
        }
    }
}
