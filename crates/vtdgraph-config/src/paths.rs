//! Output file layout.
//!
//! Every artifact of a state lives in its own directory, named after the
//! state slug:
//!
//! ```text
//! {output_dir}/{slug}/{slug}.idx
//! {output_dir}/{slug}/{slug}.idx.json
//! {output_dir}/{slug}/{slug}.json
//! {output_dir}/{slug}/{slug}.novert.json
//! {output_dir}/{slug}/{slug}.districts.json
//! ```

use std::path::{Path, PathBuf};

use crate::output::OutputKind;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Lowercases a state name and joins its words with underscores.
///
/// `"New York"` becomes `new_york`.
pub fn state_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether `slug` is non-empty and only uses `a-z`, `0-9` and `_`.
///
/// Only such slugs are joined onto the output directory.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Directory holding one state's artifacts.
pub fn state_dir(output_dir: impl AsRef<Path>, slug: &str) -> PathBuf {
    output_dir.as_ref().join(slug)
}

/// Full path of one artifact.
pub fn artifact_path(output_dir: impl AsRef<Path>, slug: &str, kind: OutputKind) -> PathBuf {
    state_dir(output_dir, slug).join(format!("{slug}{}", kind.suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_joins_words() {
        assert_eq!(state_slug("New York"), "new_york");
        assert_eq!(state_slug("  iowa "), "iowa");
        assert_eq!(state_slug("District of  Columbia"), "district_of_columbia");
    }

    #[test]
    fn slug_charset() {
        assert!(is_valid_slug("district_of_columbia"));
        assert!(is_valid_slug("guam_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("../x"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("c:\\temp"));
        assert!(!is_valid_slug("são_tomé"));
    }

    #[test]
    fn artifact_layout() {
        assert_eq!(
            artifact_path("out", "iowa", OutputKind::Readable),
            Path::new("out/iowa/iowa.idx.json")
        );
        assert_eq!(
            artifact_path("out", "new_york", OutputKind::DistrictMapping),
            Path::new("out/new_york/new_york.districts.json")
        );
    }
}
