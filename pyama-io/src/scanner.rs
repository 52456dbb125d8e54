//! Position directory scanner.
//!
//! The pipeline writes one `XY<number>` directory per imaged stage
//! position. A position is usable by the viewer only once segmentation and
//! tracking have produced all of its artifacts, so the scanner skips
//! directories that are missing any required file.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Files a position directory must contain to be considered complete.
pub const REQUIRED_FILES: [&str; 3] = ["data.h5", "features.csv", "tracks.csv"];

/// A complete position directory found in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionDir {
    /// Position index parsed from the directory name.
    pub index: usize,
    /// Absolute path of the directory.
    pub path: PathBuf,
}

impl PositionDir {
    /// Path of the track file inside this position directory.
    pub fn tracks_path(&self) -> PathBuf {
        self.path.join("tracks.csv")
    }
}

/// Scans an output directory for complete position directories.
///
/// Returns positions sorted by index. Directories whose names do not match
/// `XY<number>` (leading zeros allowed) and directories missing any of
/// [`REQUIRED_FILES`] are skipped silently.
pub fn scan_positions(out_dir: &Path) -> Result<Vec<PositionDir>> {
    let mut positions = Vec::new();

    for entry in std::fs::read_dir(out_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(index) = parse_position_name(&name.to_string_lossy()) else {
            continue;
        };
        let path = entry.path();
        if REQUIRED_FILES.iter().all(|f| path.join(f).is_file()) {
            positions.push(PositionDir { index, path });
        }
    }

    positions.sort_by_key(|p| p.index);
    Ok(positions)
}

/// Parses `XY0*<digits>` into a position index.
fn parse_position_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("XY")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn make_position(root: &Path, name: &str, files: &[&str]) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for f in files {
            fs::write(dir.join(f), b"").unwrap();
        }
    }

    #[test]
    fn test_parse_position_name() {
        assert_eq!(parse_position_name("XY07"), Some(7));
        assert_eq!(parse_position_name("XY000"), Some(0));
        assert_eq!(parse_position_name("XY12"), Some(12));
        assert_eq!(parse_position_name("XY"), None);
        assert_eq!(parse_position_name("XY1a"), None);
        assert_eq!(parse_position_name("pos3"), None);
    }

    #[test]
    fn test_scan_finds_only_complete_positions_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        make_position(root, "XY02", &REQUIRED_FILES);
        make_position(root, "XY00", &REQUIRED_FILES);
        // Incomplete: no tracks.csv yet.
        make_position(root, "XY01", &["data.h5", "features.csv"]);
        // Not a position directory.
        make_position(root, "logs", &["run.txt"]);
        // A stray file should be ignored.
        fs::write(root.join("XY03"), b"not a dir").unwrap();

        let positions = scan_positions(root).unwrap();
        let indices: Vec<usize> = positions.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(positions[0].tracks_path().ends_with("XY00/tracks.csv"));
    }

    #[test]
    fn test_scan_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_positions(tmp.path()).unwrap().is_empty());
    }
}
