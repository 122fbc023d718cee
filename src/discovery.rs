use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, CoughScanError};

/// One candidate audio file found under the run root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioItem {
    pub path: PathBuf,
    /// Lower-cased extension without the dot; doubles as the media format token
    pub format: String,
    /// Size on disk at discovery time, for diagnostics only
    pub size: u64,
}

/// Recursively enumerate files under `root` whose extension is in `extensions`.
///
/// Entries are sorted by file name within each directory so that two runs
/// over an unchanged tree visit files in the same order.
pub fn discover_audio_files<P: AsRef<Path>>(root: P, extensions: &[String]) -> Result<Vec<AudioItem>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(CoughScanError::FileNotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(CoughScanError::Config(format!(
            "Input path is not a directory: {}",
            root.display()
        )));
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    let mut items = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(format) = audio_format(entry.path(), &wanted) else {
            continue;
        };

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        items.push(AudioItem {
            path: entry.into_path(),
            format,
            size,
        });
    }

    debug!("Discovered {} audio files under {}", items.len(), root.display());
    Ok(items)
}

/// Lower-cased extension of `path` if it is one of `wanted`
fn audio_format(path: &Path, wanted: &[String]) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    wanted.contains(&ext).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn default_extensions() -> Vec<String> {
        ["mp3", "wav", "flac", "aac", "ogg"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filters_by_extension_case_insensitively() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a.wav").write_binary(b"RIFF").unwrap();
        dir.child("b.txt").write_str("notes").unwrap();
        dir.child("nested/c.MP3").write_binary(b"ID3").unwrap();
        dir.child("nested/deeper/d.Flac").write_binary(b"fLaC").unwrap();
        dir.child("nested/e.wav.bak").write_binary(b"RIFF").unwrap();

        let items = discover_audio_files(dir.path(), &default_extensions()).unwrap();
        let names: Vec<String> = items
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.wav", "c.MP3", "d.Flac"]);
        assert_eq!(items[1].format, "mp3");
        assert_eq!(items[2].format, "flac");
        assert_eq!(items[0].size, 4);
    }

    #[test]
    fn test_order_is_stable() {
        let dir = assert_fs::TempDir::new().unwrap();
        for name in ["z.ogg", "m.aac", "a.ogg", "sub/b.wav"] {
            dir.child(name).write_binary(b"x").unwrap();
        }

        let first = discover_audio_files(dir.path(), &default_extensions()).unwrap();
        let second = discover_audio_files(dir.path(), &default_extensions()).unwrap();
        assert_eq!(first, second);

        let names: Vec<String> = first
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.ogg", "m.aac", "b.wav", "z.ogg"]);
    }

    #[test]
    fn test_extension_list_accepts_dots_and_case() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a.wav").write_binary(b"x").unwrap();
        dir.child("b.mp3").write_binary(b"x").unwrap();

        let items = discover_audio_files(dir.path(), &[".WAV".to_string()]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].format, "wav");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_audio_files(&missing, &default_extensions()),
            Err(CoughScanError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("a.wav");
        file.write_binary(b"x").unwrap();
        assert!(discover_audio_files(file.path(), &default_extensions()).is_err());
    }
}
