use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: Subtitle discovery and report file I/O

/// Extension of the subtitle files picked up in folder mode
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Marker between the subtitle stem and the report extension
pub const REPORT_SUFFIX: &str = "vocab";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    /// Report path for a subtitle: `<output_dir>/<stem>.vocab.<extension>`
    pub fn report_path(subtitle: &Path, output_dir: &Path, extension: &str) -> PathBuf {
        let stem = subtitle
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        output_dir.join(format!("{}.{}.{}", stem, REPORT_SUFFIX, extension))
    }

    /// Whether the path has the subtitle extension, ignoring case
    pub fn is_subtitle(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SUBTITLE_EXTENSION))
    }

    /// All subtitle files below `dir`, in file name order per directory
    pub fn find_subtitles(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut subtitles = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
            if entry.file_type().is_file() && Self::is_subtitle(entry.path()) {
                subtitles.push(entry.into_path());
            }
        }

        Ok(subtitles)
    }

    /// Read a UTF-8 text file
    pub fn read_text(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Write a text file, creating missing parent directories
    pub fn write_text(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}
