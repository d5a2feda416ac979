use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::formats::{parse_srt, OutputFormat, ParsedSrt, ReadOptions};
use crate::subs_pack::SubsPack;

// @module: File wrappers around the subtitle codecs

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Reads and parses a SubRip file (*.srt)
    pub fn read_srt_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<ParsedSrt> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open subtitle file: {}", path.display()))?;
        let parsed = parse_srt(BufReader::new(file), options)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        debug!("Read {} subtitles from {}", parsed.pack.len(), path.display());
        Ok(parsed)
    }

    /// Writes a pack to a file, the format is chosen by the file extension.
    ///
    /// An existing file is only replaced when `force_overwrite` is set.
    pub fn write_pack_file<P: AsRef<Path>>(path: P, pack: &SubsPack, force_overwrite: bool) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;

        if path.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {}. Use --force to overwrite.",
                path.display()
            ));
        }

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        format
            .write(&mut writer, pack)
            .with_context(|| format!("Failed to write {} file: {}", format, path.display()))?;

        debug!("Wrote {} subtitles to {}", pack.len(), path.display());
        Ok(())
    }
}
