/*!
 * Subtitle file formats.
 *
 * - `subrip`: SubRip (*.srt), read and write
 * - `ssa`: Sub Station Alpha v4 (*.ssa), write only
 * - `colors`: color name table and color conversion used by styled formats
 */

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::errors::SubtitleError;
use crate::subs_pack::SubsPack;

pub mod colors;
pub mod ssa;
pub mod subrip;

pub use self::ssa::{read_ssa_from, write_ssa_to};
pub use self::subrip::{
    parse_srt, parse_srt_str, read_srt_from, write_srt_to, ParseIssue, ParsedSrt, ReadOptions,
};

/// Line ending used by all writers, regardless of platform
pub const NEWLINE: &str = "\r\n";

/// Output formats the library can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    SubRip,
    SubStationAlpha,
}

impl OutputFormat {
    /// Determines the output format from a file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "srt" => Ok(Self::SubRip),
            "ssa" => Ok(Self::SubStationAlpha),
            "" => Err(SubtitleError::Unsupported(format!(
                "Output extension not specified: {}",
                path.display()
            ))),
            other => Err(SubtitleError::Unsupported(format!(
                "Unsupported file extension, only *.srt and *.ssa are supported: .{}",
                other
            ))),
        }
    }

    // @returns: Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::SubRip => "srt",
            Self::SubStationAlpha => "ssa",
        }
    }

    /// Writes the pack in this format
    pub fn write<W: Write + ?Sized>(&self, w: &mut W, pack: &SubsPack) -> Result<(), SubtitleError> {
        match self {
            Self::SubRip => write_srt_to(w, pack),
            Self::SubStationAlpha => write_ssa_to(w, pack),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubRip => write!(f, "SubRip"),
            Self::SubStationAlpha => write!(f, "Sub Station Alpha"),
        }
    }
}
