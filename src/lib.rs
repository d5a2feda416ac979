/*!
 * # Srtgears - subtitle transformation engine
 *
 * A Rust library for parsing, transforming and generating movie subtitles.
 *
 * ## Features
 *
 * - Read SubRip (*.srt) files with a permissive parser
 * - Write SubRip (*.srt) and Sub Station Alpha (*.ssa) files
 * - Transformations:
 *   - Shift, scale and lengthen timestamps
 *   - Concatenate two parts, split into two parts
 *   - Merge two subtitles into a dual subtitle (one at the bottom, one at the top)
 *   - Remove HTML formatting, controls and hearing impaired lines
 *   - Set position and color
 * - Statistics of a subtitle
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle`: A single subtitle and its transformations
 * - `subs_pack`: A collection of subtitles and pack level transformations
 * - `formats`: Readers and writers:
 *   - `formats::subrip`: SubRip format
 *   - `formats::ssa`: Sub Station Alpha format
 *   - `formats::colors`: Color names and conversion
 * - `executor`: Option driven execution of transformations
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types
 *
 * ## Example
 *
 * ```no_run
 * use srtgears::{FileManager, ReadOptions};
 *
 * let options = ReadOptions::default();
 * let mut eng = FileManager::read_srt_file("eng.srt", &options)?.pack;
 * let hun = FileManager::read_srt_file("hun.srt", &options)?.pack;
 * eng.merge(hun);
 * FileManager::write_pack_file("eng+hun.srt", &eng, false)?;
 * # Ok::<(), anyhow::Error>(())
 * ```
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod errors;
pub mod executor;
pub mod file_utils;
pub mod formats;
pub mod subs_pack;
pub mod subtitle;

/// Name of the tool, written into generated files
pub const APP_NAME: &str = "Srtgears";

/// Srtgears home page
pub const HOME_PAGE: &str = "https://srt-gears.appspot.com/";

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ExecError, SubtitleError};
pub use executor::{ExecOptions, ExecOutcome, Executor};
pub use file_utils::FileManager;
pub use formats::{OutputFormat, ParseIssue, ParsedSrt, ReadOptions};
pub use subs_pack::{SubsPack, SubsStats};
pub use subtitle::{Pos, Subtitle};
