/*!
 * Reading and writing the SubRip format (*.srt).
 *
 * The parser is permissive: it tries to make sense of the input even if it
 * does not conform to the format, and reports what it had to tolerate as
 * [`ParseIssue`]s instead of failing.
 *
 * Two unofficial extensions are read and written:
 * - a leading `{\anX}` position marker (X is 1-9, numeric keypad layout)
 * - a `<font color="...">...</font>` tag wrapping all lines of a subtitle
 *
 * Example:
 *
 * ```text
 * 1
 * 00:02:17,440 --> 00:02:20,375
 * Senator, we're making
 * our final approach into Coruscant.
 *
 * 2
 * 00:02:20,476 --> 00:02:22,501
 * {\an8}Very good, Lieutenant.
 * ```
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::io::{BufRead, Write};

use crate::errors::SubtitleError;
use crate::formats::NEWLINE;
use crate::subs_pack::SubsPack;
use crate::subtitle::{Pos, Subtitle};

/// Validates sequence number lines (debug mode only)
static SEQ_NUM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s*$").expect("Invalid sequence number regex")
});

/// Extracts both timestamps of a timestamp line. Very permissive, it also
/// accepts lines like `dY 00:02:20.476--->   00:02:22,501X Y`.
static TIMESTAMPS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\d):(\d\d):(\d\d)[,.](\d\d\d)\s*-+>\s*(\d\d):(\d\d):(\d\d)[,.](\d\d\d)")
        .expect("Invalid timestamps regex")
});

/// A single timestamp such as `00:59:00,123`
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\d):(\d\d):(\d\d)[,.](\d\d\d)").expect("Invalid time regex")
});

/// The single-parameter `{\aX}` alignment control
static LEGACY_ALIGN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\\a\d\}").expect("Invalid alignment regex")
});

/// Opening font tag with a color attribute at the start of a line
static FONT_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<font\s+color\s*=\s*(?:"([^"]*)"|'([^']*)')\s*>"#).expect("Invalid font tag regex")
});

static FONT_CLOSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*/\s*font\s*>").expect("Invalid font close tag regex")
});

const BOM: char = '\u{feff}';

/// Options for reading SubRip content
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Log diagnostics and validate sequence number lines
    pub debug: bool,
}

/// Irregularities tolerated while parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseIssue {
    /// Line where a sequence number was expected is not a number
    InvalidSequenceNumber { line_no: usize, line: String },
    /// Timestamp line could not be parsed, timestamps are left at zero
    InvalidTimestamps { line_no: usize, line: String },
    /// Subtitle disappears before (or when) it appears, it won't be visible
    NonPositiveDuration { line_no: usize, line: String },
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIssue::InvalidSequenceNumber { line_no, line } => {
                write!(f, "Invalid sequence number line {}: {}", line_no, line)
            }
            ParseIssue::InvalidTimestamps { line_no, line } => {
                write!(f, "Invalid timestamp line {}: {}", line_no, line)
            }
            ParseIssue::NonPositiveDuration { line_no, line } => {
                write!(
                    f,
                    "Appear is not earlier than disappear, text won't be visible at line {}: {}",
                    line_no, line
                )
            }
        }
    }
}

/// Result of parsing SubRip content
#[derive(Debug, Clone, Default)]
pub struct ParsedSrt {
    /// The subtitles, sorted by appearance time
    pub pack: SubsPack,
    /// Irregularities found in the input
    pub issues: Vec<ParseIssue>,
}

// @enum: What the parser expects next
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    SequenceNumber,
    Timestamps,
    Text,
}

// @struct: Line-fed SubRip parser state
struct SrtParser {
    options: ReadOptions,
    phase: Phase,
    current: Option<Subtitle>,
    subs: Vec<Subtitle>,
    issues: Vec<ParseIssue>,
}

impl SrtParser {
    fn new(options: ReadOptions) -> Self {
        Self {
            options,
            phase: Phase::SequenceNumber,
            current: None,
            subs: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        match self.phase {
            Phase::SequenceNumber => {
                // Multiple empty lines between subtitles are tolerated
                if line.is_empty() {
                    return;
                }
                if self.options.debug && !SEQ_NUM_REGEX.is_match(line) {
                    self.report(ParseIssue::InvalidSequenceNumber {
                        line_no,
                        line: line.to_string(),
                    });
                }
                // Sequence numbers are regenerated when writing
                self.current = Some(Subtitle::default());
                self.phase = Phase::Timestamps;
            }
            Phase::Timestamps => {
                self.parse_timestamps(line_no, line);
                self.phase = Phase::Text;
            }
            Phase::Text => {
                if line.is_empty() {
                    self.flush();
                    self.phase = Phase::SequenceNumber;
                } else if let Some(sub) = self.current.as_mut() {
                    sub.lines.push(line.to_string());
                }
            }
        }
    }

    fn parse_timestamps(&mut self, line_no: usize, line: &str) {
        let Some(caps) = TIMESTAMPS_REGEX.captures(line) else {
            self.report(ParseIssue::InvalidTimestamps {
                line_no,
                line: line.to_string(),
            });
            return;
        };

        let time_in = captured_ms(&caps, 1);
        let time_out = captured_ms(&caps, 5);
        if let Some(sub) = self.current.as_mut() {
            sub.time_in_ms = time_in;
            sub.time_out_ms = time_out;
        }

        if time_out <= time_in {
            self.report(ParseIssue::NonPositiveDuration {
                line_no,
                line: line.to_string(),
            });
        }
    }

    fn flush(&mut self) {
        if let Some(mut sub) = self.current.take() {
            extract_position(&mut sub);
            extract_color(&mut sub);
            self.subs.push(sub);
        }
    }

    fn report(&mut self, issue: ParseIssue) {
        if self.options.debug {
            warn!("{}", issue);
        }
        self.issues.push(issue);
    }

    fn finish(mut self) -> ParsedSrt {
        // The last subtitle may not be followed by an empty line
        self.flush();
        debug!("Loaded {} subtitles", self.subs.len());
        ParsedSrt {
            pack: SubsPack::from_subs(self.subs),
            issues: self.issues,
        }
    }
}

// @returns: Milliseconds from 4 consecutive capture groups (h, m, s, ms)
fn captured_ms(caps: &Captures, start_idx: usize) -> i64 {
    let get = |idx: usize| -> i64 {
        caps.get(start_idx + idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };
    ((get(0) * 60 + get(1)) * 60 + get(2)) * 1000 + get(3)
}

/// Parses a single `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) timestamp to milliseconds
pub fn parse_time(s: &str) -> Option<i64> {
    TIME_REGEX.captures(s).map(|caps| captured_ms(&caps, 1))
}

/// Formats milliseconds as `HH:MM:SS,mmm`; negative values are written as zero
pub fn format_time(ms: i64) -> String {
    let ms = ms.max(0);
    format!(
        "{:02}:{:02}:{:02},{:03}",
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000
    )
}

// @maps: {\anX} digit (numeric keypad layout) to position
fn pos_from_an_digit(digit: u8) -> Option<Pos> {
    match digit {
        b'7' => Some(Pos::TopLeft),
        b'8' => Some(Pos::Top),
        b'9' => Some(Pos::TopRight),
        b'4' => Some(Pos::Left),
        b'5' => Some(Pos::Center),
        b'6' => Some(Pos::Right),
        b'1' => Some(Pos::BottomLeft),
        b'2' => Some(Pos::Bottom),
        b'3' => Some(Pos::BottomRight),
        _ => None,
    }
}

// @maps: Position to {\anX} digit
fn an_digit_from_pos(pos: Pos) -> Option<char> {
    match pos {
        Pos::NotSpecified => None,
        Pos::TopLeft => Some('7'),
        Pos::Top => Some('8'),
        Pos::TopRight => Some('9'),
        Pos::Left => Some('4'),
        Pos::Center => Some('5'),
        Pos::Right => Some('6'),
        Pos::BottomLeft => Some('1'),
        Pos::Bottom => Some('2'),
        Pos::BottomRight => Some('3'),
    }
}

// @extracts: Leading {\anX} into pos; {\aX} is stripped but left unresolved
fn extract_position(sub: &mut Subtitle) {
    let Some(first) = sub.lines.first_mut() else {
        return;
    };
    if !first.starts_with(r"{\a") {
        return;
    }

    let bytes = first.as_bytes();
    if bytes.len() >= 6 && bytes[3] == b'n' && bytes[5] == b'}' {
        if let Some(pos) = pos_from_an_digit(bytes[4]) {
            sub.pos = pos;
            first.replace_range(..6, "");
        }
    } else if let Some(m) = LEGACY_ALIGN_REGEX.find(first.as_str()) {
        let end = m.end();
        first.replace_range(..end, "");
    }
}

// @extracts: <font color="..."> wrapping the lines into color
fn extract_color(sub: &mut Subtitle) {
    let Some(first) = sub.lines.first_mut() else {
        return;
    };
    let Some(caps) = FONT_OPEN_REGEX.captures(first.as_str()) else {
        return;
    };

    let color = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str()).to_string();
    let end = caps.get(0).map_or(0, |m| m.end());
    first.replace_range(..end, "");
    sub.color = color;

    for line in sub.lines.iter_mut() {
        if let Some(m) = FONT_CLOSE_REGEX.find(line.as_str()) {
            let range = m.range();
            line.replace_range(range, "");
            break;
        }
    }
}

/// Reads and parses SubRip content from a reader.
///
/// Only I/O errors (including invalid UTF-8) are returned as errors; malformed
/// content is tolerated and reported in [`ParsedSrt::issues`].
pub fn parse_srt<R: BufRead>(reader: R, options: &ReadOptions) -> Result<ParsedSrt, SubtitleError> {
    let mut parser = SrtParser::new(*options);
    for (idx, line) in reader.lines().enumerate() {
        let mut line = line?;
        if idx == 0 && line.starts_with(BOM) {
            line.replace_range(..BOM.len_utf8(), "");
        }
        parser.feed(idx + 1, &line);
    }
    Ok(parser.finish())
}

/// Reads SubRip content from a reader and builds a pack from it
pub fn read_srt_from<R: BufRead>(reader: R, options: &ReadOptions) -> Result<SubsPack, SubtitleError> {
    parse_srt(reader, options).map(|parsed| parsed.pack)
}

/// Parses SubRip content held in memory
pub fn parse_srt_str(content: &str, options: &ReadOptions) -> ParsedSrt {
    let mut parser = SrtParser::new(*options);
    for (idx, line) in content.lines().enumerate() {
        let line = if idx == 0 { line.strip_prefix(BOM).unwrap_or(line) } else { line };
        parser.feed(idx + 1, line);
    }
    parser.finish()
}

/// Generates SubRip content and writes it to `w`.
///
/// Sequence numbers are regenerated, lines end with CRLF. Writing stops at the
/// first error, which is returned.
pub fn write_srt_to<W: Write + ?Sized>(w: &mut W, pack: &SubsPack) -> Result<(), SubtitleError> {
    for (i, sub) in pack.subs.iter().enumerate() {
        write!(w, "{}{}", i + 1, NEWLINE)?;
        write!(
            w,
            "{} --> {}{}",
            format_time(sub.time_in_ms),
            format_time(sub.time_out_ms),
            NEWLINE
        )?;

        let last = sub.lines.len().saturating_sub(1);
        for (j, line) in sub.lines.iter().enumerate() {
            if j == 0 {
                if let Some(digit) = an_digit_from_pos(sub.pos) {
                    write!(w, "{{\\an{}}}", digit)?;
                }
                if !sub.color.is_empty() {
                    write!(w, "<font color=\"{}\">", sub.color)?;
                }
            }
            w.write_all(line.as_bytes())?;
            if j == last && !sub.color.is_empty() {
                w.write_all(b"</font>")?;
            }
            w.write_all(NEWLINE.as_bytes())?;
        }

        // Separator
        w.write_all(NEWLINE.as_bytes())?;
    }
    w.flush()?;
    Ok(())
}

/// Generates SubRip content into a string
pub fn srt_to_string(pack: &SubsPack) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = write_srt_to(&mut buf, pack);
    String::from_utf8_lossy(&buf).into_owned()
}
