/*!
 * Writing the Sub Station Alpha v4 format (*.ssa).
 *
 * Every distinct (alignment, color) combination found in a pack becomes a
 * style; dialogue lines reference their style by its generated name.
 *
 * Example output:
 *
 * ```text
 * [Script Info]
 * ; This is a Sub Station Alpha v4 script.
 * ScriptType: v4.00
 *
 * [V4 Styles]
 * Format: Name, Fontname, Fontsize, PrimaryColour, ...
 * Style: 1,Arial,28,15724527,15724527,15724527,-2147483640,-1,0,1,1,2,2,30,30,30,0,0
 *
 * [Events]
 * Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
 * Dialogue: Marked=0,0:00:01.18,0:00:06.85,1,,0000,0000,0000,,First line\nSecond line
 * ```
 */

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::errors::SubtitleError;
use crate::formats::NEWLINE;
use crate::formats::colors::color_to_bgr;
use crate::subs_pack::SubsPack;
use crate::subtitle::{Pos, Subtitle};
use crate::{APP_NAME, HOME_PAGE};

const STYLES_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
    TertiaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, \
    MarginL, MarginR, MarginV, AlphaLevel, Encoding";

const EVENTS_FORMAT: &str = "Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Line break token inside dialogue text
const LINE_BREAK: &str = "\\n";

/// Derived style of a subtitle, used to deduplicate style definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    /// Sub Station Alpha alignment value
    pub alignment: u8,
    /// Color in blue-green-red byte order
    pub color: u32,
}

impl StyleKey {
    pub fn of(sub: &Subtitle) -> Self {
        StyleKey {
            alignment: alignment(sub.pos),
            color: color_to_bgr(&sub.color),
        }
    }
}

// @maps: Position to SSA alignment (unspecified is bottom)
fn alignment(pos: Pos) -> u8 {
    match pos {
        Pos::TopLeft => 5,
        Pos::Top => 6,
        Pos::TopRight => 7,
        Pos::Left => 9,
        Pos::Center => 10,
        Pos::Right => 11,
        Pos::BottomLeft => 1,
        Pos::Bottom | Pos::NotSpecified => 2,
        Pos::BottomRight => 3,
    }
}

/// Unique styles of a pack in first-seen order, and the style index of each subtitle
fn collect_styles(pack: &SubsPack) -> (Vec<StyleKey>, Vec<usize>) {
    let mut styles = Vec::new();
    let mut index_of: HashMap<StyleKey, usize> = HashMap::new();
    let refs = pack
        .subs
        .iter()
        .map(|sub| {
            let key = StyleKey::of(sub);
            *index_of.entry(key).or_insert_with(|| {
                styles.push(key);
                styles.len() - 1
            })
        })
        .collect();
    (styles, refs)
}

/// Formats milliseconds as `H:MM:SS.cc` (centiseconds truncated)
pub fn format_time(ms: i64) -> String {
    let ms = ms.max(0);
    format!(
        "{}:{:02}:{:02}.{:02}",
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        (ms % 1_000) / 10
    )
}

/// Generates Sub Station Alpha content and writes it to `w`.
///
/// Writing stops at the first error, which is returned.
pub fn write_ssa_to<W: Write + ?Sized>(w: &mut W, pack: &SubsPack) -> Result<(), SubtitleError> {
    let (styles, refs) = collect_styles(pack);

    // Header
    write!(w, "[Script Info]{NEWLINE}")?;
    write!(w, "; This is a Sub Station Alpha v4 script.{NEWLINE}")?;
    write!(
        w,
        "; Generated by {} {}, home page: {}{NEWLINE}",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        HOME_PAGE
    )?;
    write!(w, "Title: Generated by {}{NEWLINE}", APP_NAME)?;
    write!(w, "ScriptType: v4.00{NEWLINE}")?;
    write!(w, "Collisions: Normal{NEWLINE}")?;
    write!(w, "PlayDepth: 0{NEWLINE}{NEWLINE}")?;

    // Styles
    write!(w, "[V4 Styles]{NEWLINE}{STYLES_FORMAT}{NEWLINE}")?;
    for (i, style) in styles.iter().enumerate() {
        write!(
            w,
            "Style: {},Arial,28,{c},{c},{c},-2147483640,-1,0,1,1,2,{},30,30,30,0,0{NEWLINE}",
            i + 1,
            style.alignment,
            c = style.color
        )?;
    }
    write!(w, "{NEWLINE}")?;

    // Events
    write!(w, "[Events]{NEWLINE}{EVENTS_FORMAT}{NEWLINE}")?;
    for (sub, style_idx) in pack.subs.iter().zip(refs) {
        write!(
            w,
            "Dialogue: Marked=0,{},{},{},,0000,0000,0000,,{}{NEWLINE}",
            format_time(sub.time_in_ms),
            format_time(sub.time_out_ms),
            style_idx + 1,
            sub.lines.join(LINE_BREAK)
        )?;
    }

    w.flush()?;
    Ok(())
}

/// Reading Sub Station Alpha is not supported
pub fn read_ssa_from<R: BufRead>(_reader: R) -> Result<SubsPack, SubtitleError> {
    Err(SubtitleError::Unsupported(
        "reading Sub Station Alpha (*.ssa) files is not implemented".to_string(),
    ))
}
