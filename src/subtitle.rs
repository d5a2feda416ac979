use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::ExecError;

// @module: Subtitle model and per-subtitle transformations

/// Screen position of a subtitle.
///
/// The default value is [`Pos::NotSpecified`], which players render at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pos {
    #[default]
    NotSpecified,
    BottomLeft,
    Bottom,
    BottomRight,
    Left,
    Center,
    Right,
    TopLeft,
    Top,
    TopRight,
}

impl Pos {
    /// All explicit positions, in grid order from bottom-left to top-right
    pub const ALL: [Pos; 9] = [
        Pos::BottomLeft,
        Pos::Bottom,
        Pos::BottomRight,
        Pos::Left,
        Pos::Center,
        Pos::Right,
        Pos::TopLeft,
        Pos::Top,
        Pos::TopRight,
    ];

    // @returns: Short token used by option sets (e.g. "TL", "B")
    pub fn token(&self) -> &'static str {
        match self {
            Pos::NotSpecified => "",
            Pos::BottomLeft => "BL",
            Pos::Bottom => "B",
            Pos::BottomRight => "BR",
            Pos::Left => "L",
            Pos::Center => "C",
            Pos::Right => "R",
            Pos::TopLeft => "TL",
            Pos::Top => "T",
            Pos::TopRight => "TR",
        }
    }

    /// Resolve a position token: one of BL, B, BR, L, C, R, TL, T, TR
    pub fn from_token(token: &str) -> Option<Pos> {
        Pos::ALL.iter().copied().find(|p| p.token() == token)
    }
}

impl FromStr for Pos {
    type Err = ExecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pos::from_token(s).ok_or_else(|| ExecError::InvalidPos(s.to_string()))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pos::NotSpecified => write!(f, "unspecified"),
            other => write!(f, "{}", other.token()),
        }
    }
}

/// Pattern used to remove HTML formatting
pub(crate) static HTML_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex")
});

/// Pattern used to remove a leading control such as {\anX}, {\aY} or {\pos(x,y)}
static CONTROL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\\[^}]*\}").expect("Invalid control regex")
});

/// One displayable subtitle, whose text may be broken into multiple lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subtitle {
    // @field: Appearance timestamp in ms
    pub time_in_ms: i64,

    // @field: Disappearance timestamp in ms
    pub time_out_ms: i64,

    // @field: Text lines, top to bottom
    pub lines: Vec<String>,

    // @field: Where to display it
    pub pos: Pos,

    // @field: Color name or RRGGBB hex ('#' optional), empty if none
    pub color: String,
}

impl Subtitle {
    /// Creates a subtitle without position or color
    pub fn new(time_in_ms: i64, time_out_ms: i64, lines: Vec<String>) -> Self {
        Subtitle {
            time_in_ms,
            time_out_ms,
            lines,
            ..Default::default()
        }
    }

    /// Duration for which the subtitle is visible
    pub fn display_duration(&self) -> i64 {
        self.time_out_ms.saturating_sub(self.time_in_ms)
    }

    /// Shifts both timestamps by `delta_ms`; results saturate at the i64 range
    pub fn shift(&mut self, delta_ms: i64) {
        self.time_in_ms = self.time_in_ms.saturating_add(delta_ms);
        self.time_out_ms = self.time_out_ms.saturating_add(delta_ms);
    }

    /// Scales the appearance timestamp, keeping the display duration unchanged.
    pub fn scale(&mut self, factor: f64) {
        let duration = self.display_duration();
        // Float to int casts saturate, NaN becomes 0
        self.time_in_ms = (self.time_in_ms as f64 * factor) as i64;
        self.time_out_ms = self.time_in_ms.saturating_add(duration);
    }

    /// Lengthens (or shortens) the display duration around its midpoint.
    ///
    /// The appearance time never goes below zero; when it is clamped the
    /// disappearance time is derived from the clamped value so the new
    /// duration is kept.
    pub fn lengthen(&mut self, factor: f64) {
        let duration = self.display_duration();
        let new_duration = (duration as f64 * factor) as i64;
        let center = self.time_in_ms.saturating_add(duration / 2);
        self.time_in_ms = center.saturating_sub(new_duration / 2).max(0);
        self.time_out_ms = self.time_in_ms.saturating_add(new_duration);
    }

    /// Removes hearing impaired lines such as "[PHONE RINGING]" or "(phone ringing)".
    ///
    /// HTML formatting is ignored for the check only, so "<i>[SIGHS]</i>" is
    /// removed too. Returns true if any line was removed.
    pub fn remove_hi(&mut self) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !is_hearing_impaired(line));
        self.lines.len() != before
    }

    /// Removes HTML formatting from all lines and clears the color.
    ///
    /// Returns true if formatting or a color was present.
    pub fn remove_html(&mut self) -> bool {
        let mut removed = false;
        for line in self.lines.iter_mut() {
            let stripped = HTML_REGEX.replace_all(line.as_str(), "").into_owned();
            if stripped != *line {
                *line = stripped;
                removed = true;
            }
        }

        // Color comes from a <font> tag
        removed |= !self.color.is_empty();
        self.color.clear();
        removed
    }

    /// Removes a leading control block such as {\an8} from every line and
    /// resets the position. Returns true if a control or position was present.
    pub fn remove_control(&mut self) -> bool {
        let mut removed = false;
        for line in self.lines.iter_mut() {
            let stripped = CONTROL_REGEX.replace(line.as_str(), "").into_owned();
            if stripped != *line {
                *line = stripped;
                removed = true;
            }
        }

        // Position comes from a control
        removed |= self.pos != Pos::NotSpecified;
        self.pos = Pos::NotSpecified;
        removed
    }
}

// @checks: Line is a bracketed or parenthesized sound description
fn is_hearing_impaired(line: &str) -> bool {
    let plain = HTML_REGEX.replace_all(line, "");
    let (Some(first), Some(last)) = (plain.chars().next(), plain.chars().last()) else {
        return false;
    };
    (first == '[' && last == ']') || (first == '(' && last == ')')
}
