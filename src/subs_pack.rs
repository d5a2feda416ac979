use log::debug;
use std::fmt;

use crate::subtitle::{Pos, Subtitle};

// @module: Subtitle pack and pack-level transformations

/// An ordered collection of subtitles representing one subtitle track.
///
/// Operations that can reorder entries (loading, [`SubsPack::concatenate`],
/// [`SubsPack::merge`]) leave the pack sorted by appearance time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsPack {
    /// Subtitle entries, sorted by `time_in_ms`
    pub subs: Vec<Subtitle>,
}

impl SubsPack {
    /// Create an empty pack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pack from entries, sorting them by appearance time
    pub fn from_subs(subs: Vec<Subtitle>) -> Self {
        let mut pack = SubsPack { subs };
        pack.sort();
        pack
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Sorts the subtitles by appearance time. The sort is stable.
    pub fn sort(&mut self) {
        self.subs.sort_by_key(|s| s.time_in_ms);
    }

    /// Shifts all subtitles by `delta_ms`
    pub fn shift(&mut self, delta_ms: i64) {
        for s in self.subs.iter_mut() {
            s.shift(delta_ms);
        }
    }

    /// Scales the appearance timestamps; display durations are not changed.
    ///
    /// Useful to fix subtitles made for a video with a different frame rate.
    pub fn scale(&mut self, factor: f64) {
        for s in self.subs.iter_mut() {
            s.scale(factor);
        }
    }

    /// Lengthens the display duration of all subtitles by `factor`
    pub fn lengthen(&mut self, factor: f64) {
        for s in self.subs.iter_mut() {
            s.lengthen(factor);
        }
    }

    pub fn set_pos(&mut self, pos: Pos) {
        for s in self.subs.iter_mut() {
            s.pos = pos;
        }
    }

    pub fn set_color(&mut self, color: &str) {
        for s in self.subs.iter_mut() {
            s.color = color.to_string();
        }
    }

    /// Removes hearing impaired lines; subtitles left without lines are dropped.
    pub fn remove_hi(&mut self) {
        let before = self.subs.len();
        self.subs.retain_mut(|s| {
            s.remove_hi();
            !s.lines.is_empty()
        });
        debug!("Removed {} hearing impaired subtitle(s)", before - self.subs.len());
    }

    /// Removes HTML formatting (and colors) from all subtitles
    pub fn remove_html(&mut self) {
        for s in self.subs.iter_mut() {
            s.remove_html();
        }
    }

    /// Removes controls such as {\anX}, {\aY} or {\pos(x,y)} (and positions)
    pub fn remove_control(&mut self) {
        for s in self.subs.iter_mut() {
            s.remove_control();
        }
    }

    /// Appends the second part of a movie's subtitles to this pack.
    ///
    /// The entries of `second` are shifted by `second_part_start_ms` (usually the
    /// length of the first part), moved into this pack, and the result is
    /// re-sorted since the two parts may overlap. `second` is consumed.
    pub fn concatenate(&mut self, mut second: SubsPack, second_part_start_ms: i64) {
        second.shift(second_part_start_ms);
        self.subs.append(&mut second.subs);
        self.sort();
    }

    /// Merges another pack into this one to create a dual subtitle.
    ///
    /// Our entries end up at the bottom (unspecified position), the entries of
    /// `other` at the top. `other` is consumed.
    pub fn merge(&mut self, mut other: SubsPack) {
        self.set_pos(Pos::NotSpecified);
        other.set_pos(Pos::Top);
        self.subs.append(&mut other.subs);
        self.sort();
    }

    /// Splits this pack at `at_ms`.
    ///
    /// Subtitles appearing before `at_ms` stay here; the rest are moved into the
    /// returned pack and shifted by `-at_ms`, so its timestamps are relative to
    /// the split point.
    pub fn split(&mut self, at_ms: i64) -> SubsPack {
        let idx = self.subs.partition_point(|s| s.time_in_ms < at_ms);
        let mut second = SubsPack {
            subs: self.subs.split_off(idx),
        };
        second.shift(-at_ms);
        second
    }

    /// Analyzes the pack and returns statistics.
    ///
    /// Counting formatting requires removing it: controls, HTML and hearing
    /// impaired lines are stripped from the subtitles. Clone the pack first
    /// to keep the original.
    pub fn stats(&mut self) -> SubsStats {
        let mut ss = SubsStats {
            subs: self.subs.len(),
            ..Default::default()
        };

        for s in self.subs.iter_mut() {
            ss.total_disp_dur_ms = ss.total_disp_dur_ms.saturating_add(s.display_duration());
            ss.lines += s.lines.len();

            if s.remove_control() {
                ss.controls += 1;
            }
            if s.remove_html() {
                ss.htmls += 1;
            }

            for line in &s.lines {
                ss.chars += line.chars().count();
                for word in line.split_whitespace() {
                    ss.words += 1;
                    ss.chars_no_space += word.chars().count();
                }
            }

            if s.remove_hi() {
                ss.his += 1;
            }
        }

        if let Some(last) = self.subs.last() {
            if last.time_out_ms != 0 {
                ss.sub_visib_ratio = ss.total_disp_dur_ms as f64 / last.time_out_ms as f64;
            }
        }

        ss.avg_lines_per_sub = ratio(ss.lines, ss.subs);
        ss.avg_chars_per_line = ratio(ss.chars_no_space, ss.lines);
        ss.avg_words_per_line = ratio(ss.words, ss.lines);
        ss.avg_chars_per_word = ratio(ss.chars_no_space, ss.words);
        if ss.chars_no_space > 0 {
            ss.avg_disp_dur_per_non_space_char_ms = ss.total_disp_dur_ms / ss.chars_no_space as i64;
        }
        ss
    }
}

fn ratio(a: usize, b: usize) -> f64 {
    if b == 0 { 0.0 } else { a as f64 / b as f64 }
}

/// Statistics gathered from a [`SubsPack`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsStats {
    /// Total number of subtitles
    pub subs: usize,
    pub lines: usize,
    pub avg_lines_per_sub: f64,
    /// Characters, spaces included
    pub chars: usize,
    pub chars_no_space: usize,
    /// Non-space characters per line
    pub avg_chars_per_line: f64,
    pub words: usize,
    pub avg_words_per_line: f64,
    pub avg_chars_per_word: f64,
    /// Total subtitle display time
    pub total_disp_dur_ms: i64,
    /// Display time compared to the end of the last subtitle
    pub sub_visib_ratio: f64,
    pub avg_disp_dur_per_non_space_char_ms: i64,
    /// Subtitles that had HTML formatting or a color
    pub htmls: usize,
    /// Subtitles that had controls or a position
    pub controls: usize,
    /// Subtitles that had hearing impaired lines
    pub his: usize,
}

impl fmt::Display for SubsStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut row = |name: &str, value: String| writeln!(f, "{:<29}: {}", name, value);
        row("Total # of subtitles", self.subs.to_string())?;
        row("Lines", self.lines.to_string())?;
        row("Avg lines per sub", format!("{:.4}", self.avg_lines_per_sub))?;
        row("Chars (with spaces)", self.chars.to_string())?;
        row("Chars (without spaces)", self.chars_no_space.to_string())?;
        row("Avg chars (no space) per line", format!("{:.4}", self.avg_chars_per_line))?;
        row("Words", self.words.to_string())?;
        row("Avg words per line", format!("{:.4}", self.avg_words_per_line))?;
        row("Avg chars per word", format!("{:.4}", self.avg_chars_per_word))?;
        row("Total subtitle display time", format_duration(self.total_disp_dur_ms))?;
        row(
            "Subtitle visible ratio",
            format!("{:.2}% (compared to total length)", self.sub_visib_ratio * 100.0),
        )?;
        row(
            "Avg. display duration",
            format!("{}ms per 1 non-space char", self.avg_disp_dur_per_non_space_char_ms),
        )?;
        row("Subs with HTML formatting", self.htmls.to_string())?;
        row("Subs with controls", self.controls.to_string())?;
        row("Subs with hearing impaired", self.his.to_string())
    }
}

// @formats: Duration as H:MM:SS.mmm
fn format_duration(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.abs();
    format!(
        "{}{}:{:02}:{:02}.{:03}",
        sign,
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000
    )
}
