/*!
 * Option driven executor performing subtitle transformations.
 *
 * It is the heart of the command line tool: the caller supplies a flat set of
 * options and the input packs, the executor validates the combination and
 * applies the requested transformations in a fixed order:
 *
 * concatenate, merge, lengthen, remove controls, remove hearing impaired,
 * remove HTML, set position, set color, scale, shift, split, stats.
 *
 * Whether an operation runs is decided by the presence of its option, not by
 * its value.
 */

use log::{debug, info};
use std::path::PathBuf;

use crate::errors::ExecError;
use crate::formats::subrip::parse_time;
use crate::subs_pack::{SubsPack, SubsStats};
use crate::subtitle::Pos;

/// The requested operations and their parameters
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Output destination of the primary pack
    pub out: Option<PathBuf>,
    /// Output destination of the split-off pack
    pub out2: Option<PathBuf>,
    /// Concatenate the 2nd input, whose part starts at this time (e.g. "00:59:00,123")
    pub concat: Option<String>,
    /// Merge the 2nd input at the top into a dual subtitle
    pub merge: bool,
    /// Split at this time (e.g. "00:59:00,123")
    pub split_at: Option<String>,
    /// Shift timestamps by this many milliseconds (+/-)
    pub shift_by_ms: Option<i64>,
    /// Scale timestamps by this factor (e.g. 1.001)
    pub scale: Option<f64>,
    /// Lengthen display durations by this factor (e.g. 1.1 for +10%)
    pub lengthen: Option<f64>,
    pub remove_html: bool,
    pub remove_ctrl: bool,
    pub remove_hi: bool,
    /// Position token: BL, B, BR, L, C, R, TL, T, TR
    pub pos: Option<String>,
    /// Color name or #rrggbb
    pub color: Option<String>,
    pub stats: bool,
}

impl ExecOptions {
    // @checks: Any option that changes the subtitles
    pub fn is_mutating(&self) -> bool {
        self.concat.is_some()
            || self.merge
            || self.split_at.is_some()
            || self.shift_by_ms.is_some()
            || self.scale.is_some()
            || self.lengthen.is_some()
            || self.remove_html
            || self.remove_ctrl
            || self.remove_hi
            || self.pos.is_some()
            || self.color.is_some()
    }
}

/// Result of a successful execution
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// The transformed primary pack
    pub primary: SubsPack,
    /// The second part when splitting was requested
    pub secondary: Option<SubsPack>,
    /// Statistics when requested (computed last, on the primary pack)
    pub stats: Option<SubsStats>,
    /// Whether any transformation ran
    pub modified: bool,
}

// @struct: Validated parameters, resolved before anything is modified
struct Plan {
    concat_at_ms: Option<i64>,
    split_at_ms: Option<i64>,
    pos: Option<Pos>,
}

/// Executes the transformations described by [`ExecOptions`]
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecOptions,
}

impl Executor {
    pub fn new(options: ExecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Validates the option set against the supplied packs without running anything
    fn plan(&self, has_primary: bool, has_secondary: bool) -> Result<Plan, ExecError> {
        let o = &self.options;

        if !has_primary {
            return Err(ExecError::MissingInput);
        }
        if !has_secondary && (o.concat.is_some() || o.merge) {
            return Err(ExecError::MissingSecondInput);
        }
        if o.concat.is_some() && o.merge {
            return Err(ExecError::ConflictingOptions(
                "concat and merge cannot both use the 2nd input".to_string(),
            ));
        }

        let concat_at_ms = o
            .concat
            .as_deref()
            .map(|v| parse_time(v).ok_or_else(|| invalid_time("concat", v)))
            .transpose()?;
        let split_at_ms = o
            .split_at
            .as_deref()
            .map(|v| parse_time(v).ok_or_else(|| invalid_time("splitAt", v)))
            .transpose()?;
        let pos = o.pos.as_deref().map(str::parse::<Pos>).transpose()?;

        if split_at_ms.is_some() && o.out2.is_none() {
            return Err(ExecError::MissingSecondOutput);
        }
        if o.is_mutating() && o.out.is_none() && !o.stats {
            return Err(ExecError::MissingOutput);
        }

        Ok(Plan {
            concat_at_ms,
            split_at_ms,
            pos,
        })
    }

    /// Performs the requested transformations.
    ///
    /// `secondary` is consumed by concatenation or merging. All preconditions
    /// are checked before the first transformation runs.
    pub fn execute(
        &self,
        primary: Option<SubsPack>,
        secondary: Option<SubsPack>,
    ) -> Result<ExecOutcome, ExecError> {
        let plan = self.plan(primary.is_some(), secondary.is_some())?;
        let (Some(mut sp1), mut sp2) = (primary, secondary) else {
            return Err(ExecError::MissingInput);
        };
        let o = &self.options;
        let mut modified = false;

        if let Some(at) = plan.concat_at_ms {
            if let Some(second) = sp2.take() {
                info!("Concatenating {} subtitles starting at {}ms", second.len(), at);
                sp1.concatenate(second, at);
                modified = true;
            }
        }

        if o.merge {
            if let Some(second) = sp2.take() {
                info!("Merging {} subtitles to the top", second.len());
                sp1.merge(second);
                modified = true;
            }
        }

        if let Some(factor) = o.lengthen {
            debug!("Lengthening display durations by {}", factor);
            sp1.lengthen(factor);
            modified = true;
        }

        if o.remove_ctrl {
            debug!("Removing controls");
            sp1.remove_control();
            modified = true;
        }

        if o.remove_hi {
            debug!("Removing hearing impaired lines");
            sp1.remove_hi();
            modified = true;
        }

        if o.remove_html {
            debug!("Removing HTML formatting");
            sp1.remove_html();
            modified = true;
        }

        if let Some(pos) = plan.pos {
            debug!("Setting position to {}", pos);
            sp1.set_pos(pos);
            modified = true;
        }

        if let Some(color) = o.color.as_deref() {
            debug!("Setting color to {}", color);
            sp1.set_color(color);
            modified = true;
        }

        if let Some(factor) = o.scale {
            debug!("Scaling timestamps by {}", factor);
            sp1.scale(factor);
            modified = true;
        }

        if let Some(delta) = o.shift_by_ms {
            debug!("Shifting timestamps by {}ms", delta);
            sp1.shift(delta);
            modified = true;
        }

        let mut split_off = None;
        if let Some(at) = plan.split_at_ms {
            let second = sp1.split(at);
            info!("Split at {}ms: {} + {} subtitles", at, sp1.len(), second.len());
            split_off = Some(second);
            modified = true;
        }

        let stats = o.stats.then(|| sp1.stats());

        Ok(ExecOutcome {
            primary: sp1,
            secondary: split_off,
            stats,
            modified,
        })
    }
}

fn invalid_time(option: &'static str, value: &str) -> ExecError {
    ExecError::InvalidTime {
        option,
        value: value.to_string(),
    }
}
