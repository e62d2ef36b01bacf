use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{AutoHeaderError, ErrorKind, RangeFault, Result};

/// Deepest heading level Markdown knows about.
pub const MAX_LEVEL: u8 = 6;

/// One bound of a `levels` setting, as written by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Integer(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// The `levels` setting: either a single deepest level or an inclusive range.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Range { start: Bound, finish: Bound },
    Max(Bound),
}

impl LevelSpec {
    pub fn max(level: i64) -> Self {
        LevelSpec::Max(Bound::Integer(level))
    }

    pub fn range(start: i64, finish: i64) -> Self {
        LevelSpec::Range {
            start: Bound::Integer(start),
            finish: Bound::Integer(finish),
        }
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        LevelSpec::max(MAX_LEVEL as i64)
    }
}

/// Which heading levels receive a label. Index 0 is level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelScope([bool; MAX_LEVEL as usize]);

impl LevelScope {
    pub fn all() -> Self {
        LevelScope([true; MAX_LEVEL as usize])
    }

    /// Levels `start..=finish`; callers are expected to have validated the bounds.
    fn between(start: u8, finish: u8) -> Self {
        let mut table = [false; MAX_LEVEL as usize];
        for level in start..=finish {
            table[usize::from(level - 1)] = true;
        }
        LevelScope(table)
    }

    pub fn contains(&self, level: u8) -> bool {
        (1..=MAX_LEVEL).contains(&level) && self.0[usize::from(level - 1)]
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=MAX_LEVEL).filter(|&level| self.contains(level))
    }
}

impl Default for LevelScope {
    fn default() -> Self {
        LevelScope::all()
    }
}

/// Resolve a `levels` setting into the per-level scope table.
pub fn resolve(spec: &LevelSpec) -> Result<LevelScope> {
    let (start, finish) = match spec {
        LevelSpec::Max(Bound::Other(_)) => {
            return Err(AutoHeaderError::new(
                ErrorKind::InvalidLevelType,
                "`levels` must be a number or a { start, finish } table",
            ));
        }
        LevelSpec::Max(max) => (1.0, numeric_bound(max, "levels")?),
        LevelSpec::Range { start, finish } => {
            (numeric_bound(start, "start")?, numeric_bound(finish, "finish")?)
        }
    };

    for (name, value) in [("start", start), ("finish", finish)] {
        if !(1.0..=f64::from(MAX_LEVEL)).contains(&value) || value.fract() != 0.0 {
            return Err(range_error(
                RangeFault::OutOfRange,
                format!("`{name}` is {value}, expected a heading level between 1 and {MAX_LEVEL}"),
            ));
        }
    }

    if start > finish {
        return Err(range_error(
            RangeFault::Inverted,
            format!("`start` ({start}) is greater than `finish` ({finish})"),
        ));
    }

    Ok(LevelScope::between(start as u8, finish as u8))
}

fn numeric_bound(bound: &Bound, name: &str) -> Result<f64> {
    match bound {
        Bound::Integer(n) => Ok(*n as f64),
        Bound::Float(n) if n.is_finite() => Ok(*n),
        _ => Err(range_error(
            RangeFault::NonNumericBound,
            format!("`{name}` must be a number"),
        )),
    }
}

fn range_error(fault: RangeFault, message: String) -> AutoHeaderError {
    AutoHeaderError::new(ErrorKind::InvalidLevelRange(fault), message)
}
