pub mod levels;

use std::fmt;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{AutoHeaderError, ErrorKind, Result};

pub use levels::{Bound, LevelScope, LevelSpec, MAX_LEVEL, resolve};

/// The character placed between, and after, the counters of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Separator(char);

impl Separator {
    pub const DECIMAL: Separator = Separator('.');
    pub const DASH: Separator = Separator('-');
    pub const BRACKET: Separator = Separator(')');

    /// Separator characters that have a name of their own.
    pub const KNOWN: [Separator; 3] = [Self::DECIMAL, Self::DASH, Self::BRACKET];

    /// Accepts `decimal`, `dash`, `bracket`, or any single literal character.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "decimal" => return Ok(Self::DECIMAL),
            "dash" => return Ok(Self::DASH),
            "bracket" => return Ok(Self::BRACKET),
            _ => {}
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(Separator(c)),
            _ => Err(AutoHeaderError::new(
                ErrorKind::MismatchedSeparator,
                format!("separator {raw:?} is neither a known name nor a single character"),
            )
            .with_note("use one of `decimal`, `dash`, `bracket`, or a single character")),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::DECIMAL
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A setting that keeps malformed values around so they can be reported.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Setting<T> {
    Value(T),
    Invalid(IgnoredAny),
}

/// Options as the host wrote them, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub separator: Option<Setting<String>>,
    pub levels: Option<LevelSpec>,
    pub sidebar: Option<Setting<bool>>,
    pub debug: Option<Setting<bool>>,
}

impl RawOptions {
    /// The debug toggle, readable even when the rest of the options are invalid.
    pub fn debug(&self) -> bool {
        matches!(self.debug, Some(Setting::Value(true)))
    }
}

/// Validated engine options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub separator: Separator,
    pub scope: LevelScope,
    /// `true` selects the text renderer before Markdown conversion,
    /// `false` the tree renderer afterwards.
    pub sidebar: bool,
    pub debug: bool,
}

impl Options {
    pub fn resolve(raw: Option<&RawOptions>) -> Result<Options> {
        let Some(raw) = raw else {
            return Err(AutoHeaderError::new(
                ErrorKind::ConfigurationNotSet,
                "no auto-header configuration was provided",
            )
            .with_note("add an `[auto_header]` table to the configuration"));
        };

        let separator = match &raw.separator {
            None => Separator::default(),
            Some(Setting::Value(s)) => Separator::parse(s)?,
            Some(Setting::Invalid(_)) => {
                return Err(AutoHeaderError::new(
                    ErrorKind::MismatchedSeparator,
                    "`separator` must be a string",
                ));
            }
        };

        let scope = match &raw.levels {
            None => LevelScope::all(),
            Some(spec) => resolve(spec)?,
        };

        let sidebar = match raw.sidebar {
            None => false,
            Some(Setting::Value(flag)) => flag,
            Some(Setting::Invalid(_)) => {
                return Err(AutoHeaderError::new(
                    ErrorKind::InvalidSidebarFlag,
                    "`sidebar` must be true or false",
                ));
            }
        };

        Ok(Options {
            separator,
            scope,
            sidebar,
            debug: raw.debug(),
        })
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_scope(mut self, scope: LevelScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_sidebar(mut self, sidebar: bool) -> Self {
        self.sidebar = sidebar;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
