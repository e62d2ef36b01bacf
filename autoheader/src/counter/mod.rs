pub mod numeral;

use std::fmt;

use crate::error::{AutoHeaderError, ErrorKind, Result};
use crate::options::{LevelScope, MAX_LEVEL, Separator};
use crate::signifier::Signifier;

/// How counter values are written in labels. Fixed per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Numeric,
    Alphabetic { lowercase: bool },
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Numeric => write!(f, "numeric"),
            Mode::Alphabetic { .. } => write!(f, "alphabetic"),
        }
    }
}

/// Counter for a single heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterEntry {
    /// Value `current` snaps back to when a shallower heading is seen.
    pub reset: i64,
    /// Live value at the current position in the document.
    pub current: i64,
}

/// Per-document numbering state: one entry per heading level.
///
/// Seeded once from the signifier, advanced once per heading, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    entries: [CounterEntry; MAX_LEVEL as usize],
    mode: Mode,
    scope: LevelScope,
}

/// Largest value a signifier token may seed.
pub const MAX_SEED: i64 = u32::MAX as i64;

#[derive(Clone, Copy, PartialEq)]
enum TokenKind {
    Digits,
    Letters,
}

fn classify(token: &str) -> Option<TokenKind> {
    if token.is_empty() {
        None
    } else if token.bytes().all(|b| b.is_ascii_digit()) {
        Some(TokenKind::Digits)
    } else if token.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(TokenKind::Letters)
    } else {
        None
    }
}

impl CounterState {
    pub fn seed(signifier: &Signifier, scope: LevelScope) -> Result<CounterState> {
        let malformed = |message: String| {
            AutoHeaderError::new(ErrorKind::MalformedSignifier, message)
                .with_span(signifier.span.clone())
        };

        let tokens: Vec<&str> = signifier
            .tokens
            .iter()
            .take(MAX_LEVEL as usize)
            .map(String::as_str)
            .collect();

        let mut kind = None;
        for token in &tokens {
            let Some(this) = classify(token) else {
                return Err(malformed(format!(
                    "signifier token {token:?} is neither all digits nor all letters"
                )));
            };
            if kind.is_some_and(|k| k != this) {
                return Err(malformed(
                    "signifier mixes numeric and alphabetic tokens".to_string(),
                )
                .with_note("a document is numbered either with digits or with letters"));
            }
            kind = Some(this);
        }

        let mode = match kind {
            Some(TokenKind::Letters) => Mode::Alphabetic {
                lowercase: tokens
                    .iter()
                    .all(|t| t.bytes().all(|b| b.is_ascii_lowercase())),
            },
            _ => Mode::Numeric,
        };

        let mut entries = [CounterEntry::default(); MAX_LEVEL as usize];
        for (index, entry) in entries.iter_mut().enumerate() {
            let value = match tokens.get(index) {
                None => 1,
                Some(token) => {
                    let parsed = match mode {
                        Mode::Numeric => token.parse::<i64>().ok(),
                        Mode::Alphabetic { .. } => numeral::letters_to_value(token),
                    };
                    parsed.filter(|value| *value <= MAX_SEED).ok_or_else(|| {
                        malformed(format!("signifier token {token:?} is too large"))
                            .with_note(format!("seed values are limited to {MAX_SEED}"))
                    })?
                }
            };
            entry.current = value - 1;
            entry.reset = entry.current;
        }

        log::debug!(
            "seeded {mode} counters from {:?}",
            entries.iter().map(|e| e.current + 1).collect::<Vec<_>>()
        );

        Ok(CounterState {
            entries,
            mode,
            scope,
        })
    }

    /// Step the counters for a heading at `level` and compose its label.
    ///
    /// Every deeper level snaps back to its reset baseline, which is then
    /// cleared to 0, so a seeded baseline is consumed by the first subtree
    /// that reaches it. Returns `None` for levels outside the scope.
    pub fn advance(&mut self, level: u8, separator: Separator) -> Option<String> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return None;
        }
        let index = usize::from(level - 1);

        for deeper in self.entries[index + 1..].iter_mut().rev() {
            deeper.current = deeper.reset;
            deeper.reset = 0;
        }
        let entry = &mut self.entries[index];
        entry.current = entry.current.saturating_add(1);

        if !self.scope.contains(level) {
            return None;
        }
        Some(self.label(level, separator))
    }

    fn label(&self, level: u8, separator: Separator) -> String {
        let mut label = String::new();
        for entry in &self.entries[..usize::from(level)] {
            match self.mode {
                Mode::Numeric => label.push_str(&entry.current.to_string()),
                Mode::Alphabetic { lowercase } => {
                    label.push_str(&numeral::value_to_letters(entry.current, lowercase))
                }
            }
            label.push(separator.as_char());
        }
        label
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scope(&self) -> LevelScope {
        self.scope
    }

    pub fn entry(&self, level: u8) -> Option<&CounterEntry> {
        level
            .checked_sub(1)
            .and_then(|index| self.entries.get(usize::from(index)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::{LevelSpec, resolve};

    fn signifier(tokens: &[&str]) -> Signifier {
        Signifier {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            span: 0..0,
        }
    }

    fn seeded(tokens: &[&str]) -> CounterState {
        CounterState::seed(&signifier(tokens), LevelScope::all()).expect("seed")
    }

    fn labels(state: &mut CounterState, levels: &[u8], separator: Separator) -> Vec<Option<String>> {
        levels
            .iter()
            .map(|&level| state.advance(level, separator))
            .collect()
    }

    fn some(labels: &[&str]) -> Vec<Option<String>> {
        labels.iter().map(|l| Some(l.to_string())).collect()
    }

    #[test]
    fn pads_numeric_seed_with_ones() {
        let state = seeded(&["2"]);
        let starts: Vec<i64> = (1..=6).map(|l| state.entry(l).unwrap().current + 1).collect();
        assert_eq!(starts, vec![2, 1, 1, 1, 1, 1]);
        assert_eq!(state.mode(), Mode::Numeric);
    }

    #[test]
    fn pads_alphabetic_seed_with_a() {
        let state = seeded(&["C"]);
        let starts: Vec<i64> = (1..=6).map(|l| state.entry(l).unwrap().current + 1).collect();
        assert_eq!(starts, vec![3, 1, 1, 1, 1, 1]);
        assert_eq!(state.mode(), Mode::Alphabetic { lowercase: false });
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let state = seeded(&["1", "2", "3", "4", "5", "6", "7", "x"]);
        assert_eq!(state.entry(6).unwrap().current, 5);
    }

    #[test]
    fn reset_equals_current_after_seeding() {
        let state = seeded(&["3", "4"]);
        assert_eq!(state.entry(2), Some(&CounterEntry { reset: 3, current: 3 }));
    }

    #[test]
    fn mixed_tokens_are_malformed() {
        let err = CounterState::seed(&signifier(&["1", "A"]), LevelScope::all()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSignifier);
    }

    #[test]
    fn empty_and_symbol_tokens_are_malformed() {
        for tokens in [&["1", ""][..], &["1a"][..], &["#"][..]] {
            let err = CounterState::seed(&signifier(tokens), LevelScope::all()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedSignifier, "{tokens:?}");
        }
    }

    #[test]
    fn huge_number_is_malformed() {
        let err = CounterState::seed(&signifier(&["99999999999999999999"]), LevelScope::all())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSignifier);
    }

    #[test]
    fn seed_beyond_limit_is_malformed() {
        let err = CounterState::seed(&signifier(&["9223372036854775807"]), LevelScope::all())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSignifier);

        let err = CounterState::seed(&signifier(&["4294967296"]), LevelScope::all()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSignifier);
    }

    #[test]
    fn largest_seed_still_counts() {
        let mut state = seeded(&["4294967295"]);
        assert_eq!(
            labels(&mut state, &[1, 1], Separator::DECIMAL),
            some(&["4294967295.", "4294967296."])
        );
    }

    #[test]
    fn outline_numbering() {
        let mut state = seeded(&["1", "1"]);
        assert_eq!(
            labels(&mut state, &[1, 2, 2, 1, 2], Separator::DASH),
            some(&["1-", "1-1-", "1-2-", "2-", "2-1-"])
        );
    }

    #[test]
    fn deeper_levels_resume_from_baseline() {
        let mut state = seeded(&["1", "1", "1"]);
        assert_eq!(
            labels(&mut state, &[1, 2, 3, 1, 2], Separator::DASH),
            some(&["1-", "1-1-", "1-1-1-", "2-", "2-1-"])
        );
    }

    #[test]
    fn seeded_baseline_is_consumed_by_the_first_subtree() {
        let mut state = seeded(&["1", "3"]);
        assert_eq!(
            labels(&mut state, &[1, 2, 2, 1, 2, 1, 2, 2], Separator::DECIMAL),
            some(&["1.", "1.3.", "1.4.", "2.", "2.1.", "3.", "3.1.", "3.2."])
        );
    }

    #[test]
    fn first_shallow_heading_restores_seeded_baseline() {
        let mut state = seeded(&["2", "5", "7"]);
        assert_eq!(
            labels(&mut state, &[3, 1, 2, 3, 1, 2], Separator::DECIMAL),
            some(&["1.4.7.", "2.", "2.5.", "2.5.1.", "3.", "3.1."])
        );
    }

    #[test]
    fn intermediate_heading_clears_a_deeper_seed() {
        let mut state = seeded(&["4", "2", "5"]);
        assert_eq!(
            labels(&mut state, &[1, 2, 3], Separator::DECIMAL),
            some(&["4.", "4.2.", "4.2.1."])
        );

        let mut state = seeded(&["4", "2", "5"]);
        assert_eq!(
            labels(&mut state, &[1, 3], Separator::DECIMAL),
            some(&["4.", "4.1.5."])
        );
    }

    #[test]
    fn skipped_level_shows_zero() {
        let mut state = seeded(&["1"]);
        assert_eq!(
            labels(&mut state, &[1, 3], Separator::DECIMAL),
            some(&["1.", "1.0.1."])
        );
    }

    #[test]
    fn out_of_scope_levels_count_but_stay_unlabeled() {
        let scope = resolve(&LevelSpec::range(2, 3)).unwrap();
        let mut state = CounterState::seed(&signifier(&["1"]), scope).unwrap();
        assert_eq!(
            labels(&mut state, &[1, 2, 3, 4, 4, 1, 2], Separator::DECIMAL),
            vec![
                None,
                Some("1.1.".to_string()),
                Some("1.1.1.".to_string()),
                None,
                None,
                None,
                Some("2.1.".to_string()),
            ]
        );
    }

    #[test]
    fn alphabetic_labels_keep_case() {
        let mut upper = seeded(&["A", "B"]);
        assert_eq!(
            labels(&mut upper, &[1, 2, 2, 1, 2], Separator::BRACKET),
            some(&["A)", "A)B)", "A)C)", "B)", "B)A)"])
        );

        let mut lower = seeded(&["y"]);
        assert_eq!(
            labels(&mut lower, &[1, 1, 1], Separator::DECIMAL),
            some(&["y.", "z.", "aa."])
        );
    }

    #[test]
    fn invalid_levels_do_not_touch_state() {
        let mut state = seeded(&["1"]);
        let before = state.clone();
        assert_eq!(state.advance(0, Separator::DECIMAL), None);
        assert_eq!(state.advance(7, Separator::DECIMAL), None);
        assert_eq!(state, before);
    }
}
