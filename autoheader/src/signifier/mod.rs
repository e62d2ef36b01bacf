use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AutoHeaderError, ErrorKind, Result};
use crate::options::Separator;

/// The starting-counter declaration found at the top of a document.
///
/// Either `@autoHeader:2.1` or `<!-- autoHeader:2.1 -->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signifier {
    /// Raw tokens, trimmed, in level order. Not yet checked for homogeneity.
    pub tokens: Vec<String>,
    /// Byte span of the declaration in the original text.
    pub span: Range<usize>,
}

fn signifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:@autoHeader:([^\r\n]*)|<!--[ \t]*autoHeader:([^\r\n]*?)[ \t]*-->)")
            .expect("Invalid signifier regex")
    })
}

impl Signifier {
    /// Locate the signifier at the start of `text` and split it into tokens.
    ///
    /// Tokens are split on `separator`; a comma is always accepted as well.
    pub fn parse(text: &str, separator: Separator) -> Result<Signifier> {
        let offset = text.len() - text.trim_start().len();
        let body = &text[offset..];

        let Some(caps) = signifier_pattern().captures(body) else {
            let first_line = body.lines().next().unwrap_or("").len();
            return Err(AutoHeaderError::new(
                ErrorKind::MissingSignifier,
                "document does not start with an autoHeader signifier",
            )
            .with_span(offset..offset + first_line)
            .with_note("start the document with `@autoHeader:1` or `<!-- autoHeader:1 -->`"));
        };

        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let span = offset + whole.start..offset + whole.end;
        let raw = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        let sep = separator.as_char();
        let mut tokens: Vec<String> = raw
            .split(|c| c == sep || c == ',')
            .map(|token| token.trim().to_string())
            .collect();
        if tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }

        for token in &tokens {
            let foreign = Separator::KNOWN
                .iter()
                .map(|s| s.as_char())
                .find(|&c| c != sep && token.contains(c));
            if let Some(foreign) = foreign {
                return Err(AutoHeaderError::new(
                    ErrorKind::MismatchedSeparator,
                    format!(
                        "signifier token {token:?} contains '{foreign}' but the configured separator is '{sep}'"
                    ),
                )
                .with_span(span));
            }
        }

        Ok(Signifier { tokens, span })
    }
}

/// Drop the signifier's line: the first line of the whitespace-trimmed text.
pub fn strip_signifier_line(text: &str) -> String {
    let body = text.trim_start();
    match body.find('\n') {
        Some(end) => body[end + 1..].to_string(),
        None => String::new(),
    }
}
