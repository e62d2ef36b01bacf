use std::sync::OnceLock;

use regex::Regex;

use crate::counter::CounterState;
use crate::options::Separator;

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{1,6}) (.+)$").expect("Invalid heading regex"))
}

/// An open fenced code block: its marker character and run length.
struct Fence {
    marker: u8,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Fence> {
        let rest = strip_indent(line)?;
        let marker = *rest.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = rest.bytes().take_while(|&b| b == marker).count();
        if len < 3 {
            return None;
        }
        // Backtick fences may not carry backticks in their info string.
        if marker == b'`' && rest[len..].contains('`') {
            return None;
        }
        Some(Fence { marker, len })
    }

    fn closes(&self, line: &str) -> bool {
        let Some(rest) = strip_indent(line) else {
            return false;
        };
        let len = rest.bytes().take_while(|&b| b == self.marker).count();
        len >= self.len && rest[len..].trim().is_empty()
    }
}

/// Up to three spaces of indentation; anything deeper is an indented code block.
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    (indent <= 3).then(|| &line[indent..])
}

/// Backslash-escape label characters that Markdown would read as inline syntax.
fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '&' | '~' | '|' | '!') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\n', '\r']);
    (body, &line[body.len()..])
}

/// Number the ATX headings of raw Markdown, top to bottom.
///
/// Lines inside fenced code blocks and lines that are not headings are copied
/// through untouched, line endings included.
pub fn render_text(text: &str, state: &mut CounterState, separator: Separator) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut fence: Option<Fence> = None;

    for line in text.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);

        if let Some(open) = &fence {
            if open.closes(body) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if let Some(opened) = Fence::open(body) {
            fence = Some(opened);
            out.push_str(line);
            continue;
        }

        let Some(caps) = heading_pattern().captures(body) else {
            out.push_str(line);
            continue;
        };
        let hashes = &caps[1];
        match state.advance(hashes.len() as u8, separator) {
            Some(label) => {
                log::trace!("labelled {:?} as {label}", &caps[2]);
                out.push_str(hashes);
                out.push(' ');
                out.push_str(&escape_label(&label));
                out.push(' ');
                out.push_str(&caps[2]);
                out.push_str(ending);
            }
            None => out.push_str(line),
        }
    }

    out
}
