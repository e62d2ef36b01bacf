use std::ops::Range;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd, html};

use crate::render::HeadingNode;

/// A heading element of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingElement {
    /// Heading level: 1 = `#` through 6 = `######`.
    pub level: u8,
    /// Plain-text content, including any prepended label.
    pub content: String,
    /// Byte span of the heading in the Markdown source.
    pub span: Range<usize>,
    prefix: Option<String>,
    event_index: usize,
}

impl HeadingElement {
    /// Text prepended by the renderer, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl HeadingNode for HeadingElement {
    fn level(&self) -> u8 {
        self.level
    }

    fn prepend(&mut self, prefix: &str) {
        self.content.insert_str(0, prefix);
        self.prefix = Some(match self.prefix.take() {
            Some(existing) => format!("{prefix}{existing}"),
            None => prefix.to_string(),
        });
    }
}

/// Markdown converted to an event tree, with its headings exposed in document order.
pub struct RenderedDocument<'a> {
    events: Vec<(Event<'a>, Range<usize>)>,
    headings: Vec<HeadingElement>,
}

impl<'a> RenderedDocument<'a> {
    pub fn parse(source: &'a str) -> Self {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
        let events: Vec<(Event<'a>, Range<usize>)> =
            CmarkParser::new_ext(source, options).into_offset_iter().collect();

        let mut headings = Vec::new();
        let mut i = 0;
        while i < events.len() {
            if let (Event::Start(Tag::Heading { level, .. }), range) = &events[i] {
                let event_index = i;
                let span = range.clone();
                let level = heading_level_to_u8(level);
                i += 1;
                let content = collect_heading_text(&events, &mut i);
                headings.push(HeadingElement {
                    level,
                    content,
                    span,
                    prefix: None,
                    event_index,
                });
            } else {
                i += 1;
            }
        }

        RenderedDocument { events, headings }
    }

    pub fn headings(&self) -> &[HeadingElement] {
        &self.headings
    }

    pub fn headings_mut(&mut self) -> &mut [HeadingElement] {
        &mut self.headings
    }

    /// Render to HTML with every heading prefix injected as leading text.
    pub fn to_html(&self) -> String {
        let mut prefixes = self
            .headings
            .iter()
            .filter_map(|h| h.prefix.as_deref().map(|p| (h.event_index, p)))
            .peekable();

        let mut events = Vec::with_capacity(self.events.len() + self.headings.len());
        for (index, (event, _)) in self.events.iter().enumerate() {
            events.push(event.clone());
            if let Some((_, prefix)) = prefixes.next_if(|&(at, _)| at == index) {
                events.push(Event::Text(CowStr::from(prefix.to_string())));
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }
}

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect heading text (text and code events until End(Heading)).
fn collect_heading_text(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> String {
    let mut text = String::new();
    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::Heading(_)) => {
                *i += 1;
                break;
            }
            Event::Text(s) | Event::Code(s) => text.push_str(s),
            _ => {}
        }
        *i += 1;
    }
    text
}
