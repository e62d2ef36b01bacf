use crate::counter::CounterState;
use crate::document::RenderedDocument;
use crate::error::{AutoHeaderError, ErrorKind, Reporter, Result};
use crate::options::{Options, RawOptions};
use crate::render::{self, HeadingNode};
use crate::signifier::{self, Signifier};

/// The numbering engine, constructed by the host with its options.
///
/// Holds no per-document state: every document gets its own [`CounterState`].
#[derive(Debug, Clone)]
pub struct AutoHeader {
    options: Options,
}

impl AutoHeader {
    pub fn new(options: Options) -> Self {
        AutoHeader { options }
    }

    /// Validate host options. `Ok(None)` means validation failed with debug
    /// off: the warning has been logged and documents should pass through.
    pub fn configure(raw: Option<&RawOptions>) -> Result<Option<Self>> {
        match Options::resolve(raw) {
            Ok(options) => Ok(Some(AutoHeader::new(options))),
            Err(error) => {
                let debug = raw.is_some_and(RawOptions::debug);
                Reporter::new(debug).report(error)?;
                Ok(None)
            }
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.options.debug)
    }

    /// Parse the signifier, seed fresh counters, and strip the signifier line.
    pub fn parse_signifier_and_seed(&self, text: &str) -> Result<(CounterState, String)> {
        let signifier = Signifier::parse(text, self.options.separator)?;
        let state = CounterState::seed(&signifier, self.options.scope)?;
        Ok((state, signifier::strip_signifier_line(text)))
    }

    pub fn render_text(&self, cleaned: &str, state: &mut CounterState) -> String {
        render::render_text(cleaned, state, self.options.separator)
    }

    pub fn render_tree<N: HeadingNode>(&self, nodes: &mut [N], state: &mut CounterState) {
        render::render_tree(nodes, state, self.options.separator);
    }

    /// Start a document; the returned run carries that document's hooks.
    pub fn document(&self) -> DocumentRun<'_> {
        DocumentRun {
            engine: self,
            stage: Stage::Pending,
        }
    }

    /// Label raw Markdown with the text renderer, whatever `sidebar` says.
    ///
    /// Falls back to the input, signifier line included, when a failure is
    /// swallowed.
    pub fn render_markdown(&self, text: &str) -> Result<String> {
        match self.parse_signifier_and_seed(text) {
            Ok((mut state, cleaned)) => Ok(self.render_text(&cleaned, &mut state)),
            Err(error) => {
                self.reporter().report(error)?;
                Ok(text.to_string())
            }
        }
    }

    /// Run both hooks around a Markdown to HTML conversion.
    pub fn render_html(&self, text: &str) -> Result<String> {
        let mut run = self.document();
        let markdown = run.before_each(text)?;
        let mut document = RenderedDocument::parse(&markdown);
        run.after_each(document.headings_mut())?;
        Ok(document.to_html())
    }
}

enum Stage {
    Pending,
    /// Seeded and waiting for the tree renderer.
    Seeded(CounterState),
    Done,
    Failed,
}

/// Hook lifecycle of a single document.
///
/// `before_each` runs on the raw Markdown, `after_each` on the converted
/// document. Which of the two numbers the headings depends on `sidebar`.
pub struct DocumentRun<'e> {
    engine: &'e AutoHeader,
    stage: Stage,
}

impl DocumentRun<'_> {
    /// Pre-render hook: returns the Markdown the host should convert.
    pub fn before_each(&mut self, text: &str) -> Result<String> {
        let (mut state, cleaned) = match self.engine.parse_signifier_and_seed(text) {
            Ok(seeded) => seeded,
            Err(error) => {
                self.stage = Stage::Failed;
                self.engine.reporter().report(error)?;
                return Ok(text.to_string());
            }
        };

        if self.engine.options.sidebar {
            self.stage = Stage::Done;
            Ok(self.engine.render_text(&cleaned, &mut state))
        } else {
            self.stage = Stage::Seeded(state);
            Ok(cleaned)
        }
    }

    /// Post-render hook: numbers the converted document's headings.
    pub fn after_each<N: HeadingNode>(&mut self, headings: &mut [N]) -> Result<()> {
        match std::mem::replace(&mut self.stage, Stage::Done) {
            Stage::Seeded(mut state) => {
                self.engine.render_tree(headings, &mut state);
                Ok(())
            }
            Stage::Done => Ok(()),
            Stage::Pending | Stage::Failed => {
                self.stage = Stage::Failed;
                self.engine.reporter().report(AutoHeaderError::new(
                    ErrorKind::ExitingError,
                    "post-render hook ran without a successfully prepared document",
                ))
            }
        }
    }
}
