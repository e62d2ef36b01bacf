pub mod counter;
pub mod document;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod signifier;

pub use counter::{CounterEntry, CounterState, Mode};
pub use document::{HeadingElement, RenderedDocument};
pub use error::{AutoHeaderError, ErrorKind, RangeFault, Reporter};
pub use options::{LevelScope, LevelSpec, Options, RawOptions, Separator};
pub use pipeline::{AutoHeader, DocumentRun};
pub use render::HeadingNode;
pub use signifier::Signifier;
