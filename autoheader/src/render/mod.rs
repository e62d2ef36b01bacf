//! The two drivers of [`CounterState::advance`](crate::counter::CounterState::advance):
//! one over raw Markdown lines, one over rendered heading nodes.

pub mod text;
pub mod tree;

pub use text::render_text;
pub use tree::{HeadingNode, render_tree};
