use crate::counter::CounterState;
use crate::options::Separator;

/// A heading element of an already-rendered document.
pub trait HeadingNode {
    /// Heading level, 1 through 6.
    fn level(&self) -> u8;

    /// Put `prefix` in front of the node's existing content.
    fn prepend(&mut self, prefix: &str);
}

/// Number heading nodes given in document order.
///
/// Nodes whose level is out of scope are left untouched.
pub fn render_tree<N: HeadingNode>(nodes: &mut [N], state: &mut CounterState, separator: Separator) {
    for node in nodes.iter_mut() {
        if let Some(label) = state.advance(node.level(), separator) {
            node.prepend(&format!("{label} "));
        }
    }
}
