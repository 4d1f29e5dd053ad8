//! Box layout for render-tree fragments.
//!
//! Every node is laid out at the origin first and then translated into place
//! by its parent, so a node's size never depends on where it ends up. Widths
//! flow downwards: a node without a width of its own gets its parent's
//! content width as the limit for wrapping rows.

use super::style::Display;
use super::tree::{NodeId, RenderTree};
use crate::draw::FontDescriptor;

/// Measures text runs. Implemented over Pango for real output and by a
/// fixed-advance measurer in tests.
pub trait TextMeasure {
    /// Returns the logical `(width, height)` of `text` in CSS pixels.
    fn measure(&self, text: &str, font: &FontDescriptor, size_px: f64) -> (f64, f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutBox {
    pub node: NodeId,
    /// Border box of the node.
    pub rect: Rect,
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.rect.x += dx;
        self.rect.y += dy;
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// Finds the box laid out for `node`.
    pub fn find(&self, node: NodeId) -> Option<&LayoutBox> {
        if self.node == node {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node))
    }
}

/// Lays out the subtree rooted at `root` with its top-left corner at the origin.
pub fn layout(tree: &RenderTree, root: NodeId, measure: &dyn TextMeasure) -> Option<LayoutBox> {
    tree.get(root)?;
    Some(layout_node(tree, root, measure, None))
}

fn layout_node(
    tree: &RenderTree,
    id: NodeId,
    measure: &dyn TextMeasure,
    available: Option<f64>,
) -> LayoutBox {
    let Some(node) = tree.get(id) else {
        return LayoutBox {
            node: id,
            rect: Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 },
            children: Vec::new(),
        };
    };
    let style = &node.style;
    let inset_x = style.padding_x + style.border_width;
    let inset_y = style.padding_y + style.border_width;
    let content_limit = style
        .width
        .or(available)
        .map(|width| (width - 2.0 * inset_x).max(0.0));

    let mut children: Vec<LayoutBox> = node
        .children()
        .iter()
        .map(|child| layout_node(tree, *child, measure, content_limit))
        .collect();

    // Text renders on leaves only.
    let (content_width, content_height) = if children.is_empty() {
        match node.text.as_deref() {
            Some(text) if !text.is_empty() => {
                let size = tree.resolved_font_size(id);
                let font = tree.resolved_font(id);
                measure.measure(text, &font, size)
            }
            _ => (0.0, 0.0),
        }
    } else {
        match style.display {
            Display::Block => stack(&mut children, style.gap),
            Display::Row { wrap } => flow(&mut children, style.gap, content_limit.filter(|_| wrap)),
            Display::Grid { columns } => grid(&mut children, style.gap, columns.max(1) as usize),
        }
    };

    for child in &mut children {
        child.translate(inset_x, inset_y);
    }

    let width = style
        .width
        .unwrap_or(content_width + 2.0 * inset_x);
    let height = content_height + 2.0 * inset_y;

    LayoutBox {
        node: id,
        rect: Rect { x: 0.0, y: 0.0, width, height },
        children,
    }
}

fn stack(children: &mut [LayoutBox], gap: f64) -> (f64, f64) {
    let mut y = 0.0;
    let mut width: f64 = 0.0;
    for (index, child) in children.iter_mut().enumerate() {
        if index > 0 {
            y += gap;
        }
        child.translate(0.0, y);
        y += child.rect.height;
        width = width.max(child.rect.width);
    }
    (width, y)
}

fn flow(children: &mut [LayoutBox], gap: f64, limit: Option<f64>) -> (f64, f64) {
    let mut x = 0.0;
    let mut line_top = 0.0;
    let mut line_height: f64 = 0.0;
    let mut width: f64 = 0.0;

    for child in children.iter_mut() {
        let child_width = child.rect.width;
        if x > 0.0 {
            let wraps = limit.is_some_and(|limit| x + gap + child_width > limit);
            if wraps {
                line_top += line_height + gap;
                line_height = 0.0;
                x = 0.0;
            } else {
                x += gap;
            }
        }
        child.translate(x, line_top);
        x += child_width;
        width = width.max(x);
        line_height = line_height.max(child.rect.height);
    }

    (width, line_top + line_height)
}

fn grid(children: &mut [LayoutBox], gap: f64, columns: usize) -> (f64, f64) {
    let cell_width = children
        .iter()
        .map(|child| child.rect.width)
        .fold(0.0, f64::max);

    let mut y = 0.0;
    let mut used_columns = 0;
    for (row_index, row) in children.chunks_mut(columns).enumerate() {
        if row_index > 0 {
            y += gap;
        }
        let row_height = row.iter().map(|child| child.rect.height).fold(0.0, f64::max);
        for (column, child) in row.iter_mut().enumerate() {
            child.translate(column as f64 * (cell_width + gap), y);
        }
        used_columns = used_columns.max(row.len());
        y += row_height;
    }

    let width = if used_columns == 0 {
        0.0
    } else {
        used_columns as f64 * cell_width + (used_columns - 1) as f64 * gap
    };
    (width, y)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scene::style::Style;
    use crate::scene::tree::{Node, Role};

    /// Every glyph advances `size * 0.5` and lines are `size * 1.25` tall.
    pub(crate) struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn measure(&self, text: &str, _font: &FontDescriptor, size_px: f64) -> (f64, f64) {
            (text.chars().count() as f64 * size_px * 0.5, size_px * 1.25)
        }
    }

    fn chips(display: Display, width: Option<f64>, count: usize) -> (RenderTree, NodeId) {
        let mut tree = RenderTree::new();
        let mut style = Style::block().font_size(16.0).gap(4.0);
        style.display = display;
        style.width = width;
        let root = tree.insert(Node::new(Role::Container, style));
        tree.attach_root(root);
        for _ in 0..count {
            // 4 glyphs * 8px + 2 * 5px padding = 42px wide, 20 + 2 * 2 = 24px tall
            tree.add_child(root, Node::with_text(Role::Chip, "abcd", Style::block().padding(5.0, 2.0)));
        }
        (tree, root)
    }

    #[test]
    fn text_leaf_adds_padding_and_border() {
        let mut tree = RenderTree::new();
        let id = tree.insert(Node::with_text(
            Role::Chip,
            "abcd",
            Style::block().font_size(16.0).padding(5.0, 2.0).border(crate::draw::color::BLACK),
        ));
        let laid = layout(&tree, id, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 32.0 + 10.0 + 2.0);
        assert_eq!(laid.rect.height, 20.0 + 4.0 + 2.0);
    }

    #[test]
    fn unwrapped_row_uses_natural_width() {
        let (tree, root) = chips(Display::Row { wrap: true }, None, 5);
        let laid = layout(&tree, root, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 5.0 * 42.0 + 4.0 * 4.0);
        assert_eq!(laid.rect.height, 24.0);
    }

    #[test]
    fn row_wraps_at_forced_width() {
        let (tree, root) = chips(Display::Row { wrap: true }, Some(100.0), 5);
        let laid = layout(&tree, root, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 100.0);
        // Two chips per line (42 + 4 + 42 = 88), three lines.
        assert_eq!(laid.rect.height, 3.0 * 24.0 + 2.0 * 4.0);
        assert_eq!(laid.children[2].rect.x, 0.0);
        assert_eq!(laid.children[2].rect.y, 28.0);
    }

    #[test]
    fn nested_row_wraps_at_parent_content_width() {
        let (mut tree, row) = chips(Display::Row { wrap: true }, None, 5);
        let mut panel_style = Style::block().padding(10.0, 10.0);
        panel_style.width = Some(120.0);
        let panel = tree.insert(Node::new(Role::Container, panel_style));
        tree.attach_root(panel);
        tree.append_child(panel, row);

        let laid = layout(&tree, panel, &FixedAdvance).unwrap();
        let row_box = laid.find(row).unwrap();
        // 100px of content: two chips per line, three lines.
        assert_eq!(row_box.rect.width, 88.0);
        assert_eq!(row_box.rect.height, 3.0 * 24.0 + 2.0 * 4.0);
        for chip in &row_box.children {
            assert!(chip.rect.x + chip.rect.width <= laid.rect.width - 10.0);
        }
    }

    #[test]
    fn unconstrained_parent_leaves_nested_row_on_one_line() {
        let (mut tree, row) = chips(Display::Row { wrap: true }, None, 5);
        let panel = tree.insert(Node::new(Role::Container, Style::block().padding(10.0, 10.0)));
        tree.attach_root(panel);
        tree.append_child(panel, row);

        let laid = layout(&tree, panel, &FixedAdvance).unwrap();
        assert_eq!(laid.find(row).unwrap().rect.height, 24.0);
        assert_eq!(laid.rect.width, 5.0 * 42.0 + 4.0 * 4.0 + 20.0);
    }

    #[test]
    fn grid_places_fixed_columns() {
        let (tree, root) = chips(Display::Grid { columns: 8 }, None, 10);
        let laid = layout(&tree, root, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 8.0 * 42.0 + 7.0 * 4.0);
        assert_eq!(laid.rect.height, 2.0 * 24.0 + 4.0);
        assert_eq!(laid.children[8].rect.x, 0.0);
        assert_eq!(laid.children[9].rect.x, 46.0);
    }

    #[test]
    fn block_stacks_children() {
        let (tree, root) = chips(Display::Block, None, 3);
        let laid = layout(&tree, root, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 42.0);
        assert_eq!(laid.rect.height, 3.0 * 24.0 + 2.0 * 4.0);
        assert!(laid.find(tree.get(root).unwrap().children()[1]).is_some());
    }
}
