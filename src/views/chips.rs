//! Token-sequence view: one coloured chip per token.

use std::sync::Arc;

use super::{ExportableView, export_button};
use crate::draw::{FontDescriptor, color};
use crate::export::{CallSite, ExportManager};
use crate::records::{TokenInfo, TokenizeResponse};
use crate::scene::{self, ElementRef, Node, NodeId, RenderTree, Role, SharedRenderTree, Style};

const CHIP_FONT_SIZE_PX: f64 = 14.0;
const ID_FONT_SIZE_PX: f64 = 12.0;

pub struct TokenSequenceView {
    tree: SharedRenderTree,
    page: NodeId,
    panel: NodeId,
    chips: Vec<NodeId>,
    manager: ExportManager,
}

impl TokenSequenceView {
    /// Builds the view as a new root of `tree`.
    ///
    /// The page shows a stats line followed by the exportable panel, which
    /// holds a header with the export button and the chip row.
    pub fn build(
        tree: &SharedRenderTree,
        response: &TokenizeResponse,
        show_ids: bool,
        manager: ExportManager,
    ) -> Self {
        let mut guard = scene::lock(tree);
        let tree_mut: &mut RenderTree = &mut guard;

        let page = tree_mut.insert(Node::new(
            Role::Container,
            Style::block().font_size(16.0).gap(16.0),
        ));
        tree_mut.attach_root(page);
        tree_mut.add_child(
            page,
            Node::with_text(
                Role::Text,
                format!(
                    "Tokens: {}  Characters: {}  Ratio: {:.2} tokens/char",
                    response.token_count,
                    response.char_count,
                    response.tokens_per_char()
                ),
                Style::block().font_size(14.0).color(color::GRAY_500),
            ),
        );

        let panel = tree_mut.add_child(
            page,
            Node::new(
                Role::Container,
                Style::block()
                    .background(color::WHITE)
                    .border(color::GRAY_200)
                    .radius(8.0)
                    .padding(16.0, 16.0)
                    .gap(8.0),
            ),
        );
        let header = tree_mut.add_child(panel, Node::new(Role::Container, Style::row(false).gap(8.0)));
        let title = if show_ids { "Token IDs" } else { "Tokens" };
        tree_mut.add_child(
            header,
            Node::with_text(
                Role::Text,
                title,
                Style::block()
                    .font_size(14.0)
                    .font(FontDescriptor::default().with_weight("medium"))
                    .color(color::GRAY_700),
            ),
        );
        export_button(tree_mut, header);

        let row = tree_mut.add_child(
            panel,
            Node::new(Role::Container, Style::row(true).gap(if show_ids { 4.0 } else { 2.0 })),
        );
        let chips = response
            .tokens
            .iter()
            .enumerate()
            .map(|(index, token)| add_chip(tree_mut, row, token, index, show_ids))
            .collect();

        drop(guard);
        log::debug!(
            "Built token sequence view with {} chip(s)",
            response.tokens.len()
        );

        Self {
            tree: Arc::clone(tree),
            page,
            panel,
            chips,
            manager,
        }
    }

    /// Root of the page this view occupies.
    pub fn page(&self) -> NodeId {
        self.page
    }

    pub fn chips(&self) -> &[NodeId] {
        &self.chips
    }
}

impl ExportableView for TokenSequenceView {
    const CALL_SITE: CallSite = CallSite::Chips;

    fn element(&self) -> ElementRef {
        ElementRef::new(Arc::clone(&self.tree), self.panel)
    }

    fn manager(&self) -> &ExportManager {
        &self.manager
    }
}

fn add_chip(tree: &mut RenderTree, row: NodeId, token: &TokenInfo, index: usize, show_id: bool) -> NodeId {
    let colors = color::chip_colors(index);
    let style = Style::block()
        .font_size(CHIP_FONT_SIZE_PX)
        .font(FontDescriptor::monospace())
        .color(colors.text)
        .background(colors.background)
        .border(colors.border)
        .radius(4.0)
        .padding(4.0, 2.0);

    if !show_id {
        return tree.add_child(row, Node::with_text(Role::Chip, token.display_str(), style));
    }

    let chip = tree.add_child(
        row,
        Node::new(
            Role::Chip,
            Style {
                display: scene::Display::Row { wrap: false },
                gap: 4.0,
                ..style
            },
        ),
    );
    tree.add_child(chip, Node::with_text(Role::Text, token.display_str(), Style::block()));
    tree.add_child(
        chip,
        Node::with_text(
            Role::Text,
            token.id.to_string(),
            Style::block()
                .font_size(ID_FONT_SIZE_PX)
                .color(colors.text.with_alpha(0.6)),
        ),
    );
    chip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportConfig, ExportSettings, LayoutMode, StylePolicy};
    use crate::scene::layout::{LayoutBox, layout, tests::FixedAdvance};

    fn response(words: &[&str]) -> TokenizeResponse {
        TokenizeResponse {
            tokens: words
                .iter()
                .enumerate()
                .map(|(i, word)| TokenInfo {
                    id: 100 + i as u32,
                    token_str: word.to_string(),
                    token_bytes_hex: String::new(),
                    byte_length: word.len() as u32,
                    start: None,
                    end: None,
                })
                .collect(),
            token_count: words.len() as u32,
            char_count: words.iter().map(|w| w.len() as u32).sum(),
        }
    }

    fn build(words: &[&str], show_ids: bool) -> (SharedRenderTree, TokenSequenceView) {
        let tree = scene::shared(RenderTree::new());
        let view = TokenSequenceView::build(
            &tree,
            &response(words),
            show_ids,
            ExportManager::with_closed_channel_for_test(),
        );
        (tree, view)
    }

    #[test]
    fn one_chip_per_token_with_visible_whitespace() {
        let (tree, view) = build(&["Hello", " world", "\n"], false);
        let tree = scene::lock(&tree);
        assert_eq!(view.chips().len(), 3);
        let texts: Vec<_> = view
            .chips()
            .iter()
            .map(|id| tree.get(*id).unwrap().text.clone().unwrap())
            .collect();
        assert_eq!(texts, vec!["Hello", "·world", "↵"]);
        assert_eq!(tree.roots(), &[view.page()]);
    }

    #[test]
    fn palette_cycles_every_ten_chips() {
        let words = ["t"; 11];
        let (tree, view) = build(&words, false);
        let tree = scene::lock(&tree);
        let first = tree.get(view.chips()[0]).unwrap().style.background;
        let eleventh = tree.get(view.chips()[10]).unwrap().style.background;
        let second = tree.get(view.chips()[1]).unwrap().style.background;
        assert_eq!(first, eleventh);
        assert_ne!(first, second);
    }

    #[test]
    fn ids_render_as_faded_trailing_text() {
        let (tree, view) = build(&["Hi"], true);
        let tree = scene::lock(&tree);
        let chip = tree.get(view.chips()[0]).unwrap();
        assert!(!chip.is_text_bearing());
        let id = chip.children()[1];
        assert_eq!(tree.get(id).unwrap().text.as_deref(), Some("100"));
        assert_eq!(tree.resolved_font_size(id), 12.0);
        assert_eq!(tree.resolved_color(id).a, 0.6);
        assert_eq!(tree.resolved_font(chip.children()[0]), FontDescriptor::monospace());
    }

    #[test]
    fn exported_element_is_the_panel_with_its_button() {
        let (tree, view) = build(&["a", "b"], false);
        let element = view.element();
        let tree = scene::lock(&tree);
        assert!(tree.is_attached(element.id));
        assert!(
            tree.descendants(element.id)
                .iter()
                .any(|id| tree.get(*id).unwrap().role == Role::Control)
        );
        assert!(view.chips().iter().all(|chip| tree.ancestors(*chip).contains(&element.id)));
    }

    fn chip_boxes<'a>(tree: &RenderTree, laid: &'a LayoutBox, out: &mut Vec<&'a LayoutBox>) {
        if tree.get(laid.node).is_some_and(|node| node.role == Role::Chip) {
            out.push(laid);
        }
        for child in &laid.children {
            chip_boxes(tree, child, out);
        }
    }

    #[test]
    fn fixed_export_wraps_long_sequences_inside_reference_width() {
        let words: Vec<String> = (0..60).map(|i| format!("tok{:03}", i)).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let (shared, view) = build(&words, false);
        let mut tree = scene::lock(&shared);

        let clone = tree.deep_clone(view.element().id).unwrap();
        StylePolicy::for_call_site(CallSite::Chips).apply(&mut tree, clone, &ExportConfig::new(14));
        let laid = layout(&tree, clone, &FixedAdvance).unwrap();
        assert_eq!(laid.rect.width, 720.0);

        let mut chips = Vec::new();
        chip_boxes(&tree, &laid, &mut chips);
        assert_eq!(chips.len(), 60);
        for chip in &chips {
            assert!(chip.rect.x + chip.rect.width <= laid.rect.width);
        }
        let mut lines: Vec<f64> = chips.iter().map(|chip| chip.rect.y).collect();
        lines.dedup();
        assert!(lines.len() > 1);
        assert!(laid.rect.height > chips[0].rect.height * lines.len() as f64);
    }

    #[test]
    fn tight_export_keeps_one_line() {
        let (shared, view) = build(&["a", "b", "c"], false);
        let mut tree = scene::lock(&shared);
        let clone = tree.deep_clone(view.element().id).unwrap();
        let config = ExportConfig::new(14).with_layout(LayoutMode::Tight);
        StylePolicy::for_call_site(CallSite::Chips).apply(&mut tree, clone, &config);
        let laid = layout(&tree, clone, &FixedAdvance).unwrap();

        let mut chips = Vec::new();
        chip_boxes(&tree, &laid, &mut chips);
        assert!(chips.iter().all(|chip| chip.rect.y == chips[0].rect.y));
        assert!(laid.rect.width < 720.0);
    }

    #[tokio::test]
    async fn fresh_view_is_idle() {
        let tree = scene::shared(RenderTree::new());
        let manager = ExportManager::new(&tokio::runtime::Handle::current(), ExportSettings::default());
        let view = TokenSequenceView::build(&tree, &response(&["a"]), false, manager);
        assert_eq!(view.export_state(), crate::export::ExportState::Idle);
        assert_eq!(TokenSequenceView::CALL_SITE, CallSite::Chips);
    }
}
