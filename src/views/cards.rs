//! Variant-card view: one card per base form, listing its spellings.

use std::sync::Arc;

use super::{ExportableView, export_button, quoted};
use crate::draw::{Color, FontDescriptor, color};
use crate::export::{CallSite, ExportManager};
use crate::records::{Casing, MultiplicityGroup, VariantInfo};
use crate::scene::{self, ElementRef, Node, NodeId, RenderTree, Role, SharedRenderTree, Style};

pub struct VariantCardView {
    tree: SharedRenderTree,
    card: NodeId,
    variant_list: NodeId,
    manager: ExportManager,
}

impl VariantCardView {
    /// Builds one card as a new root of `tree`.
    pub fn build(tree: &SharedRenderTree, group: &MultiplicityGroup, manager: ExportManager) -> Self {
        let mut guard = scene::lock(tree);
        let tree_mut: &mut RenderTree = &mut guard;

        let card = tree_mut.insert(Node::new(
            Role::Container,
            Style::block()
                .font_size(16.0)
                .background(color::WHITE)
                .border(color::GRAY_200)
                .radius(8.0)
                .padding(16.0, 16.0)
                .gap(8.0),
        ));
        tree_mut.attach_root(card);

        let header = tree_mut.add_child(card, Node::new(Role::Container, Style::row(false).gap(12.0)));
        tree_mut.add_child(
            header,
            Node::with_text(
                Role::Text,
                quoted(&group.base_form),
                Style::block()
                    .font(FontDescriptor::monospace().with_weight("bold"))
                    .color(color::GRAY_900),
            ),
        );
        tree_mut.add_child(
            header,
            Node::with_text(
                Role::Text,
                format!("{} variants", group.count),
                Style::block().font_size(14.0).color(color::GRAY_500),
            ),
        );
        export_button(tree_mut, header);

        let variant_list = tree_mut.add_child(card, Node::new(Role::VariantList, Style::row(true).gap(8.0)));
        for variant in &group.variants {
            add_variant(tree_mut, variant_list, variant);
        }

        drop(guard);
        log::debug!(
            "Built variant card for {:?} with {} variant(s)",
            group.base_form,
            group.variants.len()
        );

        Self {
            tree: Arc::clone(tree),
            card,
            variant_list,
            manager,
        }
    }

    pub fn variant_list(&self) -> NodeId {
        self.variant_list
    }
}

impl ExportableView for VariantCardView {
    const CALL_SITE: CallSite = CallSite::Cards;

    fn element(&self) -> ElementRef {
        ElementRef::new(Arc::clone(&self.tree), self.card)
    }

    fn manager(&self) -> &ExportManager {
        &self.manager
    }
}

fn add_variant(tree: &mut RenderTree, list: NodeId, variant: &VariantInfo) -> NodeId {
    let chip = tree.add_child(
        list,
        Node::new(
            Role::Chip,
            Style::block()
                .font_size(14.0)
                .font(FontDescriptor::monospace())
                .background(color::GRAY_50)
                .border(color::GRAY_200)
                .radius(4.0)
                .padding(8.0, 4.0)
                .gap(4.0),
        ),
    );
    tree.add_child(chip, Node::with_text(Role::Text, quoted(&variant.token_str), Style::block()));

    let badges = tree.add_child(chip, Node::new(Role::Container, Style::row(false).gap(4.0)));
    if variant.has_space_prefix {
        add_badge(tree, badges, "space", color::badge::SPACE);
    }
    add_badge(tree, badges, variant.casing.as_str(), casing_badge(variant.casing));
    if variant.has_punctuation {
        add_badge(tree, badges, "punct", color::badge::PUNCT);
    }

    tree.add_child(
        chip,
        Node::with_text(
            Role::Text,
            format!("ID: {}", variant.token_id),
            Style::block().font_size(12.0).color(color::GRAY_400),
        ),
    );
    chip
}

fn casing_badge(casing: Casing) -> (Color, Color) {
    match casing {
        Casing::Upper => color::badge::UPPER,
        Casing::Title => color::badge::TITLE,
        Casing::Mixed => color::badge::MIXED,
        Casing::Lower | Casing::Other => color::badge::LOWER,
    }
}

fn add_badge(tree: &mut RenderTree, parent: NodeId, text: &str, (background, foreground): (Color, Color)) {
    tree.add_child(
        parent,
        Node::with_text(
            Role::Text,
            text,
            Style::block()
                .font_size(12.0)
                .color(foreground)
                .background(background)
                .radius(4.0)
                .padding(4.0, 0.0),
        ),
    );
}
