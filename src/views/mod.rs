//! The two exportable views.
//!
//! Each view builds its subtree into a shared render tree and owns the
//! [`ExportManager`] that exports it.

pub mod cards;
pub mod chips;

pub use cards::VariantCardView;
pub use chips::TokenSequenceView;

use crate::draw::{FontDescriptor, color};
use crate::export::{CallSite, ExportAction, ExportConfig, ExportManager, ExportState, ExportTicket};
use crate::scene::{ElementRef, Node, NodeId, RenderTree, Role, Style};

/// A view that can be exported as a whole.
pub trait ExportableView {
    /// Call site whose rewrite policy applies to this view.
    const CALL_SITE: CallSite;

    /// The exportable element.
    fn element(&self) -> ElementRef;

    fn manager(&self) -> &ExportManager;

    /// Starts an export. Returns `None` while a previous export is still running.
    fn export(&self, config: ExportConfig, action: ExportAction) -> Option<ExportTicket> {
        self.manager()
            .request_export(self.element(), Self::CALL_SITE, config, action)
    }

    fn export_state(&self) -> ExportState {
        self.manager().state()
    }
}

/// Appends the small export button that sits in a panel header.
pub(crate) fn export_button(tree: &mut RenderTree, parent: NodeId) -> NodeId {
    tree.add_child(
        parent,
        Node::with_text(
            Role::Control,
            "Export",
            Style::block()
                .font_size(12.0)
                .font(FontDescriptor::default())
                .color(color::GRAY_700)
                .background(color::WHITE)
                .border(color::GRAY_200)
                .radius(4.0)
                .padding(8.0, 2.0),
        ),
    )
}

/// JSON string literal for `text`, as the views print base forms and variants.
pub(crate) fn quoted(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
