//! Both renderers walk the same document; everything they share lives here.

pub mod export;
pub mod interactive;
pub mod panel;
pub mod style;

pub use export::{render_export, ExportRenderer};
pub use interactive::{
    render_interactive, CanvasView, DropTarget, ElementBody, ElementView, InteractiveRenderer, PaletteItem, ViewTree,
};
pub use panel::{render_panel, FieldInput, FieldValue, PanelAction, PanelField, PanelForm, PropertyPanel};
pub use style::Layout;

use crate::element::ElementId;
use crate::error::RenderError;

/// The chain of groups currently being rendered. Guards against documents
/// whose child lists loop back on themselves. Without a `limit` nesting is
/// unbounded; an acyclic document can never nest deeper than its element
/// count.
#[derive(Debug)]
pub(crate) struct Ancestry {
    path: Vec<ElementId>,
    limit: Option<usize>,
}

impl Ancestry {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            path: Vec::new(),
            limit,
        }
    }

    pub(crate) fn enter(&mut self, id: &ElementId) -> Result<(), RenderError> {
        if self.path.contains(id) {
            return Err(RenderError::Cycle { id: id.clone() });
        }
        if let Some(limit) = self.limit.filter(|limit| self.path.len() >= *limit) {
            return Err(RenderError::DepthExceeded { id: id.clone(), limit });
        }
        self.path.push(id.clone());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

/// Width of one cell in a row group with `count` cells
pub fn row_cell_width(count: usize) -> String {
    if count == 0 {
        return "100%".to_string();
    }
    format!("{}%", 100.0 / count as f64)
}
