//! The editable canvas as a view tree. Hosts either walk the tree directly or
//! take its HTML; click and drop resolution work on the tree, so they agree
//! with whatever was drawn.

use super::style::{escape_html, escape_text, style_attr, Layout, Resolved};
use super::Ancestry;
use crate::document::Document;
use crate::element::{Element, ElementId, ElementKind};
use crate::error::RenderError;
use serde::Serialize;
use std::fmt::Write as _;

pub type StyleDecl = (&'static str, String);

/// One draggable entry of the component palette
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteItem {
    pub kind: ElementKind,
    pub label: &'static str,
    pub icon: &'static str,
}

impl PaletteItem {
    pub fn all() -> Vec<PaletteItem> {
        ElementKind::ALL
            .into_iter()
            .map(|kind| PaletteItem {
                kind,
                label: kind.display_name(),
                icon: kind.icon(),
            })
            .collect()
    }
}

/// Where a drop lands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum DropTarget {
    Root,
    Group(ElementId),
}

impl DropTarget {
    pub fn parent_id(&self) -> Option<&ElementId> {
        match self {
            DropTarget::Root => None,
            DropTarget::Group(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementBody {
    Text {
        content: String,
        style: Vec<StyleDecl>,
    },
    /// Drawn like a button but never navigates
    Button {
        label: String,
        link: String,
        style: Vec<StyleDecl>,
    },
    Image {
        src: String,
        alt: String,
        align: &'static str,
        style: Vec<StyleDecl>,
    },
    Group {
        layout: Layout,
        style: Vec<StyleDecl>,
        children: Vec<ElementView>,
        /// Shown instead of children when there are none
        placeholder: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub id: ElementId,
    pub kind: ElementKind,
    pub selected: bool,
    /// Declarations on the outer frame (sizing)
    pub frame: Vec<StyleDecl>,
    pub body: ElementBody,
}

impl ElementView {
    pub fn children(&self) -> &[ElementView] {
        match &self.body {
            ElementBody::Group { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.body, ElementBody::Group { .. })
    }

    fn find(&self, id: &ElementId) -> Option<&ElementView> {
        if &self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CanvasView {
    Empty { placeholder: String },
    Elements { roots: Vec<ElementView> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTree {
    pub palette: Vec<PaletteItem>,
    pub canvas: CanvasView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveRenderer {
    pub max_depth: Option<usize>,
    pub empty_canvas_message: String,
    pub empty_group_message: String,
}

impl Default for InteractiveRenderer {
    fn default() -> Self {
        Self {
            max_depth: None,
            empty_canvas_message: "Drag components here to get started".to_string(),
            empty_group_message: "Drop components here".to_string(),
        }
    }
}

pub fn render_interactive(document: &Document, selected: Option<&ElementId>) -> Result<ViewTree, RenderError> {
    InteractiveRenderer::default().render(document, selected)
}

impl InteractiveRenderer {
    pub fn render(&self, document: &Document, selected: Option<&ElementId>) -> Result<ViewTree, RenderError> {
        let roots = document.roots();
        let canvas = if roots.is_empty() {
            CanvasView::Empty {
                placeholder: self.empty_canvas_message.clone(),
            }
        } else {
            let mut ancestry = Ancestry::new(self.max_depth);
            let roots = roots
                .into_iter()
                .map(|root| self.view(document, root, selected, &mut ancestry))
                .collect::<Result<Vec<_>, _>>()?;
            CanvasView::Elements { roots }
        };

        Ok(ViewTree {
            palette: PaletteItem::all(),
            canvas,
        })
    }

    fn view(
        &self,
        document: &Document,
        element: &Element,
        selected: Option<&ElementId>,
        ancestry: &mut Ancestry,
    ) -> Result<ElementView, RenderError> {
        ancestry.enter(&element.id)?;
        let props = Resolved::new(element);

        let (frame, body) = match element.kind {
            ElementKind::Text => (
                vec![("width", props.css("width")), ("height", props.css("height"))],
                ElementBody::Text {
                    content: props.text("content").to_string(),
                    style: vec![
                        ("font-size", props.css("fontSize")),
                        ("font-family", props.css("fontFamily")),
                        ("color", props.css("color")),
                        ("text-align", props.keyword("textAlign").to_string()),
                        ("font-weight", props.font_weight().to_string()),
                        ("font-style", props.font_style().to_string()),
                        ("margin", "0".to_string()),
                    ],
                },
            ),
            ElementKind::Button => (
                vec![("text-align", "center".to_string())],
                ElementBody::Button {
                    label: props.text("text").to_string(),
                    link: props.url("link"),
                    style: vec![
                        ("display", "inline-block".to_string()),
                        ("width", props.css("width")),
                        ("height", props.css("height")),
                        ("background-color", props.css("backgroundColor")),
                        ("color", props.css("textColor")),
                        ("padding", props.css("padding")),
                        ("border-radius", props.css("borderRadius")),
                        ("text-decoration", "none".to_string()),
                        ("cursor", "default".to_string()),
                    ],
                },
            ),
            ElementKind::Image => {
                let align = props.keyword("textAlign");
                (
                    vec![("text-align", align.to_string())],
                    ElementBody::Image {
                        src: props.url("src"),
                        alt: props.text("alt").to_string(),
                        align,
                        style: vec![
                            ("width", props.css("width")),
                            ("height", props.css("height")),
                            ("max-width", "100%".to_string()),
                        ],
                    },
                )
            }
            ElementKind::Group => {
                let layout = props.layout();
                let children = document
                    .children_of(element)
                    .map(|child| self.view(document, child, selected, ancestry))
                    .collect::<Result<Vec<_>, _>>()?;
                let placeholder = children
                    .is_empty()
                    .then(|| self.empty_group_message.clone());
                (
                    Vec::new(),
                    ElementBody::Group {
                        layout,
                        style: vec![
                            ("display", "flex".to_string()),
                            ("flex-direction", layout.as_str().to_string()),
                            ("gap", "10px".to_string()),
                            ("background-color", props.css("backgroundColor")),
                            ("padding", props.css("padding")),
                            ("border", props.css("border")),
                            ("text-align", props.keyword("textAlign").to_string()),
                        ],
                        children,
                        placeholder,
                    },
                )
            }
        };
        ancestry.leave();

        Ok(ElementView {
            id: element.id.clone(),
            kind: element.kind,
            selected: selected == Some(&element.id),
            frame,
            body,
        })
    }
}

impl ViewTree {
    pub fn roots(&self) -> &[ElementView] {
        match &self.canvas {
            CanvasView::Empty { .. } => &[],
            CanvasView::Elements { roots } => roots,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.canvas, CanvasView::Empty { .. })
    }

    pub fn find(&self, id: &ElementId) -> Option<&ElementView> {
        self.roots().iter().find_map(|root| root.find(id))
    }

    pub fn selected(&self) -> Option<&ElementView> {
        fn walk(views: &[ElementView]) -> Option<&ElementView> {
            views
                .iter()
                .find_map(|view| if view.selected { Some(view) } else { walk(view.children()) })
        }
        walk(self.roots())
    }

    /// Resolve a click. `path` lists the element ids under the pointer,
    /// outermost first; the innermost one that is drawn wins.
    pub fn click(&self, path: &[ElementId]) -> Option<ElementId> {
        path.iter().rev().find(|id| self.find(id).is_some()).cloned()
    }

    /// Resolve a drop. The innermost group under the pointer receives it,
    /// anything else lands at the top level.
    pub fn drop_target(&self, path: &[ElementId]) -> DropTarget {
        path.iter()
            .rev()
            .find(|id| self.find(id).map(ElementView::is_group).unwrap_or(false))
            .map(|id| DropTarget::Group(id.clone()))
            .unwrap_or(DropTarget::Root)
    }

    /// Markup for the editing surface. Styles are inline; the host supplies
    /// only behaviour, keyed on `data-*` attributes.
    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div class="component-palette">"#);
        for item in &self.palette {
            let _ = write!(
                out,
                r#"<div class="component-item" draggable="true" data-type="{}"><span class="component-icon">{}</span><span class="component-label">{}</span></div>"#,
                item.kind,
                item.icon,
                escape_html(item.label)
            );
        }
        out.push_str(r#"</div><div class="builder-canvas" data-drop-target="root">"#);
        match &self.canvas {
            CanvasView::Empty { placeholder } => {
                let _ = write!(out, r#"<div class="empty-canvas">{}</div>"#, escape_html(placeholder));
            }
            CanvasView::Elements { roots } => {
                for view in roots {
                    view_html(&mut out, view);
                }
            }
        }
        out.push_str("</div>");
        out
    }

    /// Indented text sketch of the canvas, one line per element
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if let CanvasView::Empty { placeholder } = &self.canvas {
            let _ = writeln!(out, "({})", placeholder);
            return out;
        }
        for view in self.roots() {
            outline_view(&mut out, view, 0);
        }
        out
    }
}

fn view_html(out: &mut String, view: &ElementView) {
    let mut classes = String::from("canvas-element");
    if let ElementBody::Group { layout, .. } = &view.body {
        let _ = write!(classes, " element-group layout-{}", layout.as_str());
    }
    if view.selected {
        classes.push_str(" selected");
    }

    let mut frame = view.frame.clone();
    if view.selected {
        frame.push(("outline", "2px solid #0066cc".to_string()));
    }
    let _ = write!(
        out,
        r#"<div class="{}" data-id="{}" data-type="{}""#,
        classes,
        escape_html(view.id.as_str()),
        view.kind
    );
    if !frame.is_empty() {
        let _ = write!(out, r#" style="{}""#, style_attr(&frame));
    }
    out.push('>');

    match &view.body {
        ElementBody::Text { content, style } => {
            let _ = write!(out, r#"<p style="{}">{}</p>"#, style_attr(style), escape_text(content));
        }
        ElementBody::Button { label, link, style } => {
            let _ = write!(
                out,
                r#"<a role="button" aria-disabled="true" data-href="{}" style="{}">{}</a>"#,
                escape_html(link),
                style_attr(style),
                escape_html(label)
            );
        }
        ElementBody::Image { src, alt, style, .. } => {
            let _ = write!(
                out,
                r#"<img src="{}" alt="{}" draggable="false" style="{}">"#,
                escape_html(src),
                escape_html(alt),
                style_attr(style)
            );
        }
        ElementBody::Group {
            style,
            children,
            placeholder,
            ..
        } => {
            let _ = write!(
                out,
                r#"<div class="group-body" data-drop-target="{}" style="{}">"#,
                escape_html(view.id.as_str()),
                style_attr(style)
            );
            for child in children {
                view_html(out, child);
            }
            if let Some(placeholder) = placeholder {
                let _ = write!(out, r#"<div class="drop-zone">{}</div>"#, escape_html(placeholder));
            }
            out.push_str("</div>");
        }
    }
    out.push_str("</div>");
}

fn outline_view(out: &mut String, view: &ElementView, depth: usize) {
    let marker = if view.selected { "*" } else { "-" };
    let summary = match &view.body {
        ElementBody::Text { content, .. } => format!("{:?}", content),
        ElementBody::Button { label, link, .. } => format!("{:?} -> {}", label, link),
        ElementBody::Image { alt, .. } => format!("alt={:?}", alt),
        ElementBody::Group { layout, children, .. } => {
            format!("{} layout, {} children", layout.as_str(), children.len())
        }
    };
    let _ = writeln!(out, "{}{} {} {} {}", "  ".repeat(depth), marker, view.kind, view.id, summary);
    for child in view.children() {
        outline_view(out, child, depth + 1);
    }
}
