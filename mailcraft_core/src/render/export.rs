//! Email-client HTML: nested tables, inline styles only, fixed-width content
//! column. Output depends on nothing but the document, so rendering the same
//! document twice yields identical bytes.

use super::style::{self, escape_html, escape_text, pixel_attr, Layout, Resolved};
use super::{row_cell_width, Ancestry};
use crate::document::Document;
use crate::element::{Element, ElementKind};
use crate::error::RenderError;
use tracing::debug;

const TABLE_ATTRS: &str = r#"width="100%" cellpadding="0" cellspacing="0" border="0""#;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRenderer {
    /// Width of the centred content column, in pixels
    pub width: u32,
    pub title: String,
    /// Optional cap on group nesting
    pub max_depth: Option<usize>,
}

impl Default for ExportRenderer {
    fn default() -> Self {
        Self {
            width: 600,
            title: "Email".to_string(),
            max_depth: None,
        }
    }
}

/// Export with the default 600px column
pub fn render_export(document: &Document) -> Result<String, RenderError> {
    ExportRenderer::default().render(document)
}

impl ExportRenderer {
    pub fn new(width: u32, title: impl Into<String>, max_depth: Option<usize>) -> Self {
        Self {
            width,
            title: title.into(),
            max_depth,
        }
    }

    pub fn render(&self, document: &Document) -> Result<String, RenderError> {
        let mut ancestry = Ancestry::new(self.max_depth);
        let mut body = String::new();
        for root in document.roots() {
            body.push_str(&self.element(document, root, &mut ancestry)?);
        }
        debug!(elements = document.len(), bytes = body.len(), "export rendered");
        Ok(self.wrap(&body))
    }

    fn wrap(&self, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: {font};">
<table {attrs} style="border-collapse: collapse;">
<tr>
<td align="center">
<table width="{width}" cellpadding="0" cellspacing="0" border="0" style="border-collapse: collapse; width: {width}px; max-width: 100%;">
<tr>
<td>{body}</td>
</tr>
</table>
</td>
</tr>
</table>
</body>
</html>
"#,
            title = escape_html(&self.title),
            font = style::default_font(),
            attrs = TABLE_ATTRS,
            width = self.width,
            body = body,
        )
    }

    fn element(&self, document: &Document, element: &Element, ancestry: &mut Ancestry) -> Result<String, RenderError> {
        ancestry.enter(&element.id)?;
        let props = Resolved::new(element);
        let html = match element.kind {
            ElementKind::Text => text(&props),
            ElementKind::Button => button(&props),
            ElementKind::Image => image(&props),
            ElementKind::Group => self.group(document, element, &props, ancestry)?,
        };
        ancestry.leave();
        Ok(html)
    }

    fn group(
        &self,
        document: &Document,
        element: &Element,
        props: &Resolved<'_>,
        ancestry: &mut Ancestry,
    ) -> Result<String, RenderError> {
        let children = document
            .children_of(element)
            .map(|child| self.element(document, child, ancestry))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = match props.layout() {
            Layout::Row if children.is_empty() => r#"<tr><td width="100%"></td></tr>"#.to_string(),
            Layout::Row => {
                let width = row_cell_width(children.len());
                let cells: String = children
                    .iter()
                    .map(|child| format!(r#"<td width="{}" valign="top" style="padding: 5px;">{}</td>"#, width, child))
                    .collect();
                format!("<tr>{}</tr>", cells)
            }
            Layout::Column => format!(
                r#"<tr><td align="{}">{}</td></tr>"#,
                props.keyword("textAlign"),
                children.concat()
            ),
        };

        Ok(format!(
            r#"<table {} style="background-color: {}; padding: {}; border: {}; text-align: {};">{}</table>"#,
            TABLE_ATTRS,
            props.css("backgroundColor"),
            props.css("padding"),
            props.css("border"),
            props.keyword("textAlign"),
            rows
        ))
    }
}

/// `width`/`height` declarations, omitted when left at `auto`
fn dimensions(props: &Resolved<'_>) -> String {
    ["width", "height"]
        .iter()
        .map(|name| (name, props.css(name)))
        .filter(|(_, value)| value != "auto")
        .map(|(name, value)| format!(" {}: {};", name, value))
        .collect()
}

fn text(props: &Resolved<'_>) -> String {
    format!(
        r#"<p style="font-size: {}; font-family: {}; color: {}; text-align: {}; font-weight: {}; font-style: {};{} margin: 10px 0;">{}</p>"#,
        props.css("fontSize"),
        props.css("fontFamily"),
        props.css("color"),
        props.keyword("textAlign"),
        props.font_weight(),
        props.font_style(),
        dimensions(props),
        escape_text(props.text("content"))
    )
}

fn button(props: &Resolved<'_>) -> String {
    format!(
        r#"<table {}><tr><td align="center" style="padding: 10px 0;"><a href="{}" style="display: inline-block; background-color: {}; color: {}; padding: {}; border-radius: {};{} text-decoration: none; font-family: {};">{}</a></td></tr></table>"#,
        TABLE_ATTRS,
        escape_html(&props.url("link")),
        props.css("backgroundColor"),
        props.css("textColor"),
        props.css("padding"),
        props.css("borderRadius"),
        dimensions(props),
        style::default_font(),
        escape_html(props.text("text"))
    )
}

fn image(props: &Resolved<'_>) -> String {
    let width = props.css("width");
    let height = props.css("height");
    let align = props.keyword("textAlign");

    let mut attrs = String::new();
    if let Some(px) = pixel_attr(&width) {
        attrs.push_str(&format!(r#" width="{}""#, px));
    }
    if let Some(px) = pixel_attr(&height) {
        attrs.push_str(&format!(r#" height="{}""#, px));
    }
    // block images ignore the cell's align attribute in most clients
    let margin = match align {
        "center" => " margin: 0 auto;",
        "right" => " margin-left: auto;",
        _ => "",
    };

    format!(
        r#"<table {}><tr><td align="{}" style="padding: 10px 0;"><img src="{}" alt="{}"{} style="width: {}; height: {}; display: block; max-width: 100%; border: 0;{}"></td></tr></table>"#,
        TABLE_ATTRS,
        align,
        escape_html(&props.url("src")),
        escape_html(props.text("alt")),
        attrs,
        width,
        height,
        margin
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;

    #[test]
    fn test_empty_document_is_a_complete_wrapper() {
        let html = render_export(&Document::new()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<table width="600""#));
        assert!(html.contains("<td></td>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<style"));
    }

    #[test]
    fn test_text_styles_are_inlined() {
        let mut doc = Document::new();
        let id = doc.insert(ElementKind::Text, None);
        doc.set_property(&id, "content", "Hello <world>".into()).unwrap();
        doc.set_property(&id, "bold", true.into()).unwrap();
        doc.set_property(&id, "color", "#ff0000".into()).unwrap();

        let html = render_export(&doc).unwrap();
        assert!(html.contains("Hello &lt;world&gt;</p>"));
        assert!(html.contains("font-weight: bold;"));
        assert!(html.contains("font-style: normal;"));
        assert!(html.contains("color: #ff0000;"));
    }

    #[test]
    fn test_button_is_a_live_link() {
        let mut doc = Document::new();
        let id = doc.insert(ElementKind::Button, None);
        doc.set_property(&id, "link", "https://example.org/?a=1&b=2".into()).unwrap();

        let html = render_export(&doc).unwrap();
        assert!(html.contains(r#"<a href="https://example.org/?a=1&amp;b=2""#));
        assert!(html.contains("background-color: #0066cc;"));
        assert!(html.contains(">Click Here</a>"));
    }

    #[test]
    fn test_image_has_explicit_size_and_block_display() {
        let mut doc = Document::new();
        doc.insert(ElementKind::Image, None);

        let html = render_export(&doc).unwrap();
        assert!(html.contains(r#"width="300""#));
        assert!(html.contains("display: block;"));
        assert!(html.contains(r#"<td align="center""#));
    }

    #[test]
    fn test_row_group_splits_width_evenly() {
        let mut doc = Document::new();
        let group = doc.insert(ElementKind::Group, None);
        doc.set_property(&group, "layout", "row".into()).unwrap();
        for _ in 0..4 {
            doc.insert(ElementKind::Text, Some(&group));
        }

        let html = render_export(&doc).unwrap();
        assert_eq!(html.matches(r#"<td width="25%" valign="top""#).count(), 4);
    }

    #[test]
    fn test_empty_row_group_stays_well_formed() {
        let mut doc = Document::new();
        let group = doc.insert(ElementKind::Group, None);
        doc.set_property(&group, "layout", "row".into()).unwrap();

        let html = render_export(&doc).unwrap();
        assert!(html.contains(r#"<tr><td width="100%"></td></tr></table>"#));
    }

    #[test]
    fn test_unknown_layout_renders_as_column() {
        let mut doc = Document::new();
        let group = doc.insert(ElementKind::Group, None);
        doc.set_property(&group, "layout", "grid".into()).unwrap();
        doc.insert(ElementKind::Text, Some(&group));
        doc.insert(ElementKind::Text, Some(&group));

        let html = render_export(&doc).unwrap();
        assert!(!html.contains("valign=\"top\""));
        assert_eq!(html.matches("<p ").count(), 2);
    }

    #[test]
    fn test_cyclic_groups_are_reported() {
        let json = serde_json::json!({
            "elements": [
                { "id": "el_a", "type": "group", "props": { "children": ["el_b"] }, "parentId": null },
                { "id": "el_b", "type": "group", "props": { "children": ["el_a"] }, "parentId": "el_a" }
            ]
        });
        let doc = Document::from_json(json).unwrap();

        let err = render_export(&doc).unwrap_err();
        assert_eq!(err, RenderError::Cycle { id: ElementId::from("el_a") });
    }

    #[test]
    fn test_custom_width_and_title() {
        let renderer = ExportRenderer::new(480, "Spring <sale>", None);
        let html = renderer.render(&Document::new()).unwrap();
        assert!(html.contains(r#"<table width="480""#));
        assert!(html.contains("<title>Spring &lt;sale&gt;</title>"));
    }
}
