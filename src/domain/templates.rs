//! Template registry: one pure rendering function per [`TemplateKind`].
//!
//! Rendering is deterministic and performs no I/O. `content` arrives as
//! trusted pre-rendered markup and is embedded verbatim; the registry does
//! no escaping. The featured image carries fixed dimensions so swapping
//! templates never shifts the surrounding layout.

use crate::domain::types::TemplateKind;

pub const FEATURED_IMAGE_WIDTH: u32 = 800;
pub const FEATURED_IMAGE_HEIGHT: u32 = 400;

#[derive(Debug, Clone, Copy)]
pub struct TemplateFields<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub featured_image: Option<&'a str>,
}

/// Render `fields` with the given template. Never fails: `Custom` has no
/// registry layout of its own and renders like `Basic`.
pub fn render(kind: TemplateKind, fields: &TemplateFields<'_>) -> String {
    match kind {
        TemplateKind::Basic | TemplateKind::Custom => render_basic(fields),
        TemplateKind::Minimal => render_minimal(fields),
        TemplateKind::Modern => render_modern(fields),
    }
}

fn featured_image(fields: &TemplateFields<'_>) -> String {
    match fields.featured_image {
        Some(src) => format!(
            "<img class=\"featured\" src=\"{src}\" alt=\"\" \
             width=\"{FEATURED_IMAGE_WIDTH}\" height=\"{FEATURED_IMAGE_HEIGHT}\">"
        ),
        None => String::new(),
    }
}

fn render_basic(fields: &TemplateFields<'_>) -> String {
    let image = featured_image(fields);
    format!(
        "<article class=\"template-basic\">\
         <h1>{title}</h1>\
         {image}\
         <div class=\"post-content\">{content}</div>\
         </article>",
        title = fields.title,
        content = fields.content,
    )
}

fn render_minimal(fields: &TemplateFields<'_>) -> String {
    let image = featured_image(fields);
    format!(
        "<main class=\"template-minimal\">\
         <h1>{title}</h1>\
         {image}\
         {content}\
         </main>",
        title = fields.title,
        content = fields.content,
    )
}

fn render_modern(fields: &TemplateFields<'_>) -> String {
    let image = featured_image(fields);
    format!(
        "<article class=\"template-modern\">\
         <header class=\"hero\"><h1>{title}</h1>{image}</header>\
         <section class=\"post-content\">{content}</section>\
         </article>",
        title = fields.title,
        content = fields.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(featured_image: Option<&'a str>) -> TemplateFields<'a> {
        TemplateFields {
            title: "Hi",
            content: "<p>Hi</p>",
            featured_image,
        }
    }

    #[test]
    fn every_template_emits_title_heading_and_raw_content() {
        for kind in [
            TemplateKind::Basic,
            TemplateKind::Minimal,
            TemplateKind::Modern,
            TemplateKind::Custom,
        ] {
            let html = render(kind, &fields(None));
            assert!(html.contains("<h1>Hi</h1>"), "{kind:?}: {html}");
            assert!(html.contains("<p>Hi</p>"), "{kind:?}: {html}");
            assert!(!html.contains("<img"), "{kind:?}: {html}");
        }
    }

    #[test]
    fn featured_image_is_emitted_with_fixed_dimensions() {
        let html = render(TemplateKind::Modern, &fields(Some("https://cdn.example/a.png")));
        assert!(html.contains("src=\"https://cdn.example/a.png\""));
        assert!(html.contains("width=\"800\""));
        assert!(html.contains("height=\"400\""));
    }

    #[test]
    fn unknown_template_name_degrades_to_basic() {
        assert_eq!(TemplateKind::from_name("brutalist"), TemplateKind::Basic);
        assert_eq!(TemplateKind::from_name(""), TemplateKind::Basic);
        assert_eq!(TemplateKind::from_name("minimal"), TemplateKind::Minimal);
    }

    #[test]
    fn custom_marker_renders_like_basic() {
        let custom = render(TemplateKind::Custom, &fields(None));
        let basic = render(TemplateKind::Basic, &fields(None));
        assert_eq!(custom, basic);
    }
}
