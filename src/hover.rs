//! Hover provider for htmx attributes.
//!
//! Hovering an `hx-*` attribute name shows its rendered documentation followed
//! by a link to the htmx reference.
//!
//! # Configuration
//!
//! Hover can be disabled via [`Settings::hover`], and the reference link via
//! [`Settings::reference_links`]:
//!
//! ```toml
//! hover = true
//! reference_links = false
//! ```

use ropey::Rope;
use tower_lsp::lsp_types::{Hover, HoverContents, HoverParams};
use tracing::debug;

use crate::{
    attribute::extract_attribute_name,
    buffer::{position_to_offset, span_to_range},
    config::Settings,
    registry::AttributeRegistry,
    scanner::containing_token,
    ui::doc_markup,
};

/// Generate hover content for the attribute at the cursor position.
///
/// # Returns
///
/// `Some(Hover)` with the attribute documentation, or `None` if:
/// - Hover is disabled in settings
/// - The cursor is not on an `hx-*` attribute name
/// - The attribute is not documented
pub fn hover(
    registry: &AttributeRegistry,
    rope: &Rope,
    params: &HoverParams,
    settings: &Settings,
) -> Option<Hover> {
    if !settings.hover {
        return None;
    }

    let cursor_position = params.text_document_position_params.position;
    let offset = position_to_offset(rope, cursor_position)?;

    let attribute = extract_attribute_name(rope, offset)?;
    debug!(attribute = %attribute, "hover");

    let rendered = registry.render(&attribute)?;
    let reference = settings.reference_links.then_some(attribute.as_str());

    Some(Hover {
        contents: HoverContents::Markup(doc_markup(&rendered, reference, settings.markup_kind())),
        range: Some(span_to_range(rope, containing_token(rope, offset))),
    })
}

#[cfg(test)]
mod tests {
    use tower_lsp::lsp_types::{
        MarkupKind, Position, Range, TextDocumentIdentifier, TextDocumentPositionParams, Url,
    };

    use super::*;
    use crate::test_utils::create_test_docs;

    fn params(line: u32, character: u32) -> HoverParams {
        HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse("file:///index.html").unwrap(),
                },
                position: Position { line, character },
            },
            work_done_progress_params: Default::default(),
        }
    }

    fn markup(hover: &Hover) -> &str {
        match &hover.contents {
            HoverContents::Markup(markup) => &markup.value,
            _ => panic!("expected markup hover"),
        }
    }

    #[test]
    fn test_hover_on_attribute_name() {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str("<main>\n  <a hx-target=\"this\">go</a>\n</main>");

        let hover = hover(&registry, &rope, &params(1, 8), &Settings::default()).unwrap();

        assert!(markup(&hover).starts_with("The `hx-target` attribute"));
        assert!(markup(&hover).ends_with("[htmx reference](https://htmx.org/attributes/hx-target/)"));
        assert_eq!(
            hover.range,
            Some(Range {
                start: Position {
                    line: 1,
                    character: 5
                },
                end: Position {
                    line: 1,
                    character: 14
                },
            })
        );
    }

    #[test]
    fn test_hover_without_reference_link() {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str("<a hx-get=\"/x\">");
        let settings = Settings {
            reference_links: false,
            markdown_docs: false,
            ..Settings::default()
        };

        let hover = hover(&registry, &rope, &params(0, 4), &settings).unwrap();
        match &hover.contents {
            HoverContents::Markup(markup) => {
                assert_eq!(markup.kind, MarkupKind::PlainText);
                assert!(!markup.value.contains("htmx.org"));
            }
            _ => panic!("expected markup hover"),
        }
    }

    #[test]
    fn test_no_hover_on_other_text() {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str("<div class=\"test\">Hello</div>");

        assert!(hover(&registry, &rope, &params(0, 12), &Settings::default()).is_none());
        assert!(hover(&registry, &rope, &params(0, 20), &Settings::default()).is_none());
    }

    #[test]
    fn test_no_hover_on_undocumented_attribute() {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str("<div hx-unknown=\"x\">");

        assert!(hover(&registry, &rope, &params(0, 8), &Settings::default()).is_none());
    }

    #[test]
    fn test_hover_disabled() {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str("<a hx-get=\"/x\">");
        let settings = Settings {
            hover: false,
            ..Settings::default()
        };

        assert!(hover(&registry, &rope, &params(0, 4), &settings).is_none());
    }
}
