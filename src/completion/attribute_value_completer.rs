//! Attribute Value Completer
//!
//! Suggests the documented keyword values of an htmx attribute as soon as its
//! value is opened: `<div hx-swap="|` offers `innerHTML`, `outerHTML`, ...
//!
//! Only attributes with a keyword family in the registry participate.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Documentation, Position, Range,
    TextEdit,
};
use tracing::debug;

use crate::buffer::offset_to_position;
use crate::scanner::is_inside_quoted_attribute_value_start;
use crate::ui::doc_markup;

use super::util::offset_in_tag;
use super::{Completable, Completer, Context};

/// Completer for keyword values right after `hx-foo="`.
pub struct AttributeValueCompleter<'a> {
    context: Context<'a>,
    attribute: String,
    sub_keywords: Vec<String>,
    /// Where the value gets inserted
    cursor: Position,
}

impl<'a> Completer<'a> for AttributeValueCompleter<'a> {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let offset = offset_in_tag(&context, line, character)?;
        let attribute = is_inside_quoted_attribute_value_start(context.rope, offset)?;
        let sub_keywords = context.registry.sub_keywords(&attribute)?;

        debug!(attribute = %attribute, "attribute value completion");

        Some(Self {
            context,
            attribute,
            sub_keywords,
            cursor: offset_to_position(context.rope, offset),
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        self.sub_keywords
            .iter()
            .map(|keyword| SubKeyword(keyword.clone()))
            .collect()
    }
}

/// One documented value of the attribute being completed.
struct SubKeyword(String);

impl<'a> Completable<'a, AttributeValueCompleter<'a>> for SubKeyword {
    fn completions(&self, completer: &AttributeValueCompleter<'a>) -> Option<CompletionItem> {
        let context = &completer.context;
        let keyword = self.0.as_str();

        let documentation = context
            .registry
            .render_sub(&completer.attribute, keyword)
            .map(|rendered| {
                Documentation::MarkupContent(doc_markup(
                    &rendered,
                    None,
                    context.settings.markup_kind(),
                ))
            });

        Some(CompletionItem {
            label: keyword.to_string(),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some(completer.attribute.clone()),
            documentation,
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range: Range {
                    start: completer.cursor,
                    end: completer.cursor,
                },
                new_text: keyword.to_string(),
            })),
            ..Default::default()
        })
    }
}
