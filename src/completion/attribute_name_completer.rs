//! Attribute Name Completer
//!
//! Suggests htmx attribute names inside an HTML tag.
//!
//! ## Trigger Pattern
//! - `<div hx|` or `<div hx-sw|` - the token under the cursor starts with `hx`
//! - `<div hx -|` - a `-` typed right after an `hx` token
//!
//! ## Completion Behavior
//! Every documented attribute is sent; the ones matching the typed token rank
//! first. Selecting an attribute replaces the typed token with a snippet that leaves
//! the cursor between the quotes: `hx-get="$1"`. `hx-on` is the exception, it
//! expands to `hx-on:` so the event name can follow.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::Matcher;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Documentation, InsertTextFormat,
    Range, TextEdit,
};
use tracing::debug;

use crate::buffer::{span_to_range, Span};
use crate::scanner::{containing_token, preceding_token};
use crate::ui::doc_markup;

use super::util::offset_in_tag;
use super::{Completable, Completer, Context};

const HX_TOKEN: &str = "hx";
const HX_ON: &str = "hx-on";

/// Completer for `hx-*` attribute names.
pub struct AttributeNameCompleter<'a> {
    context: Context<'a>,
    /// The token typed so far
    typed: String,
    /// Text under `range`, which the client filters items against
    replaced: String,
    /// Range replaced by the selected attribute
    range: Range,
}

impl<'a> Completer<'a> for AttributeNameCompleter<'a> {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let offset = offset_in_tag(&context, line, character)?;
        let rope = context.rope;

        let token = containing_token(rope, offset);
        let typed = token.text(rope);

        let replaced = if starts_with_hx(&typed) {
            token
        } else if context.trigger_character == Some('-') {
            let previous = preceding_token(rope, token);
            if !previous.text(rope).eq_ignore_ascii_case(HX_TOKEN) {
                return None;
            }
            Span::from_bounds(previous.start, token.end())
        } else {
            return None;
        };

        debug!(typed = %typed, "attribute name completion");

        Some(Self {
            context,
            typed,
            replaced: replaced.text(rope),
            range: span_to_range(rope, replaced),
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
        let pattern = Pattern::parse(&self.typed, CaseMatching::Ignore, Normalization::Smart);
        let registry = self.context.registry;

        let matched = pattern.match_list(registry.keywords().iter(), &mut matcher);
        let unmatched = registry
            .keywords()
            .iter()
            .filter(|keyword| !matched.iter().any(|(name, _)| name == keyword));

        matched
            .iter()
            .map(|(name, _score)| *name)
            .chain(unmatched)
            .enumerate()
            .map(|(rank, name)| AttributeCandidate {
                name: name.as_str(),
                rank,
            })
            .collect()
    }
}

impl AttributeNameCompleter<'_> {
    /// Filter text for `name`: it has to start with the replaced text, or the
    /// client drops the item. After `hx -` that means prefixing it.
    fn filter_text(&self, name: &str) -> String {
        let leads = name
            .get(..self.replaced.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&self.replaced));

        match leads {
            true => name.to_string(),
            false => format!("{}{name}", self.replaced),
        }
    }
}

fn starts_with_hx(token: &str) -> bool {
    token
        .get(..HX_TOKEN.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HX_TOKEN))
}

/// An attribute name ranked against the typed token.
struct AttributeCandidate<'a> {
    name: &'a str,
    rank: usize,
}

impl AttributeCandidate<'_> {
    fn snippet(&self) -> String {
        match self.name {
            HX_ON => format!("{HX_ON}:"),
            name => format!("{name}=\"$1\""),
        }
    }
}

impl<'a> Completable<'a, AttributeNameCompleter<'a>> for AttributeCandidate<'a> {
    fn completions(&self, completer: &AttributeNameCompleter<'a>) -> Option<CompletionItem> {
        let context = &completer.context;
        let documentation = context.registry.render(self.name).map(|rendered| {
            Documentation::MarkupContent(doc_markup(
                &rendered,
                None,
                context.settings.markup_kind(),
            ))
        });

        Some(CompletionItem {
            label: self.name.to_string(),
            kind: Some(CompletionItemKind::PROPERTY),
            detail: Some("htmx attribute".to_string()),
            documentation,
            sort_text: Some(format!("{:04}", self.rank)),
            filter_text: Some(completer.filter_text(self.name)),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range: completer.range,
                new_text: self.snippet(),
            })),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use ropey::Rope;

    use super::*;
    use crate::config::Settings;
    use crate::registry::AttributeRegistry;
    use crate::test_utils::create_test_docs;

    fn items(text: &str, character: usize, trigger: Option<char>) -> Option<Vec<CompletionItem>> {
        let (_temp_dir, root) = create_test_docs();
        let registry = AttributeRegistry::load(&root).unwrap();
        let rope = Rope::from_str(text);
        let settings = Settings::default();
        let context = Context {
            registry: &registry,
            rope: &rope,
            settings: &settings,
            trigger_character: trigger,
        };

        let completer = AttributeNameCompleter::construct(context, 0, character)?;
        Some(
            completer
                .completions()
                .into_iter()
                .filter_map(|candidate| candidate.completions(&completer))
                .collect(),
        )
    }

    mod trigger {
        use super::*;

        #[test]
        fn test_hx_prefix_triggers() {
            assert!(items("<div hx", 7, None).is_some());
            assert!(items("<div HX-", 8, None).is_some());
            assert!(items("<div hx-sw", 10, None).is_some());
        }

        #[test]
        fn test_other_tokens_do_not_trigger() {
            assert!(items("<div cla", 8, None).is_none());
            assert!(items("<div ", 5, None).is_none());
        }

        #[test]
        fn test_outside_tag_does_not_trigger() {
            assert!(items("<div>hx-", 8, None).is_none());
            assert!(items("hx-", 3, None).is_none());
        }

        #[test]
        fn test_dash_after_hx_token() {
            let items = items("<div hx -", 9, Some('-')).unwrap();
            let edit = match &items[0].text_edit {
                Some(CompletionTextEdit::Edit(edit)) => edit.clone(),
                _ => panic!("expected a text edit"),
            };
            // replaces `hx -`
            assert_eq!(edit.range.start.character, 5);
            assert_eq!(edit.range.end.character, 9);
        }

        #[test]
        fn test_dash_after_hx_token_filter_text() {
            let items = items("<div hx -", 9, Some('-')).unwrap();
            let get = items.iter().find(|item| item.label == "hx-get").unwrap();
            assert_eq!(get.filter_text.as_deref(), Some("hx -hx-get"));
        }

        #[test]
        fn test_dash_after_other_token() {
            assert!(items("<div data -", 11, Some('-')).is_none());
        }
    }

    mod items {
        use super::*;

        #[test]
        fn test_snippets() {
            let items = items("<div hx-", 8, None).unwrap();
            let get = items.iter().find(|item| item.label == "hx-get").unwrap();
            let on = items.iter().find(|item| item.label == "hx-on").unwrap();

            match &get.text_edit {
                Some(CompletionTextEdit::Edit(edit)) => {
                    assert_eq!(edit.new_text, "hx-get=\"$1\"");
                    assert_eq!(edit.range.start.character, 5);
                    assert_eq!(edit.range.end.character, 8);
                }
                _ => panic!("expected a text edit"),
            }
            match &on.text_edit {
                Some(CompletionTextEdit::Edit(edit)) => assert_eq!(edit.new_text, "hx-on:"),
                _ => panic!("expected a text edit"),
            }
        }

        #[test]
        fn test_documentation_without_reference_link() {
            let items = items("<div hx-", 8, None).unwrap();
            let target = items.iter().find(|item| item.label == "hx-target").unwrap();

            match &target.documentation {
                Some(Documentation::MarkupContent(markup)) => {
                    assert!(markup.value.starts_with("The `hx-target` attribute"));
                    assert!(!markup.value.contains("htmx.org"));
                }
                _ => panic!("expected markup documentation"),
            }
        }

        #[test]
        fn test_best_match_ranks_first() {
            let items = items("<div hx-sw", 10, None).unwrap();
            assert_eq!(items[0].label, "hx-swap");
            assert_eq!(items[0].sort_text.as_deref(), Some("0000"));
        }

        #[test]
        fn test_narrowed_token_keeps_every_attribute() {
            let items = items("<div hx-sw", 10, None).unwrap();
            let mut labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
            labels.sort();
            assert_eq!(labels, vec!["hx-get", "hx-on", "hx-swap", "hx-target"]);

            let sort_texts: Vec<_> = items.iter().filter_map(|item| item.sort_text.as_deref()).collect();
            assert_eq!(sort_texts, vec!["0000", "0001", "0002", "0003"]);
        }

        #[test]
        fn test_filter_text_is_label_for_typed_prefix() {
            let items = items("<div HX-s", 9, None).unwrap();
            let swap = items.iter().find(|item| item.label == "hx-swap").unwrap();
            assert_eq!(swap.filter_text.as_deref(), Some("hx-swap"));
        }
    }
}
