use ropey::Rope;
use tower_lsp::lsp_types::{CompletionItem, CompletionList, CompletionParams, CompletionResponse};

use crate::{config::Settings, registry::AttributeRegistry};

use self::attribute_name_completer::AttributeNameCompleter;
use self::attribute_value_completer::AttributeValueCompleter;

mod attribute_name_completer;
mod attribute_value_completer;
mod util;

#[derive(Clone, Copy)]
pub struct Context<'a> {
    registry: &'a AttributeRegistry,
    rope: &'a Rope,
    settings: &'a Settings,
    /// The char that triggered the request, when the client reports one
    trigger_character: Option<char>,
}

pub trait Completer<'a>: Sized {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>;

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized;
}

pub trait Completable<'a, T: Completer<'a>>: Sized {
    fn completions(&self, completer: &T) -> Option<CompletionItem>;
}

pub fn get_completions(
    registry: &AttributeRegistry,
    rope: &Rope,
    params: &CompletionParams,
    settings: &Settings,
) -> Option<CompletionResponse> {
    if !settings.completion {
        return None;
    }

    let trigger_character = params
        .context
        .as_ref()
        .and_then(|context| context.trigger_character.as_deref())
        .and_then(|trigger| trigger.chars().next());

    let completion_context = Context {
        registry,
        rope,
        settings,
        trigger_character,
    };

    let position = params.text_document_position.position;

    // Values first: right after `hx-foo="` the cursor is also inside the tag
    run_completer::<AttributeValueCompleter>(
        completion_context,
        position.line,
        position.character,
    )
    .or_else(|| {
        run_completer::<AttributeNameCompleter>(
            completion_context,
            position.line,
            position.character,
        )
    })
}

fn run_completer<'a, T: Completer<'a>>(
    context: Context<'a>,
    line: u32,
    character: u32,
) -> Option<CompletionResponse> {
    let completer = T::construct(context, line as usize, character as usize)?;
    let completions = completer.completions();

    let completions = completions
        .into_iter()
        .flat_map(|completable| completable.completions(&completer))
        .collect::<Vec<CompletionItem>>();

    Some(CompletionResponse::List(CompletionList {
        // every candidate is sent up front, the client filters as the user types
        is_incomplete: false,
        items: completions,
    }))
}
