use tower_lsp::lsp_types::Position;

use crate::buffer::position_to_offset;
use crate::scanner::is_inside_html_tag_within;

use super::Context;

/// Char offset of the cursor, when it is inside an HTML tag.
pub fn offset_in_tag(context: &Context, line: usize, character: usize) -> Option<usize> {
    let offset = position_to_offset(
        context.rope,
        Position {
            line: line as u32,
            character: character as u32,
        },
    )?;

    is_inside_html_tag_within(context.rope, offset, context.settings.max_tag_lookbehind)
        .then_some(offset)
}
