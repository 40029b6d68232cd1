//! Cursor-context scanning for HTML-like markup.
//!
//! These queries answer "where is the cursor" questions against a live
//! [`TextBuffer`] without parsing the document: each one only walks the chars
//! around the offset, so they stay cheap on large, constantly edited buffers.
//!
//! | Query | Answers |
//! |-------|---------|
//! | [`is_inside_quoted_attribute_value_start`] | cursor sits right after `hx-foo="` |
//! | [`is_inside_html_tag`] | cursor is between `<` and its `>` |
//! | [`containing_token`] | token span around the cursor |
//! | [`preceding_token`] | token span before a given token |
//!
//! All queries are total: offsets outside the buffer give the "no match" answer.

use crate::buffer::{Span, TextBuffer};

/// Prefix shared by every htmx attribute.
pub const HX_PREFIX: &str = "hx-";

/// Default bound on how far [`is_inside_html_tag`] looks back for a `<`.
pub const MAX_TAG_LOOKBEHIND: usize = 4096;

/// Token chars are letters, digits and `-`.
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-'
}

fn is_token_char_at(buffer: &(impl TextBuffer + ?Sized), offset: usize) -> bool {
    buffer.char_at(offset).is_some_and(is_token_char)
}

/// Returns the attribute name when the cursor sits immediately after the
/// opening quote of an `hx-*` attribute value, e.g. `<div hx-get="|`.
///
/// The attribute name is recovered by walking back from the `=` to the nearest
/// whitespace or `>` on the same line. Attribute names spanning lines are not
/// recognised.
pub fn is_inside_quoted_attribute_value_start(
    buffer: &(impl TextBuffer + ?Sized),
    offset: usize,
) -> Option<String> {
    if offset < 2 || offset > buffer.len_chars() {
        return None;
    }

    if buffer.char_at(offset - 2) != Some('=') || buffer.char_at(offset - 1) != Some('"') {
        return None;
    }

    // `="` at the very start of the buffer has no name in front of it
    let name_end = offset.checked_sub(3)?;
    let (line_start, _) = buffer.line_bounds(name_end);

    let mut name_start = name_end;
    while name_start > line_start {
        match buffer.char_at(name_start) {
            Some(c) if c.is_whitespace() || c == '>' => {
                name_start += 1;
                break;
            }
            _ => name_start -= 1,
        }
    }

    let name = Span::from_bounds(name_start, name_end + 1).text(buffer);

    name.starts_with(HX_PREFIX).then_some(name)
}

/// Whether `offset` lies inside an HTML tag, i.e. a `<` precedes it with no
/// `>` in between.
///
/// Looks back at most [`MAX_TAG_LOOKBEHIND`] chars.
pub fn is_inside_html_tag(buffer: &(impl TextBuffer + ?Sized), offset: usize) -> bool {
    is_inside_html_tag_within(buffer, offset, MAX_TAG_LOOKBEHIND)
}

/// [`is_inside_html_tag`] with an explicit lookbehind bound. Running into the
/// bound counts as "not inside a tag".
pub fn is_inside_html_tag_within(
    buffer: &(impl TextBuffer + ?Sized),
    offset: usize,
    max_lookbehind: usize,
) -> bool {
    let offset = offset.min(buffer.len_chars());
    let floor = offset.saturating_sub(max_lookbehind);

    for idx in (floor..offset).rev() {
        match buffer.char_at(idx) {
            Some('>') => return false,
            Some('<') => return true,
            _ => {}
        }
    }

    false
}

/// The maximal run of token chars around `offset`, bounded by its line.
///
/// Empty when the cursor sits between two non-token chars.
pub fn containing_token(buffer: &(impl TextBuffer + ?Sized), offset: usize) -> Span {
    let offset = offset.min(buffer.len_chars());
    let (line_start, line_end) = buffer.line_bounds(offset);

    let mut start = offset;
    while start > line_start && is_token_char_at(buffer, start - 1) {
        start -= 1;
    }

    let mut end = offset;
    while end < line_end && is_token_char_at(buffer, end) {
        end += 1;
    }

    Span::from_bounds(start, end)
}

/// The token before `token`, skipping the whitespace between them.
///
/// Stays on the line of `token`; the result is empty when nothing but
/// whitespace (or a non-token char) precedes it.
pub fn preceding_token(buffer: &(impl TextBuffer + ?Sized), token: Span) -> Span {
    let token_start = token.start.min(buffer.len_chars());
    let (line_start, _) = buffer.line_bounds(token_start);

    let mut end = token_start;
    while end > line_start && buffer.char_at(end - 1).is_some_and(char::is_whitespace) {
        end -= 1;
    }

    let mut start = end;
    while start > line_start && is_token_char_at(buffer, start - 1) {
        start -= 1;
    }

    Span::from_bounds(start, end)
}
