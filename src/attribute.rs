//! Attribute-name extraction for hover lookups.
//!
//! [`extract_attribute_name`] recovers the full `hx-*` name under the cursor.
//! It deliberately does not reuse [`crate::scanner::containing_token`]: hovers
//! land on arbitrary text, so the scan gives up as soon as the first two chars
//! rule out an `hx` prefix instead of walking the whole identifier.

use crate::buffer::TextBuffer;
use crate::scanner::{is_token_char, HX_PREFIX};

/// The `hx-*` attribute name around `offset`, if there is one.
pub fn extract_attribute_name(buffer: &(impl TextBuffer + ?Sized), offset: usize) -> Option<String> {
    let offset = offset.min(buffer.len_chars());
    let mut name: Vec<char> = Vec::new();

    let mut start = offset;
    while start > 0 {
        match buffer.char_at(start - 1) {
            Some(c) if is_token_char(c) => {
                name.push(c);
                start -= 1;
            }
            _ => break,
        }
    }
    name.reverse();

    let mut end = offset;
    while let Some(c) = buffer.char_at(end).filter(|c| is_token_char(*c)) {
        if name.len() >= 2 && (name[0] != 'h' || name[1] != 'x') {
            return None;
        }
        name.push(c);
        end += 1;
    }

    if name.len() < HX_PREFIX.len() {
        return None;
    }

    let name = String::from_iter(name);
    name.starts_with(HX_PREFIX).then_some(name)
}
