//! Read-only buffer snapshots and spans.
//!
//! Everything in the scanner works against [`TextBuffer`], a char-indexed view
//! of a document at one instant. The server keeps open documents as
//! [`ropey::Rope`]s, so lookups near the cursor stay cheap however large the
//! document grows; the `str` implementation exists for short strings and tests.

use std::ops::Range;

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// A char-indexed, immutable view of document text.
pub trait TextBuffer {
    /// Number of chars in the buffer.
    fn len_chars(&self) -> usize;

    /// The char at `offset`, or `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Text covered by `span`, clamped to the buffer.
    fn slice(&self, span: Span) -> String;

    /// Start and end offsets of the line containing `offset`.
    ///
    /// The end excludes the line break. Offsets past the end resolve to the
    /// last line.
    fn line_bounds(&self, offset: usize) -> (usize, usize);
}

/// A `(start, len)` run over one buffer snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Span {
        Span { start, len }
    }

    /// Builds a span from `[start, end)`. `end` before `start` gives an empty span.
    pub fn from_bounds(start: usize, end: usize) -> Span {
        Span {
            start,
            len: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn text(&self, buffer: &(impl TextBuffer + ?Sized)) -> String {
        buffer.slice(*self)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl TextBuffer for Rope {
    fn len_chars(&self) -> usize {
        Rope::len_chars(self)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.get_char(offset)
    }

    fn slice(&self, span: Span) -> String {
        let len = Rope::len_chars(self);
        let start = span.start.min(len);
        let end = span.end().min(len);
        Rope::slice(self, start..end).to_string()
    }

    fn line_bounds(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(Rope::len_chars(self));
        let line_idx = self.char_to_line(offset);
        let start = self.line_to_char(line_idx);

        let line = self.line(line_idx);
        let mut content_len = line.len_chars();
        while content_len > 0 && is_line_break(line.char(content_len - 1)) {
            content_len -= 1;
        }

        (start, start + content_len)
    }
}

impl TextBuffer for str {
    fn len_chars(&self) -> usize {
        self.chars().count()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars().nth(offset)
    }

    fn slice(&self, span: Span) -> String {
        self.chars().skip(span.start).take(span.len).collect()
    }

    /// Breaks lines on the same chars as [`Rope`], with `\r\n` as one break.
    fn line_bounds(&self, offset: usize) -> (usize, usize) {
        let chars: Vec<char> = self.chars().collect();
        let offset = offset.min(chars.len());

        let mut start = 0;
        let mut idx = 0;
        while idx < chars.len() {
            if !is_line_break(chars[idx]) {
                idx += 1;
                continue;
            }

            let next = match (chars[idx], chars.get(idx + 1)) {
                ('\r', Some('\n')) => idx + 2,
                _ => idx + 1,
            };
            if offset < next {
                return (start, idx);
            }
            start = next;
            idx = next;
        }

        (start, chars.len())
    }
}

/// Converts an LSP position into a char offset in `rope`.
///
/// Columns count UTF-16 code units, the protocol default. Columns past the end
/// of the line clamp to the line end. Returns `None` when the line does not
/// exist.
pub fn position_to_offset(rope: &Rope, position: Position) -> Option<usize> {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return None;
    }

    let line_start = rope.line_to_char(line);
    let (_, line_end) = rope.line_bounds(line_start);

    let line_start_cu = rope.char_to_utf16_cu(line_start);
    let line_end_cu = rope.char_to_utf16_cu(line_end);
    let target_cu = (line_start_cu + position.character as usize).min(line_end_cu);

    Some(rope.utf16_cu_to_char(target_cu))
}

/// Converts a char offset in `rope` into an LSP position with a UTF-16 column.
pub fn offset_to_position(rope: &Rope, offset: usize) -> Position {
    let offset = offset.min(rope.len_chars());
    let line = rope.char_to_line(offset);
    let character = rope.char_to_utf16_cu(offset) - rope.char_to_utf16_cu(rope.line_to_char(line));

    Position {
        line: line as u32,
        character: character as u32,
    }
}

/// The LSP range covering `span` in `rope`.
pub fn span_to_range(rope: &Rope, span: Span) -> tower_lsp::lsp_types::Range {
    tower_lsp::lsp_types::Range {
        start: offset_to_position(rope, span.start),
        end: offset_to_position(rope, span.end()),
    }
}

/// Applies one `textDocument/didChange` content change to `rope`.
///
/// A change without a range replaces the whole document. Returns `false`
/// when the range does not fit the current text; the rope is left untouched.
pub fn apply_change(rope: &mut Rope, change: &TextDocumentContentChangeEvent) -> bool {
    let Some(range) = change.range else {
        *rope = Rope::from_str(&change.text);
        return true;
    };

    let (Some(start), Some(end)) = (
        position_to_offset(rope, range.start),
        position_to_offset(rope, range.end),
    ) else {
        return false;
    };

    if start > end {
        return false;
    }

    rope.remove(start..end);
    rope.insert(start, &change.text);
    true
}
