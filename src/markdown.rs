//! Minimal Markdown rendering for documentation tooltips.
//!
//! Attribute documentation is written in a small Markdown subset:
//!
//! - paragraphs separated by blank lines
//! - `**bold**` and `` `inline code` ``
//! - fenced code blocks (```` ``` ````)
//! - a leading `-` on a line, shown as a bullet
//!
//! [`to_blocks`] turns it into [`DocBlock`]s of styled [`TextRun`]s that an
//! editor surface can lay out. Anything outside the subset passes through as
//! plain text, and unterminated markers degrade to plain text instead of
//! failing the document.

use itertools::Itertools;
use serde::Serialize;

const FENCE: &str = "```";
const BULLET: char = '•';

/// How a run of text is emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Plain,
    Bold,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub emphasis: Emphasis,
}

impl TextRun {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> TextRun {
        TextRun {
            text: text.into(),
            emphasis,
        }
    }

    pub fn plain(text: impl Into<String>) -> TextRun {
        TextRun::new(text, Emphasis::Plain)
    }

    pub fn bold(text: impl Into<String>) -> TextRun {
        TextRun::new(text, Emphasis::Bold)
    }

    pub fn code(text: impl Into<String>) -> TextRun {
        TextRun::new(text, Emphasis::Code)
    }
}

/// One source line of a paragraph, or one whole fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocLine {
    pub runs: Vec<TextRun>,
    /// Set for fenced code blocks, whose single run keeps its line breaks.
    pub fenced: bool,
}

/// A paragraph- or code-block-level unit of rendered documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocBlock {
    pub lines: Vec<DocLine>,
}

impl DocBlock {
    /// All runs of the block, in order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.lines.iter().flat_map(|line| line.runs.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Renders `markdown` into blocks.
///
/// Consecutive non-blank lines share a block, one [`DocLine`] each. A fenced
/// code block closes the block it appears in. Empty or whitespace-only input
/// renders to no blocks.
pub fn to_blocks(markdown: &str) -> Vec<DocBlock> {
    let mut blocks = Vec::new();
    let mut current = DocBlock::default();
    let mut lines = markdown.split('\n');

    while let Some(raw_line) = lines.next() {
        let line = raw_line.trim();

        if line.is_empty() {
            flush(&mut blocks, &mut current);
        } else if line.starts_with(FENCE) {
            // the closing fence is consumed by take_while
            let code = lines
                .by_ref()
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .take_while(|l| !l.starts_with(FENCE))
                .join("\n");
            let code = code.trim_end();

            if !code.is_empty() {
                current.lines.push(DocLine {
                    runs: vec![TextRun::code(code)],
                    fenced: true,
                });
            }
            flush(&mut blocks, &mut current);
        } else {
            let runs = inline_runs(line);
            if !runs.is_empty() {
                current.lines.push(DocLine {
                    runs,
                    fenced: false,
                });
            }
        }
    }

    flush(&mut blocks, &mut current);
    blocks
}

fn flush(blocks: &mut Vec<DocBlock>, current: &mut DocBlock) {
    if !current.is_empty() {
        blocks.push(std::mem::take(current));
    }
}

/// Splits one line into styled runs, left to right, first match wins.
fn inline_runs(line: &str) -> Vec<TextRun> {
    let line = match line.strip_prefix('-') {
        Some(rest) => format!("{BULLET}{rest}"),
        None => line.to_string(),
    };

    let mut runs = Vec::new();
    let mut rest = line.as_str();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            let Some(end) = after.find("**") else {
                push_run(&mut runs, TextRun::plain(rest));
                break;
            };
            push_run(&mut runs, TextRun::bold(&after[..end]));
            rest = &after[end + 2..];
        } else if let Some(after) = rest.strip_prefix('`') {
            let Some(end) = after.find('`') else {
                push_run(&mut runs, TextRun::plain(rest));
                break;
            };
            push_run(&mut runs, TextRun::code(&after[..end]));
            rest = &after[end + 1..];
        } else {
            // a lone `*` is plain text, look for the next marker past it
            let skip = usize::from(rest.starts_with('*'));
            match rest[skip..].find(&['*', '`'][..]) {
                Some(next) => {
                    push_run(&mut runs, TextRun::plain(&rest[..skip + next]));
                    rest = &rest[skip + next..];
                }
                None => {
                    push_run(&mut runs, TextRun::plain(rest));
                    break;
                }
            }
        }
    }

    runs
}

/// Appends `run`, merging neighbouring plain text and dropping empty runs.
fn push_run(runs: &mut Vec<TextRun>, run: TextRun) {
    if run.text.is_empty() {
        return;
    }

    match runs.last_mut() {
        Some(last) if last.emphasis == Emphasis::Plain && run.emphasis == Emphasis::Plain => {
            last.text.push_str(&run.text);
        }
        _ => runs.push(run),
    }
}
