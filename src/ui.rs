//! Conversion of rendered documentation into LSP markup.

use tower_lsp::lsp_types::{MarkupContent, MarkupKind};

use crate::markdown::{DocBlock, DocLine, Emphasis};

const REFERENCE_BASE_URL: &str = "https://htmx.org/attributes";
const REFERENCE_TITLE: &str = "htmx reference";

/// Chars a markdown client would read as markup in running text.
const MARKDOWN_SPECIAL: &[char] = &['\\', '*', '_', '[', ']', '<', '>', '#', '`'];

/// Link to the official documentation page of `attribute`.
pub fn reference_url(attribute: &str) -> String {
    format!("{REFERENCE_BASE_URL}/{attribute}/")
}

/// Builds the markup shown for a documented attribute or keyword.
///
/// `reference` appends a link block to the htmx reference page of that attribute.
pub fn doc_markup(blocks: &[DocBlock], reference: Option<&str>, kind: MarkupKind) -> MarkupContent {
    let mut sections: Vec<String> = blocks.iter().map(|block| block_text(block, &kind)).collect();

    if let Some(attribute) = reference {
        let url = reference_url(attribute);
        sections.push(match kind {
            MarkupKind::Markdown => format!("[{REFERENCE_TITLE}]({url})"),
            MarkupKind::PlainText => format!("{REFERENCE_TITLE}: {url}"),
        });
    }

    MarkupContent {
        kind,
        value: sections.join("\n\n"),
    }
}

fn block_text(block: &DocBlock, kind: &MarkupKind) -> String {
    let mut text = String::new();

    for (idx, line) in block.lines.iter().enumerate() {
        if idx > 0 {
            // markdown folds single newlines into the paragraph
            let hard_break = *kind == MarkupKind::Markdown
                && !line.fenced
                && !block.lines[idx - 1].fenced;
            text.push_str(if hard_break { "  \n" } else { "\n" });
        }
        text.push_str(&line_text(line, kind));
    }

    text
}

fn line_text(line: &DocLine, kind: &MarkupKind) -> String {
    if *kind == MarkupKind::PlainText {
        return line.runs.iter().map(|run| run.text.as_str()).collect();
    }

    if line.fenced {
        let code: String = line.runs.iter().map(|run| run.text.as_str()).collect();
        return format!("```html\n{code}\n```");
    }

    line.runs
        .iter()
        .map(|run| match run.emphasis {
            Emphasis::Plain => escape_markdown(&run.text),
            Emphasis::Bold => format!("**{}**", escape_markdown(&run.text)),
            Emphasis::Code => format!("`{}`", run.text),
        })
        .collect()
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::to_blocks;

    #[test]
    fn test_markdown_round_trips_inline_styles() {
        let blocks = to_blocks("This has **bold** and `code`.\n\nSecond paragraph.");
        let markup = doc_markup(&blocks, None, MarkupKind::Markdown);

        assert_eq!(markup.kind, MarkupKind::Markdown);
        assert_eq!(
            markup.value,
            "This has **bold** and `code`.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_lines_keep_hard_breaks() {
        let blocks = to_blocks("- one\n- two");
        let markup = doc_markup(&blocks, None, MarkupKind::Markdown);
        assert_eq!(markup.value, "• one  \n• two");
    }

    #[test]
    fn test_fenced_code() {
        let blocks = to_blocks("Example:\n```\n<a hx-get=\"/x\">\n</a>\n```");
        let markup = doc_markup(&blocks, None, MarkupKind::Markdown);
        assert_eq!(
            markup.value,
            "Example:\n```html\n<a hx-get=\"/x\">\n</a>\n```"
        );
    }

    #[test]
    fn test_plain_text() {
        let blocks = to_blocks("Use **`hx-get`** here.\n```\n<a></a>\n```");
        let markup = doc_markup(&blocks, Some("hx-get"), MarkupKind::PlainText);
        assert_eq!(
            markup.value,
            "Use `hx-get` here.\n<a></a>\n\nhtmx reference: https://htmx.org/attributes/hx-get/"
        );
    }

    #[test]
    fn test_reference_link() {
        let blocks = to_blocks("Issues a GET.");
        let markup = doc_markup(&blocks, Some("hx-get"), MarkupKind::Markdown);
        assert_eq!(
            markup.value,
            "Issues a GET.\n\n[htmx reference](https://htmx.org/attributes/hx-get/)"
        );
    }

    mod escaping {
        use super::*;

        #[test]
        fn test_lone_asterisks_stay_literal() {
            let blocks = to_blocks("a *c* d");
            let markup = doc_markup(&blocks, None, MarkupKind::Markdown);
            assert_eq!(markup.value, "a \\*c\\* d");
        }

        #[test]
        fn test_bare_tag_is_not_html() {
            let blocks = to_blocks("Swaps the <div> itself");
            let markup = doc_markup(&blocks, None, MarkupKind::Markdown);
            assert_eq!(markup.value, "Swaps the \\<div\\> itself");
        }

        #[test]
        fn test_bold_text_escaped() {
            let blocks = to_blocks("**inner_html** # 1");
            let markup = doc_markup(&blocks, None, MarkupKind::Markdown);
            assert_eq!(markup.value, "**inner\\_html** \\# 1");
        }

        #[test]
        fn test_code_runs_and_plaintext_unescaped() {
            let blocks = to_blocks("`closest <CSS selector>` and <p>");

            let markdown = doc_markup(&blocks, None, MarkupKind::Markdown);
            assert_eq!(markdown.value, "`closest <CSS selector>` and \\<p\\>");

            let plain = doc_markup(&blocks, None, MarkupKind::PlainText);
            assert_eq!(plain.value, "closest <CSS selector> and <p>");
        }
    }
}
