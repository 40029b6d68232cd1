use std::path::{Path, PathBuf};

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;
use tower_lsp::lsp_types::{ClientCapabilities, MarkupKind};

use crate::scanner::MAX_TAG_LOOKBEHIND;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Root of the htmx documentation corpus
    pub docs_root: PathBuf,
    pub hover: bool,
    pub completion: bool,
    /// Append a link to the htmx reference to attribute hovers
    pub reference_links: bool,
    /// Send hover and completion documentation as markdown instead of plain text
    pub markdown_docs: bool,
    /// How many chars to look back for a `<` when deciding whether the cursor is in a tag
    pub max_tag_lookbehind: usize,
}

impl Settings {
    pub fn new(
        root_dir: &Path,
        docs_root: &Path,
        capabilities: &ClientCapabilities,
    ) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/htmx-pal/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.htmx-pal",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default(
                "docs_root",
                docs_root
                    .to_str()
                    .ok_or(anyhow!("Can't convert docs_root to str"))?,
            )?
            .set_default("hover", true)?
            .set_default("completion", true)?
            .set_default("reference_links", true)?
            .set_default("markdown_docs", true)?
            .set_default("max_tag_lookbehind", MAX_TAG_LOOKBEHIND as i64)?
            .set_override_option(
                "markdown_docs",
                capabilities.text_document.as_ref().and_then(|it| {
                    let formats = it.hover.as_ref()?.content_format.as_ref()?;
                    match formats.contains(&MarkupKind::Markdown) {
                        true => None,
                        false => Some(false),
                    }
                }),
            )?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }

    pub fn markup_kind(&self) -> MarkupKind {
        match self.markdown_docs {
            true => MarkupKind::Markdown,
            false => MarkupKind::PlainText,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            docs_root: PathBuf::from("docs"),
            hover: true,
            completion: true,
            reference_links: true,
            markdown_docs: true,
            max_tag_lookbehind: MAX_TAG_LOOKBEHIND,
        }
    }
}
