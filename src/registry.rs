//! The htmx attribute documentation registry.
//!
//! The registry is built once at startup from a documentation corpus on disk:
//!
//! ```text
//! docs/
//! ├── attributes/          one canonical document per attribute
//! │   ├── hx-get.md
//! │   ├── hx-swap.md
//! │   └── ...
//! ├── hx-swap/             one family per attribute with keyword values
//! │   ├── innerHTML.md
//! │   ├── outerHTML.md
//! │   └── ...
//! └── hx-target/
//!     └── ...
//! ```
//!
//! Documents are read and rendered lazily, on first lookup, and the rendered
//! blocks are kept for the lifetime of the registry. Each document sits behind
//! its own [`OnceCell`], so concurrent first lookups of the same key read the
//! file once and all receive the same [`Arc`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::markdown::{to_blocks, DocBlock};

/// Directory holding the canonical per-attribute documents.
pub const ATTRIBUTES_DIR: &str = "attributes";

const DOC_EXTENSION: &str = "md";

/// Rendered documentation for one key.
pub type Rendered = Vec<DocBlock>;

/// Errors raised while building the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The documentation root does not exist or is not a directory.
    #[error("documentation root not found: {0}")]
    NotFound(PathBuf),

    /// A directory of the corpus could not be listed.
    #[error("failed to enumerate documentation: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Where document text comes from.
///
/// The registry enumerates the corpus itself and only goes through this trait
/// to read a document's contents.
pub trait DocSource: Send + Sync {
    fn read_doc(&self, path: &Path) -> io::Result<String>;
}

/// Reads documents from the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDocSource;

impl DocSource for FsDocSource {
    fn read_doc(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[derive(Debug)]
struct DocEntry {
    path: PathBuf,
    rendered: OnceCell<Option<Arc<Rendered>>>,
}

impl DocEntry {
    fn new(path: PathBuf) -> DocEntry {
        DocEntry {
            path,
            rendered: OnceCell::new(),
        }
    }

    /// Reads and renders the document on first call; later calls reuse the result.
    ///
    /// A read failure is remembered too: the corpus is static, so retrying would
    /// only repeat the warning.
    fn render(&self, source: &dyn DocSource) -> Option<Arc<Rendered>> {
        self.rendered
            .get_or_init(|| match source.read_doc(&self.path) {
                Ok(markdown) => Some(Arc::new(to_blocks(&markdown))),
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "failed to read documentation");
                    None
                }
            })
            .clone()
    }
}

/// Attribute names, their keyword values, and their rendered documentation.
pub struct AttributeRegistry {
    root: PathBuf,
    keywords: Vec<String>,
    attributes: HashMap<String, DocEntry>,
    families: HashMap<String, Vec<(String, DocEntry)>>,
    source: Box<dyn DocSource>,
}

impl std::fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("root", &self.root)
            .field("keywords", &self.keywords)
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AttributeRegistry {
    /// Builds the registry from the corpus at `root`, reading documents from disk.
    pub fn load(root: &Path) -> Result<AttributeRegistry, RegistryError> {
        AttributeRegistry::load_with_source(root, FsDocSource)
    }

    /// Builds the registry from the corpus at `root`, reading documents through
    /// `source`.
    pub fn load_with_source(
        root: &Path,
        source: impl DocSource + 'static,
    ) -> Result<AttributeRegistry, RegistryError> {
        if !root.is_dir() {
            return Err(RegistryError::NotFound(root.to_path_buf()));
        }

        let attributes_dir = root.join(ATTRIBUTES_DIR);
        let mut keywords = Vec::new();
        let mut attributes = HashMap::new();

        if attributes_dir.is_dir() {
            for (keyword, path) in list_docs(&attributes_dir)? {
                keywords.push(keyword.clone());
                attributes.insert(keyword, DocEntry::new(path));
            }
        } else {
            warn!(path = %attributes_dir.display(), "no attribute documents found");
        }

        let mut families = HashMap::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(family) = entry.file_name().to_str() else {
                continue;
            };
            if family.eq_ignore_ascii_case(ATTRIBUTES_DIR) {
                continue;
            }

            let sub_keywords = list_docs(entry.path())?
                .into_iter()
                .map(|(keyword, path)| (keyword, DocEntry::new(path)))
                .collect();
            families.insert(family.to_string(), sub_keywords);
        }

        info!(
            root = %root.display(),
            attributes = keywords.len(),
            families = families.len(),
            "loaded htmx documentation"
        );

        Ok(AttributeRegistry {
            root: root.to_path_buf(),
            keywords,
            attributes,
            families,
            source: Box::new(source),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every top-level attribute name, in corpus order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Keyword values documented for `attribute`, or `None` when it has no family.
    pub fn sub_keywords(&self, attribute: &str) -> Option<Vec<String>> {
        let Some(family) = self.families.get(attribute) else {
            debug!(attribute, "no keyword family");
            return None;
        };

        Some(family.iter().map(|(keyword, _)| keyword.clone()).collect())
    }

    /// Rendered documentation of `attribute`.
    pub fn render(&self, attribute: &str) -> Option<Arc<Rendered>> {
        let Some(entry) = self.attributes.get(attribute) else {
            debug!(attribute, "attribute not documented");
            return None;
        };

        entry.render(self.source.as_ref())
    }

    /// Rendered documentation of the `sub_keyword` value of `attribute`.
    pub fn render_sub(&self, attribute: &str, sub_keyword: &str) -> Option<Arc<Rendered>> {
        let entry = self
            .families
            .get(attribute)?
            .iter()
            .find(|(keyword, _)| keyword == sub_keyword)
            .map(|(_, entry)| entry);

        let Some(entry) = entry else {
            debug!(attribute, sub_keyword, "keyword not documented");
            return None;
        };

        entry.render(self.source.as_ref())
    }

    /// Renders every document up front, in parallel.
    ///
    /// Lookups never need this; it moves the one-time file reads off the first
    /// hover or completion.
    pub fn warm_up(&self) {
        let source = self.source.as_ref();

        let rendered = self
            .attributes
            .par_iter()
            .map(|(_, entry)| entry)
            .chain(
                self.families
                    .par_iter()
                    .flat_map_iter(|(_, family)| family.iter().map(|(_, entry)| entry)),
            )
            .filter(|entry| entry.render(source).is_some())
            .count();

        info!(rendered, "warmed documentation cache");
    }
}

/// The `*.md` documents directly inside `dir`, as `(file stem, path)` pairs
/// sorted by file name.
fn list_docs(dir: &Path) -> Result<Vec<(String, PathBuf)>, RegistryError> {
    let mut docs = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(DOC_EXTENSION)
        {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            docs.push((stem.to_string(), path.to_path_buf()));
        }
    }

    Ok(docs)
}
