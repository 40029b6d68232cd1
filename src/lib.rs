//! htmx-pal: an htmx-aware Language Server Protocol implementation
//!
//! This crate provides the core functionality for the htmx-pal LSP server,
//! offering completion and hover documentation for htmx attributes in HTML
//! and template files.
//!
//! # Overview
//!
//! - **Cursor Context**: Lightweight scanning around the cursor to tell whether it
//!   sits in a tag, on an attribute name, or at the start of an attribute value
//! - **Documentation**: A registry of attribute docs, rendered lazily from a
//!   Markdown corpus and cached for the lifetime of the server
//! - **Autocomplete**: `hx-*` attribute names and their keyword values
//! - **Hover**: Attribute documentation with a link to the htmx reference
//!
//! # Architecture
//!
//! - [`scanner`] and [`attribute`]: cursor-context queries over a [`buffer::TextBuffer`]
//! - [`markdown`]: the Markdown subset renderer producing styled text runs
//! - [`registry`]: the documentation corpus and its render-once cache
//! - [`completion`] and [`hover`]: the LSP features built on top
//! - [`config`]: Configuration management and settings
//!
//! # Usage
//!
//! This crate is primarily used as the backing library for the `htmx-pal`
//! binary, which implements the LSP server.
//!
//! ```ignore
//! use htmx_pal::registry::AttributeRegistry;
//! use htmx_pal::attribute::extract_attribute_name;
//!
//! let registry = AttributeRegistry::load(&docs_root)?;
//! let rope = ropey::Rope::from_str("<div hx-target=\"this\">");
//! if let Some(name) = extract_attribute_name(&rope, 7) {
//!     let docs = registry.render(&name);
//! }
//! ```

// Cursor context and documentation core
pub mod attribute;
pub mod buffer;
pub mod markdown;
pub mod registry;
pub mod scanner;

// LSP feature modules
pub mod completion;
pub mod hover;

// Configuration and presentation
pub mod config;
pub mod ui;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
