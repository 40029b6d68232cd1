//! Shared test utilities for htmx-pal.
//!
//! This module provides common helpers used across multiple test modules.
//! It is only compiled when running tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::registry::ATTRIBUTES_DIR;

fn write_doc(dir: &Path, name: &str, markdown: &str) {
    fs::create_dir_all(dir).expect("Failed to create documentation directory");
    fs::write(dir.join(format!("{name}.md")), markdown).expect("Failed to write document");
}

/// Creates a small documentation corpus in a temporary directory.
///
/// Returns a tuple of (TempDir, PathBuf) where:
/// - TempDir: The temp directory handle (must be kept alive for the test duration)
/// - PathBuf: The corpus root
///
/// # Corpus Structure
///
/// ```text
/// docs/
/// ├── attributes/
/// │   ├── hx-get.md
/// │   ├── hx-on.md
/// │   ├── hx-swap.md
/// │   └── hx-target.md
/// ├── hx-swap/
/// │   ├── innerHTML.md
/// │   └── outerHTML.md
/// └── hx-target/
///     ├── closest.md
///     └── this.md
/// ```
pub fn create_test_docs() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path().join("docs");

    let attributes = root.join(ATTRIBUTES_DIR);
    write_doc(
        &attributes,
        "hx-get",
        "The `hx-get` attribute will cause an element to issue a `GET` to the specified URL.",
    );
    write_doc(
        &attributes,
        "hx-on",
        "The `hx-on*` attributes allow you to embed scripts inline to respond to events.",
    );
    write_doc(
        &attributes,
        "hx-swap",
        "The `hx-swap` attribute allows you to specify how the response will be swapped in.\n\n```\n<div hx-get=\"/example\" hx-swap=\"afterend\">Get Some HTML</div>\n```",
    );
    write_doc(
        &attributes,
        "hx-target",
        "The `hx-target` attribute allows you to target a different element for swapping.\n\n- `this` targets the element itself\n- `closest <CSS selector>` finds the closest ancestor",
    );

    let swap = root.join("hx-swap");
    write_doc(&swap, "innerHTML", "Replace the inner html of the target element.");
    write_doc(
        &swap,
        "outerHTML",
        "**outerHTML** replaces the entire target element with the response.",
    );

    let target = root.join("hx-target");
    write_doc(
        &target,
        "closest",
        "`closest <CSS selector>` finds the closest ancestor element or itself.",
    );
    write_doc(
        &target,
        "this",
        "`this` indicates that the element the attribute is on is the target.",
    );

    (temp_dir, root)
}
