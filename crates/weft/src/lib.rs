//! # weft - Template front-end pipeline
//!
//! `weft` takes a template from a logical name to a rewritten node tree ready
//! for code generation. Parsing and code generation are supplied by the
//! caller through the [`Parser`] and [`Generator`] traits; everything in
//! between lives here:
//!
//! - [`TemplateDirectories`]: priority-ordered search path, locked on first use
//! - [`Preprocessor`]: staged text rewriting before parsing
//!   (from [`weft_preprocess`])
//! - the canonical tree passes (from [`weft_tree::pass`])
//! - [`TagCache`]: attribute-tags advertised by the installed [`Extension`]s,
//!   persisted between runs through a [`DiskStore`]
//!
//! A [`Compiler`] ties these together for one project. It is `Send + Sync`
//! and can be shared between threads compiling different templates.
//!
//! ## Example
//!
//! ```rust
//! use weft::{BoxError, Compiler, CompilerConfig, MarkupGenerator, Parser, StaticExtension, Tree};
//!
//! struct Element;
//!
//! impl Parser for Element {
//!     fn parse(&self, source: &str) -> Result<Tree, BoxError> {
//!         // A real parser builds the tree from `source`.
//!         assert_eq!(source, "<h1>Hello</h1>");
//!         let mut tree = Tree::new();
//!         let root = tree.root();
//!         let h1 = tree.element("h1");
//!         let text = tree.text("Hello");
//!         tree.append_child(h1, text)?;
//!         tree.append_child(root, h1)?;
//!         Ok(tree)
//!     }
//! }
//!
//! let cache = tempfile::tempdir()?;
//! let config = CompilerConfig {
//!     cache_dir: cache.path().to_path_buf(),
//!     ..CompilerConfig::default()
//! };
//! let compiler = Compiler::builder(config)
//!     .extension(StaticExtension::new("ui", ["n:class"]))
//!     .build()?;
//!
//! let html = compiler.compile_source("hello", "<h1>Hello</h1>\n", &Element, &MarkupGenerator)?;
//! assert_eq!(html, r#"<h1 class="heading">Hello</h1>"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compiler;
mod config;
mod error;
mod extension;
mod resolver;
mod store;
mod tags;

pub use compiler::{Compiler, CompilerBuilder, Generator, MarkupGenerator, Parser};
pub use config::{CompilerConfig, DirectoryConfig};
pub use error::{BoxError, Error, Result};
pub use extension::{Extension, ExtensionSet, StaticExtension};
pub use resolver::{normalize_path, Directory, Priority, TemplateDirectories, DEFAULT_EXTENSION};
pub use store::{DiskStore, FileStore};
pub use tags::{
    collect_tags, fingerprint, TagCache, TagCacheArtifact, ATTRIBUTE_TAG_PREFIX, GENERATOR,
    IMPLICIT_TAG,
};

pub use weft_preprocess::{Minify, Preprocessor, Rewrite};
pub use weft_tree::{PipelineConfig, Tree};
