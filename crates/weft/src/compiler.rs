//! The compiler context: everything one project needs to compile templates.
//!
//! A [`Compiler`] replaces process-wide engine state. It owns the template
//! directories, the installed extensions, the tag cache and the
//! preprocessor, and is shared by reference between compiles.
//!
//! ```text
//! name ─► resolve ─► read ─► preprocess ─► Parser ─► tree passes ─► Generator
//! ```

use std::path::PathBuf;

use once_cell::sync::OnceCell;
use weft_preprocess::{Minify, Preprocessor, PreprocessorBuilder, Rewrite, TagPattern};
use weft_tree::{pass, print, PipelineConfig, Tree};

use crate::config::CompilerConfig;
use crate::error::{BoxError, Error, Result};
use crate::extension::{Extension, ExtensionSet};
use crate::resolver::TemplateDirectories;
use crate::store::{DiskStore, FileStore};
use crate::tags::TagCache;

/// Builds a node tree from preprocessed source.
pub trait Parser {
    fn parse(&self, source: &str) -> std::result::Result<Tree, BoxError>;
}

/// Emits output from a rewritten tree.
pub trait Generator {
    type Output;

    fn generate(&self, tree: &Tree) -> std::result::Result<Self::Output, BoxError>;
}

/// Prints the tree back to markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupGenerator;

impl Generator for MarkupGenerator {
    type Output = String;

    fn generate(&self, tree: &Tree) -> std::result::Result<String, BoxError> {
        Ok(print::to_markup(tree))
    }
}

/// Compiles templates for one project.
pub struct Compiler {
    config: CompilerConfig,
    pipeline: PipelineConfig,
    directories: TemplateDirectories,
    extensions: ExtensionSet,
    tag_cache: TagCache,
    preprocessor: Preprocessor,
    tags: OnceCell<Vec<String>>,
    tag_patterns: OnceCell<Vec<TagPattern>>,
}

impl Compiler {
    /// Create a compiler builder.
    pub fn builder(config: CompilerConfig) -> CompilerBuilder {
        CompilerBuilder::new(config)
    }

    /// Compiler with no extensions and the default store.
    ///
    /// # Errors
    ///
    /// Fails when the configured pass arguments are invalid.
    pub fn new(config: CompilerConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The template search path. Directories can be added until the first
    /// template is resolved.
    pub fn directories(&self) -> &TemplateDirectories {
        &self.directories
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn tag_cache(&self) -> &TagCache {
        &self.tag_cache
    }

    /// Attribute-tags of the installed extensions.
    ///
    /// Loaded from the tag cache, or regenerated, on first call and kept for
    /// the life of the compiler.
    pub fn tags(&self) -> &[String] {
        self.tags
            .get_or_init(|| self.tag_cache.load_or_build(&self.extensions))
    }

    fn tag_patterns(&self) -> Result<&[TagPattern]> {
        let patterns = self.tag_patterns.get_or_try_init(|| {
            self.tags()
                .iter()
                .map(|tag| TagPattern::new(tag))
                .collect::<weft_preprocess::Result<Vec<_>>>()
        })?;
        Ok(patterns)
    }

    /// Maps a logical template name to a path.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.directories.resolve(name)
    }

    /// Name of a template referenced from inside another template.
    pub fn referred_name(&self, name: &str, referring: &str) -> String {
        self.directories.referred_name(name, referring)
    }

    /// Resolves, reads and preprocesses a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] when the resolved file cannot be
    /// read, or [`Error::Preprocess`] when a stage fails.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name);
        let source = std::fs::read_to_string(&path).map_err(|source| Error::TemplateNotFound {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        log::debug!("loaded '{}' from {}", name, path.display());
        self.preprocess(&source)
    }

    /// Runs the text preprocessor with the installed attribute-tags.
    pub fn preprocess(&self, source: &str) -> Result<String> {
        if !self.preprocessor.is_enabled() {
            return Ok(self.preprocessor.preprocess(source)?);
        }
        let patterns = self.tag_patterns()?;
        Ok(self.preprocessor.preprocess_with(source, patterns)?)
    }

    /// Runs the canonical rewrite passes over `tree`.
    pub fn rewrite_tree(&self, tree: &mut Tree) -> Result<()> {
        pass::canonical(&self.pipeline)?.run(tree)?;
        Ok(())
    }

    /// Compiles the template `name` end to end.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the compile: [`Error::TemplateNotFound`],
    /// [`Error::Preprocess`], [`Error::Parse`], [`Error::InvalidPassArgument`]
    /// or [`Error::Generate`].
    pub fn compile<P, G>(&self, name: &str, parser: &P, generator: &G) -> Result<G::Output>
    where
        P: Parser + ?Sized,
        G: Generator + ?Sized,
    {
        let source = self.load(name)?;
        self.finish(name, &source, parser, generator)
    }

    /// Compiles in-memory source as if it had been loaded as `name`.
    pub fn compile_source<P, G>(
        &self,
        name: &str,
        source: &str,
        parser: &P,
        generator: &G,
    ) -> Result<G::Output>
    where
        P: Parser + ?Sized,
        G: Generator + ?Sized,
    {
        let source = self.preprocess(source)?;
        self.finish(name, &source, parser, generator)
    }

    fn finish<P, G>(&self, name: &str, source: &str, parser: &P, generator: &G) -> Result<G::Output>
    where
        P: Parser + ?Sized,
        G: Generator + ?Sized,
    {
        let mut tree = parser.parse(source).map_err(|source| Error::Parse {
            name: name.to_string(),
            source,
        })?;
        self.rewrite_tree(&mut tree)?;
        log::debug!("rewrote '{}' ({} nodes)", name, tree.len());
        generator.generate(&tree).map_err(|source| Error::Generate {
            name: name.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .field("directories", &self.directories)
            .field("extensions", &self.extensions)
            .field("preprocessor", &self.preprocessor)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Compiler`].
pub struct CompilerBuilder {
    config: CompilerConfig,
    extensions: ExtensionSet,
    preprocessor: PreprocessorBuilder,
    store: Option<Box<dyn DiskStore>>,
}

impl CompilerBuilder {
    pub fn new(config: CompilerConfig) -> Self {
        let preprocessor = Preprocessor::builder().enabled(config.preprocess);
        Self {
            config,
            extensions: ExtensionSet::new(),
            preprocessor,
            store: None,
        }
    }

    /// Install an extension. Duplicates by name are ignored.
    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.add(extension);
        self
    }

    /// Append a user rewrite stage to the preprocessor.
    pub fn rewriter(mut self, rewriter: impl Rewrite + 'static) -> Self {
        self.preprocessor = self.preprocessor.rewriter(rewriter);
        self
    }

    /// Replace the preprocessor's final minifier.
    pub fn minifier(mut self, minifier: impl Minify + 'static) -> Self {
        self.preprocessor = self.preprocessor.minifier(minifier);
        self
    }

    /// Store for the tag cache. Defaults to a [`FileStore`] in `cache_dir`.
    pub fn store(mut self, store: impl DiskStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Build the compiler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPassArgument`] when a configured class marker or
    /// tag name is invalid.
    pub fn build(self) -> Result<Compiler> {
        let pipeline = self.config.pipeline();
        pass::canonical(&pipeline)?;

        let directories = TemplateDirectories::new(&self.config.project_root)
            .with_extension(&self.config.template_extension);
        for directory in &self.config.directories {
            directories.add(&directory.path, directory.priority());
        }

        let project_id = self.config.project_id();
        let tag_cache = match self.store {
            Some(store) => TagCache::from_boxed(store, &project_id),
            None => TagCache::new(FileStore::new(&self.config.cache_dir), &project_id),
        };

        Ok(Compiler {
            preprocessor: self.preprocessor.build()?,
            config: self.config,
            pipeline,
            directories,
            extensions: self.extensions,
            tag_cache,
            tags: OnceCell::new(),
            tag_patterns: OnceCell::new(),
        })
    }
}
