//! # weft-preprocess - Staged text rewriting for template source
//!
//! Raw template source is normalized here before any parser sees it. The work
//! is split into named [`Stage`]s that always run in [`Stage::ORDER`]:
//!
//! 1. [`InlineTags`](Stage::InlineTags): multi-line opening tags become single-line
//! 2. [`ProtectOperators`](Stage::ProtectOperators): `->` before a word is hidden
//!    behind a placeholder so later patterns cannot misread it
//! 3. [`NormalizeTagValues`](Stage::NormalizeTagValues): registered attribute-tags
//!    lose their braces and extra whitespace, empty ones are removed
//! 4. [`Rewriters`](Stage::Rewriters): user [`Rewrite`] stages, in registration order
//! 5. [`RestoreOperators`](Stage::RestoreOperators): placeholders become `->` again
//! 6. [`Compress`](Stage::Compress): the configured [`Minify`]
//!
//! ## Example
//!
//! ```rust
//! use weft_preprocess::Preprocessor;
//!
//! let pre = Preprocessor::builder().tag("n:if").build()?;
//! let out = pre.preprocess("<p\n   n:if=\"{ $user->admin }\">hi</p>")?;
//! assert_eq!(out, "<p n:if=\"$user->admin\">hi</p>");
//! # Ok::<(), weft_preprocess::PreprocessError>(())
//! ```

mod error;
mod minify;
mod preprocessor;
mod rewrite;
pub mod stage;

pub use error::{PreprocessError, Result};
pub use minify::{BlankLineMinifier, Minify, Passthrough};
pub use preprocessor::{Preprocessor, PreprocessorBuilder};
pub use rewrite::{FnRewrite, Rewrite};
pub use stage::{Stage, TagPattern, OPERATOR_PLACEHOLDER};
