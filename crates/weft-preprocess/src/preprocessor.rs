//! The staged preprocessor and its builder.

use crate::error::{PreprocessError, Result};
use crate::minify::{BlankLineMinifier, Minify};
use crate::rewrite::Rewrite;
use crate::stage::{self, Stage, TagPattern};

/// Rewrites raw template source before it is parsed.
///
/// [`preprocess`](Preprocessor::preprocess) trims the input and then runs
/// [`Stage::ORDER`]. When disabled, only the trim happens.
pub struct Preprocessor {
    enabled: bool,
    tags: Vec<TagPattern>,
    rewriters: Vec<Box<dyn Rewrite>>,
    minifier: Box<dyn Minify>,
}

impl Preprocessor {
    /// Create a preprocessor builder.
    pub fn builder() -> PreprocessorBuilder {
        PreprocessorBuilder::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Attribute-tags normalized by [`Stage::NormalizeTagValues`].
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(TagPattern::tag)
    }

    /// Runs every stage over `source`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a user rewriter. Errors other than
    /// [`PreprocessError::InvalidStageArgument`] are reported under the
    /// rewriter's name.
    pub fn preprocess(&self, source: &str) -> Result<String> {
        self.preprocess_with(source, &[])
    }

    /// Like [`preprocess`](Self::preprocess), also normalizing `extra_tags`
    /// after the preprocessor's own tags.
    pub fn preprocess_with(&self, source: &str, extra_tags: &[TagPattern]) -> Result<String> {
        let mut content = source.trim().to_string();
        if !self.enabled {
            return Ok(content);
        }

        for step in Stage::ORDER {
            content = self.run_stage(step, content, extra_tags)?;
        }
        Ok(content)
    }

    fn run_stage(&self, step: Stage, content: String, extra_tags: &[TagPattern]) -> Result<String> {
        log::trace!("preprocess stage '{}'", step);
        let next = match step {
            Stage::InlineTags => stage::inline_tags(&content).into_owned(),
            Stage::ProtectOperators => stage::protect_operators(&content).into_owned(),
            Stage::NormalizeTagValues => {
                let own = stage::normalize_tag_values(&content, &self.tags);
                stage::normalize_tag_values(&own, extra_tags).into_owned()
            }
            Stage::Rewriters => return self.run_rewriters(content),
            Stage::RestoreOperators => stage::restore_operators(&content).into_owned(),
            Stage::Compress => self.minifier.minify(&content),
        };
        Ok(next)
    }

    fn run_rewriters(&self, mut content: String) -> Result<String> {
        for rewriter in &self.rewriters {
            log::trace!("preprocess rewriter '{}'", rewriter.name());
            content = rewriter.rewrite(&content).map_err(|err| match err {
                PreprocessError::InvalidStageArgument { .. } => err,
                other => PreprocessError::stage(rewriter.name(), other.to_string()),
            })?;
        }
        Ok(content)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            enabled: true,
            tags: Vec::new(),
            rewriters: Vec::new(),
            minifier: Box::new(BlankLineMinifier),
        }
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("enabled", &self.enabled)
            .field("tags", &self.tags().collect::<Vec<_>>())
            .field(
                "rewriters",
                &self.rewriters.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`Preprocessor`].
pub struct PreprocessorBuilder {
    enabled: bool,
    tags: Vec<String>,
    rewriters: Vec<Box<dyn Rewrite>>,
    minifier: Box<dyn Minify>,
}

impl Default for PreprocessorBuilder {
    fn default() -> Self {
        Self {
            enabled: true,
            tags: Vec::new(),
            rewriters: Vec::new(),
            minifier: Box::new(BlankLineMinifier),
        }
    }
}

impl PreprocessorBuilder {
    /// Turn the stages on or off. Trimming always happens.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Register one attribute-tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Register attribute-tags from an iterator.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Append a user rewrite stage.
    pub fn rewriter(mut self, rewriter: impl Rewrite + 'static) -> Self {
        self.rewriters.push(Box::new(rewriter));
        self
    }

    /// Replace the final minifier.
    pub fn minifier(mut self, minifier: impl Minify + 'static) -> Self {
        self.minifier = Box::new(minifier);
        self
    }

    /// Compile the tag patterns and build the preprocessor.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::InvalidPattern`] if a tag's pattern does not
    /// compile.
    pub fn build(self) -> Result<Preprocessor> {
        let tags = self
            .tags
            .iter()
            .map(|tag| TagPattern::new(tag))
            .collect::<Result<Vec<_>>>()?;

        Ok(Preprocessor {
            enabled: self.enabled,
            tags,
            rewriters: self.rewriters,
            minifier: self.minifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minify::Passthrough;
    use crate::rewrite::FnRewrite;
    use crate::stage::OPERATOR_PLACEHOLDER;

    #[test]
    fn test_default_runs_all_stages() {
        let pre = Preprocessor::default();
        let out = pre
            .preprocess("\n\n<div\n  class=\"a\">{$a->b}</div>   \n\n\n\n<p>x</p>\n")
            .unwrap();
        assert_eq!(out, "<div class=\"a\">{$a->b}</div>\n\n<p>x</p>");
    }

    #[test]
    fn test_disabled_only_trims() {
        let pre = Preprocessor::builder().enabled(false).build().unwrap();
        let source = "  <div\n  class=\"a\">\n\n\n</div>  ";
        assert_eq!(pre.preprocess(source).unwrap(), source.trim());
        assert!(!pre.is_enabled());
    }

    #[test]
    fn test_tag_values_normalized() {
        let pre = Preprocessor::builder()
            .tags(["n:if", "n:class"])
            .build()
            .unwrap();
        let out = pre
            .preprocess("<p\n  n:if=\"{ $user->active }\"\n  n:class=\"{}\">")
            .unwrap();
        assert_eq!(out, "<p n:if=\"$user->active\" >");
    }

    #[test]
    fn test_rewriters_see_protected_operators() {
        let pre = Preprocessor::builder()
            .rewriter(FnRewrite::new("check", |s: &str| {
                assert!(s.contains(OPERATOR_PLACEHOLDER));
                assert!(!s.contains("->"));
                Ok(s.to_string())
            }))
            .build()
            .unwrap();
        assert_eq!(pre.preprocess("{$a->b}").unwrap(), "{$a->b}");
    }

    #[test]
    fn test_rewriters_run_in_order() {
        let pre = Preprocessor::builder()
            .rewriter(FnRewrite::new("a", |s: &str| Ok(format!("{}a", s))))
            .rewriter(FnRewrite::new("b", |s: &str| Ok(format!("{}b", s))))
            .minifier(Passthrough)
            .build()
            .unwrap();
        assert_eq!(pre.preprocess("x").unwrap(), "xab");
    }

    #[test]
    fn test_rewriter_error_aborts() {
        let pre = Preprocessor::builder()
            .rewriter(FnRewrite::new("ok", |s: &str| Ok(s.to_string())))
            .rewriter(FnRewrite::new("broken", |_: &str| {
                Err(PreprocessError::stage("broken", "refused"))
            }))
            .build()
            .unwrap();
        let err = pre.preprocess("<p>").unwrap_err();
        assert_eq!(err.origin(), "broken");
    }

    #[test]
    fn test_foreign_error_reported_under_rewriter_name() {
        let pre = Preprocessor::builder()
            .rewriter(FnRewrite::new("lookup", |_: &str| {
                Err(PreprocessError::InvalidPattern {
                    tag: "n:x".to_string(),
                    source: regex::Regex::new("[").unwrap_err(),
                })
            }))
            .build()
            .unwrap();
        let err = pre.preprocess("<p>").unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::InvalidStageArgument { ref stage, .. } if stage == "lookup"
        ));
    }

    #[test]
    fn test_custom_minifier_runs_last() {
        let pre = Preprocessor::builder()
            .minifier(|s: &str| s.replace("->", "→"))
            .build()
            .unwrap();
        assert_eq!(pre.preprocess("{$a->b}").unwrap(), "{$a→b}");
    }

    #[test]
    fn test_extra_tags_normalized() {
        let pre = Preprocessor::default();
        let extra = [TagPattern::new("n:foreach").unwrap()];
        let out = pre
            .preprocess_with(r#"<li n:foreach="{ $items as $item }">"#, &extra)
            .unwrap();
        assert_eq!(out, r#"<li n:foreach="$items as $item">"#);
        assert_eq!(pre.tags().count(), 0);
    }

    #[test]
    fn test_tags_listed() {
        let pre = Preprocessor::builder().tag("n:if").build().unwrap();
        assert_eq!(pre.tags().collect::<Vec<_>>(), vec!["n:if"]);
    }
}
