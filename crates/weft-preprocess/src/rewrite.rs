//! User-supplied text rewrite stages.

use crate::error::Result;

/// A whole-string rewrite registered on a [`Preprocessor`](crate::Preprocessor).
///
/// Rewriters run after the built-in normalization stages and before protected
/// operators are restored, in registration order. Each receives the full
/// output of the previous one.
pub trait Rewrite: Send + Sync {
    /// Name reported in logs and in [`PreprocessError`](crate::PreprocessError)s.
    fn name(&self) -> &str;

    fn rewrite(&self, source: &str) -> Result<String>;
}

/// Adapts a closure into a named [`Rewrite`].
///
/// ```
/// use weft_preprocess::{FnRewrite, Rewrite};
///
/// let shout = FnRewrite::new("shout", |s: &str| Ok(s.to_uppercase()));
/// assert_eq!(shout.rewrite("hi").unwrap(), "HI");
/// ```
pub struct FnRewrite<F> {
    name: String,
    f: F,
}

impl<F> FnRewrite<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Rewrite for FnRewrite<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn rewrite(&self, source: &str) -> Result<String> {
        (self.f)(source)
    }
}

impl<F> std::fmt::Debug for FnRewrite<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRewrite").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreprocessError;

    #[test]
    fn test_fn_rewrite_name() {
        let stage = FnRewrite::new("noop", |s: &str| Ok(s.to_string()));
        assert_eq!(stage.name(), "noop");
        assert_eq!(format!("{:?}", stage), "FnRewrite { name: \"noop\" }");
    }

    #[test]
    fn test_fn_rewrite_error_passes_through() {
        let stage = FnRewrite::new("strict", |s: &str| {
            if s.contains("<?") {
                Err(PreprocessError::stage("strict", "processing instruction"))
            } else {
                Ok(s.to_string())
            }
        });
        assert!(stage.rewrite("<p>").is_ok());
        assert!(stage.rewrite("<?xml?>").is_err());
    }
}
