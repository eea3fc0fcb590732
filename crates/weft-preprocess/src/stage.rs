//! The built-in text stages and their fixed order.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{PreprocessError, Result};

/// Placeholder standing in for `->` between protect and restore.
pub const OPERATOR_PLACEHOLDER: &str = "%%OBJECT_OPERATOR%%";

/// Inserted into placeholder-like text already present in the source, so that
/// restore only turns protected operators back into `->`.
const ESCAPE: char = '\u{E000}';

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<\s*[a-zA-Z][:a-zA-Z0-9]*\s+(?:"[^"]*"|'[^']*'|->|[^>"'])*>"#)
        .expect("opening tag pattern")
});

static OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"->(\w)").expect("operator pattern"));

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)%%OBJECT_OPERATOR%%").expect("placeholder pattern"));

static ESCAPABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\x{E000}|%%OBJECT_OPERATOR").expect("escapable pattern")
});

static ESCAPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}\x{E000}?").expect("escaped pattern"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// One step of [`Preprocessor::preprocess`](crate::Preprocessor::preprocess).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    InlineTags,
    ProtectOperators,
    NormalizeTagValues,
    Rewriters,
    RestoreOperators,
    Compress,
}

impl Stage {
    /// Every stage, in run order.
    pub const ORDER: [Stage; 6] = [
        Stage::InlineTags,
        Stage::ProtectOperators,
        Stage::NormalizeTagValues,
        Stage::Rewriters,
        Stage::RestoreOperators,
        Stage::Compress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::InlineTags => "inline-tags",
            Stage::ProtectOperators => "protect-operators",
            Stage::NormalizeTagValues => "normalize-tag-values",
            Stage::Rewriters => "rewriters",
            Stage::RestoreOperators => "restore-operators",
            Stage::Compress => "compress",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Puts every opening tag that spans several lines on a single line.
///
/// Whitespace runs inside such a tag collapse to one space. Tags written on
/// one line are returned untouched, including their spacing. A `->` inside
/// the tag, or a `>` inside a quoted attribute value, does not end it.
///
/// ```
/// use weft_preprocess::stage::inline_tags;
///
/// let source = "<ui:card\n    title=\"x\"\n    wide>";
/// assert_eq!(inline_tags(source), "<ui:card title=\"x\" wide>");
/// ```
pub fn inline_tags(source: &str) -> Cow<'_, str> {
    OPENING_TAG.replace_all(source, |caps: &Captures| {
        let tag = &caps[0];
        if tag.contains(['\n', '\r']) {
            WHITESPACE_RUN.replace_all(tag, " ").into_owned()
        } else {
            tag.to_string()
        }
    })
}

/// Replaces each `->` followed by a word character with [`OPERATOR_PLACEHOLDER`].
///
/// Placeholder text already written in the source is escaped first, so
/// [`restore_operators`] gives back the exact input.
pub fn protect_operators(source: &str) -> Cow<'_, str> {
    let escaped = ESCAPABLE.replace_all(source, |caps: &Captures| {
        let found = &caps[0];
        if found.starts_with(ESCAPE) {
            format!("{}{}", ESCAPE, ESCAPE)
        } else {
            format!("%{}{}", ESCAPE, &found[1..])
        }
    });

    let protected = match OPERATOR.replace_all(&escaped, |caps: &Captures| {
        format!("{}{}", OPERATOR_PLACEHOLDER, &caps[1])
    }) {
        Cow::Borrowed(_) => None,
        Cow::Owned(protected) => Some(protected),
    };
    protected.map_or(escaped, Cow::Owned)
}

/// Turns every placeholder, in any letter case, back into `->`, then undoes
/// the escaping applied by [`protect_operators`].
pub fn restore_operators(source: &str) -> Cow<'_, str> {
    let restored = PLACEHOLDER.replace_all(source, "->");

    let unescaped = match ESCAPED.replace_all(&restored, |caps: &Captures| {
        if caps[0].len() > ESCAPE.len_utf8() {
            ESCAPE.to_string()
        } else {
            String::new()
        }
    }) {
        Cow::Borrowed(_) => None,
        Cow::Owned(unescaped) => Some(unescaped),
    };
    unescaped.map_or(restored, Cow::Owned)
}

/// Compiled `tag="value"` matcher for one attribute-tag.
#[derive(Debug, Clone)]
pub struct TagPattern {
    tag: String,
    regex: Regex,
}

impl TagPattern {
    /// Compiles the matcher for `tag`.
    ///
    /// The tag name matches case-sensitively and only at the start of a word.
    /// Whitespace may surround the `=`. The value is matched non-greedily and
    /// may span lines.
    pub fn new(tag: &str) -> Result<Self> {
        let pattern = format!(r#"(?s)(^|[^\w:.-]){}\s*=\s*"(.*?)""#, regex::escape(tag));
        let regex = Regex::new(&pattern).map_err(|source| PreprocessError::InvalidPattern {
            tag: tag.to_string(),
            source,
        })?;
        Ok(Self {
            tag: tag.to_string(),
            regex,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Rewrites every occurrence of this tag in `source`.
    ///
    /// Braces and surrounding whitespace are trimmed from the value and
    /// interior whitespace runs collapse to one space. An empty value removes
    /// the attribute.
    pub fn apply<'s>(&self, source: &'s str) -> Cow<'s, str> {
        self.regex.replace_all(source, |caps: &Captures| {
            let lead = &caps[1];
            let value = caps[2].trim_matches(|c: char| c.is_whitespace() || c == '{' || c == '}');
            let value = WHITESPACE_RUN.replace_all(value, " ");
            if value.is_empty() {
                lead.to_string()
            } else {
                format!("{}{}=\"{}\"", lead, self.tag, value)
            }
        })
    }
}

/// Applies every tag pattern in order. An empty list returns the input.
pub fn normalize_tag_values<'s>(source: &'s str, patterns: &[TagPattern]) -> Cow<'s, str> {
    let mut current = Cow::Borrowed(source);
    for pattern in patterns {
        let rewritten = match pattern.apply(&current) {
            Cow::Borrowed(_) => None,
            Cow::Owned(rewritten) => Some(rewritten),
        };
        if let Some(rewritten) = rewritten {
            current = Cow::Owned(rewritten);
        }
    }
    current
}
