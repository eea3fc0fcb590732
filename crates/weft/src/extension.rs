//! Installed extensions and the tags they advertise.

/// A template-language extension.
///
/// Only the advertised tag names matter here. Tag handlers live with the
/// external parser and are never invoked by this crate.
pub trait Extension: Send + Sync {
    /// Unique name; a second extension with the same name is ignored.
    fn name(&self) -> &str;

    /// Tag names this extension handles, attribute-tags (`n:...`) included.
    fn tags(&self) -> Vec<String>;
}

/// An extension defined by a name and a fixed tag list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticExtension {
    name: String,
    tags: Vec<String>,
}

impl StaticExtension {
    pub fn new<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl Extension for StaticExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }
}

/// Ordered set of extensions, unique by name.
#[derive(Default)]
pub struct ExtensionSet {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `extension` unless one with the same name is already installed.
    ///
    /// Returns whether the extension was added.
    pub fn add(&mut self, extension: impl Extension + 'static) -> bool {
        if self.contains(extension.name()) {
            log::warn!(
                "extension '{}' is already installed, ignoring duplicate",
                extension.name()
            );
            return false;
        }
        self.extensions.push(Box::new(extension));
        true
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, extension: impl Extension + 'static) -> Self {
        self.add(extension);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext.name() == name)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extension> {
        self.extensions.iter().map(|ext| ext.as_ref())
    }

    /// Extension names, in installation order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|ext| ext.name()).collect()
    }
}

impl std::fmt::Debug for ExtensionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionSet")
            .field("extensions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_ignored() {
        let mut set = ExtensionSet::new();
        assert!(set.add(StaticExtension::new("forms", ["n:field"])));
        assert!(!set.add(StaticExtension::new("forms", ["n:other"])));

        assert_eq!(set.len(), 1);
        let tags: Vec<String> = set.iter().flat_map(|ext| ext.tags()).collect();
        assert_eq!(tags, vec!["n:field"]);
    }

    #[test]
    fn test_installation_order_kept() {
        let set = ExtensionSet::new()
            .with(StaticExtension::new("b", Vec::<String>::new()))
            .with(StaticExtension::new("a", Vec::<String>::new()));
        assert_eq!(set.names(), vec!["b", "a"]);
        assert!(set.contains("a"));
        assert!(!set.is_empty());
    }
}
