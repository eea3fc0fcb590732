//! Priority-ordered template directories.
//!
//! Directories are registered with a [`Priority`] while the application is
//! being set up. The first [`resolve`](TemplateDirectories::resolve) sorts
//! them and locks the set: later additions are ignored with a warning, so
//! every template is resolved against the same search order.
//!
//! # Resolution
//!
//! 1. Names not ending in the template extension are returned unchanged.
//! 2. A name that already points at an existing file under the project root
//!    is returned as is.
//! 3. Directories are tried from highest to lowest priority (ties: the most
//!    recently added first). A name already under a directory is returned as
//!    is; otherwise `directory/name` is returned when it exists.
//! 4. Anything else is returned unchanged.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};

/// Default template file extension, without the dot.
pub const DEFAULT_EXTENSION: &str = "tmpl";

/// Priority of a template directory. Higher priorities are searched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// The number of directories registered so far, so later additions win.
    #[default]
    Default,
    /// Above every explicit priority.
    Maximum,
    Explicit(i64),
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Priority::Explicit(value)
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority::Explicit(i64::from(value))
    }
}

impl From<bool> for Priority {
    /// `true` asks for [`Priority::Maximum`].
    fn from(value: bool) -> Self {
        if value {
            Priority::Maximum
        } else {
            Priority::Default
        }
    }
}

/// A registered directory and its effective priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub path: PathBuf,
    pub priority: i64,
    sequence: u64,
}

#[derive(Debug, Default)]
struct State {
    directories: Vec<Directory>,
    next_sequence: u64,
    locked: bool,
}

impl State {
    fn sort(&mut self) {
        self.directories
            .sort_by(|a, b| (b.priority, b.sequence).cmp(&(a.priority, a.sequence)));
    }
}

/// Template directory search path with a one-time lock.
#[derive(Debug)]
pub struct TemplateDirectories {
    project_root: PathBuf,
    extension: String,
    state: RwLock<State>,
}

impl TemplateDirectories {
    /// Search path for templates belonging to `project_root`.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: PathBuf::from(normalize_path(&project_root.as_ref().to_string_lossy())),
            extension: DEFAULT_EXTENSION.to_string(),
            state: RwLock::new(State::default()),
        }
    }

    /// Sets the template extension (with or without a leading dot).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Registers `path`, replacing any earlier registration of the same path.
    ///
    /// Once locked, the call is ignored and a warning is logged.
    pub fn add(&self, path: impl AsRef<Path>, priority: impl Into<Priority>) {
        if let Err(err) = self.try_add(path, priority) {
            log::warn!("{}", err);
        }
    }

    /// Like [`add`](Self::add) but reports a locked set as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockedRegistryMutation`] once any template has been
    /// resolved.
    pub fn try_add(&self, path: impl AsRef<Path>, priority: impl Into<Priority>) -> Result<()> {
        let path = PathBuf::from(normalize_path(&path.as_ref().to_string_lossy()));
        let mut state = self.write();
        if state.locked {
            return Err(Error::LockedRegistryMutation { path });
        }

        state.directories.retain(|dir| dir.path != path);
        let priority = match priority.into() {
            Priority::Default => state.directories.len() as i64,
            Priority::Maximum => i64::MAX,
            Priority::Explicit(value) => value,
        };
        let sequence = state.next_sequence;
        state.next_sequence += 1;

        log::debug!("template directory {} (priority {})", path.display(), priority);
        state.directories.push(Directory {
            path,
            priority,
            sequence,
        });
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.read().locked
    }

    /// Registered directories in search order.
    pub fn directories(&self) -> Vec<Directory> {
        let state = self.read();
        let mut snapshot = State {
            directories: state.directories.clone(),
            ..State::default()
        };
        if !state.locked {
            snapshot.sort();
        }
        snapshot.directories
    }

    /// Maps a logical template name to a path. Locks the set on first use.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.lock();

        if !self.is_template(name) {
            return PathBuf::from(name);
        }

        let template = PathBuf::from(normalize_path(name));
        if template.starts_with(&self.project_root) && template.exists() {
            log::debug!("resolved '{}' inside project root", name);
            return template;
        }

        for directory in &self.read().directories {
            if template.starts_with(&directory.path) && directory.path.exists() {
                return template;
            }
            let candidate = directory.path.join(&template);
            if candidate.exists() {
                log::debug!("resolved '{}' to {}", name, candidate.display());
                return candidate;
            }
        }

        log::debug!("'{}' not found in any template directory", name);
        PathBuf::from(name)
    }

    /// Resolves `name` relative to the template that refers to it.
    ///
    /// Names containing a path separator or starting with a scheme
    /// (`file:`, `app:`...) are returned unchanged.
    pub fn referred_name(&self, name: &str, referring: &str) -> String {
        if name.contains(['/', '\\']) || has_scheme(name) {
            return name.to_string();
        }
        normalize_path(&format!("{}/../{}", referring, name))
    }

    fn is_template(&self, name: &str) -> bool {
        name.strip_suffix(self.extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }

    fn lock(&self) {
        if self.read().locked {
            return;
        }
        let mut state = self.write();
        if !state.locked {
            state.sort();
            state.locked = true;
            log::debug!(
                "template directories locked with {} entries",
                state.directories.len()
            );
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lexically normalizes a path: `\` becomes `/`, `.` segments and empty
/// segments are dropped, and `..` removes the previous segment when there is
/// one to remove. The leading `/` of an absolute path is kept.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." if segments.last().is_some_and(|last| *last != "..") => {
                segments.pop();
            }
            ".." if absolute && segments.is_empty() => {}
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// True for names like `app:layout.tmpl` or `https://...`.
fn has_scheme(name: &str) -> bool {
    let Some((scheme, _)) = name.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}
