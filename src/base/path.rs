//! Logical addresses of blocks and properties.
//!
//! A [`ScopePath`] names a block by the chain of block names from the
//! document root (`android` / `buildTypes` / `release`). The same scope may be
//! reached by several textual spellings: nested blocks, a dotted block
//! statement (`android.buildTypes { }`) or the prefix of a dotted property
//! statement (`android.buildTypes.release.debuggable true`).

use smol_str::SmolStr;
use std::fmt;

/// Path of a block from the document root. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopePath(Vec<SmolStr>);

impl ScopePath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path (`"android.buildTypes"`). Empty segments are dropped.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SmolStr::new)
                .collect(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, i.e. the block's own name.
    pub fn name(&self) -> Option<&SmolStr> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<ScopePath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn child(&self, name: impl Into<SmolStr>) -> ScopePath {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn join(&self, other: &ScopePath) -> ScopePath {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Whether `self` equals `prefix` or lies below it.
    pub fn starts_with(&self, prefix: &ScopePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Segments of `self` below `prefix`, if `prefix` is an ancestor-or-self.
    pub fn strip_prefix(&self, prefix: &ScopePath) -> Option<&[SmolStr]> {
        self.0.strip_prefix(prefix.0.as_slice())
    }

    /// All ancestors from the root down to and including `self`.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = ScopePath> + '_ {
        (0..=self.0.len()).map(move |n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for ScopePath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

/// A logical property: a name inside a block scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyPath {
    pub scope: ScopePath,
    pub name: SmolStr,
}

impl PropertyPath {
    pub fn new(scope: ScopePath, name: impl Into<SmolStr>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// Parse a dotted path whose last segment is the property name
    /// (`"android.defaultConfig.applicationId"`).
    pub fn parse(dotted: &str) -> Option<Self> {
        let mut scope = ScopePath::parse(dotted);
        let name = scope.0.pop()?;
        Some(Self { scope, name })
    }

    /// The scope that holds the entries of this property when it is a map
    /// written as dotted entries (`manifestPlaceholders.key "v"`).
    pub fn as_scope(&self) -> ScopePath {
        self.scope.child(self.name.clone())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_root() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.scope, self.name)
        }
    }
}
