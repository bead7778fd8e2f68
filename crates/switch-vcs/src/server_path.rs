//! Server-side item paths (`$/Project/Branch/...`)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root marker of every server path.
pub const ROOT: &str = "$";

/// A normalized version-control server path.
///
/// Always starts with `$`, uses forward slashes and carries no trailing
/// separator, so `$/Product/Main/` and `$\Product\Main` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ServerPath {
    inner: String,
}

impl ServerPath {
    /// Normalize any path-like string into a server path.
    ///
    /// Backslashes become forward slashes, empty segments are dropped and a
    /// missing `$/` root is added.
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().replace('\\', "/");
        let rest = raw.strip_prefix(ROOT).unwrap_or(&raw);

        let segments: Vec<&str> = rest
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let inner = if segments.is_empty() {
            ROOT.to_string()
        } else {
            format!("{}/{}", ROOT, segments.join("/"))
        };
        Self { inner }
    }

    /// The server root `$`.
    pub fn root() -> Self {
        Self {
            inner: ROOT.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner == ROOT
    }

    /// Path relative to the server root, without the leading `$/`.
    ///
    /// Empty for the root itself.
    pub fn relative(&self) -> &str {
        self.inner
            .strip_prefix(ROOT)
            .map(|s| s.trim_start_matches('/'))
            .unwrap_or("")
    }

    /// Path segments below the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative().split('/').filter(|s| !s.is_empty())
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Append one or more segments.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Parent path, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let idx = self.inner.rfind('/')?;
        Some(Self::new(&self.inner[..idx]))
    }

    /// Whether `self` equals `base` or lies below it, on segment boundaries.
    pub fn starts_with(&self, base: &ServerPath) -> bool {
        self.strip_prefix(base).is_some()
    }

    /// The part of `self` below `base`, empty when both are equal.
    pub fn strip_prefix(&self, base: &ServerPath) -> Option<&str> {
        if base.is_root() {
            return Some(self.relative());
        }
        let rest = self.inner.strip_prefix(&base.inner)?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('/')
        }
    }
}

impl fmt::Display for ServerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<String> for ServerPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ServerPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ServerPath> for String {
    fn from(p: ServerPath) -> Self {
        p.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("$/Product/Main", "$/Product/Main")]
    #[case("$/Product/Main/", "$/Product/Main")]
    #[case("$\\Product\\Main", "$/Product/Main")]
    #[case("Product/Main", "$/Product/Main")]
    #[case("$//Product//Main", "$/Product/Main")]
    #[case("$/", "$")]
    #[case("", "$")]
    fn test_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ServerPath::new(input).as_str(), expected);
    }

    #[test]
    fn test_name_and_parent() {
        let path = ServerPath::new("$/Product/Main");
        assert_eq!(path.name(), Some("Main"));
        assert_eq!(path.parent(), Some(ServerPath::new("$/Product")));
        assert_eq!(ServerPath::new("$/Product").parent(), Some(ServerPath::root()));
        assert_eq!(ServerPath::root().parent(), None);
        assert_eq!(ServerPath::root().name(), None);
    }

    #[test]
    fn test_relative() {
        assert_eq!(ServerPath::new("$/Tools/DeployedTools").relative(), "Tools/DeployedTools");
        assert_eq!(ServerPath::root().relative(), "");
    }

    #[test]
    fn test_strip_prefix_respects_segments() {
        let base = ServerPath::new("$/Product/Main");
        assert_eq!(
            ServerPath::new("$/Product/Main/Bundle/a.cs").strip_prefix(&base),
            Some("Bundle/a.cs")
        );
        assert_eq!(ServerPath::new("$/Product/Main").strip_prefix(&base), Some(""));
        assert_eq!(ServerPath::new("$/Product/Mainline").strip_prefix(&base), None);
        assert!(ServerPath::new("$/Other").strip_prefix(&base).is_none());
        assert_eq!(
            ServerPath::new("$/Product").strip_prefix(&ServerPath::root()),
            Some("Product")
        );
    }

    #[test]
    fn test_join() {
        let path = ServerPath::new("$/Product/Modules").join("Imaging/Main");
        assert_eq!(path.as_str(), "$/Product/Modules/Imaging/Main");
        assert_eq!(ServerPath::root().join("Tools").as_str(), "$/Tools");
    }
}
