//! Remote path normalization.
//!
//! SMB share paths are handed to the protocol layer as relative,
//! slash-separated strings. Users type them in either Windows or POSIX form,
//! so [`RemotePath::new`] folds both into one canonical shape:
//!
//! - `\` becomes `/`
//! - empty, `.` and `..` segments are resolved as if rooted at the share,
//!   so `..` can never climb above the share root
//! - no leading or trailing slash; the root is `.`

use std::fmt;

const ROOT: &str = ".";

/// A normalized path relative to a share root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RemotePath {
    path: String,
}

impl RemotePath {
    /// Normalizes `path` into a share-relative path.
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize(path),
        }
    }

    /// The share root.
    pub fn root() -> Self {
        Self {
            path: ROOT.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT
    }

    /// Returns the containing directory; top-level entries yield the root.
    pub fn parent(&self) -> Self {
        match self.path.rfind('/') {
            Some(idx) => Self {
                path: self.path[..idx].to_string(),
            },
            None => Self::root(),
        }
    }

    /// Appends `child` (itself normalized) below this path.
    pub fn join(&self, child: &str) -> Self {
        if self.is_root() {
            Self::new(child)
        } else {
            Self::new(&format!("{}/{}", self.path, child.replace('\\', "/")))
        }
    }
}

impl Default for RemotePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for RemotePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Canonicalizes a remote path string. Total: every input maps to a path.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        ROOT.to_string()
    } else {
        segments.join("/")
    }
}
