//! Virtual-host resolution
//!
//! This module turns a request's Host header and target into a file on disk,
//! confined to the docroot configured for that host.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// A file accepted for serving, with the stat results the response headers
/// are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    /// Absolute path inside the docroot
    pub path: PathBuf,
    /// File size in bytes, the response's Content-Length
    pub len: u64,
    /// Modification time, the response's Last-Modified
    pub modified: SystemTime,
}

/// Maps virtual-host names to their document roots.
///
/// The mapping is fixed at startup, after validation, and never written
/// again; connection tasks share it through an `Arc` with no locking.
#[derive(Debug, Clone)]
pub struct VirtualHostResolver {
    hosts: HashMap<String, PathBuf>,
}

impl VirtualHostResolver {
    /// Create a resolver over a validated host → docroot mapping.
    pub fn new(hosts: HashMap<String, PathBuf>) -> Self {
        Self { hosts }
    }

    /// Resolve a Host header value and request target to a servable file.
    ///
    /// Returns `None` for everything that ends in a 404: an unknown host, a
    /// path escaping the docroot, a missing file, or a path naming something
    /// other than a regular file. Callers cannot tell these apart, and the
    /// client is not meant to either.
    ///
    /// A target ending in "/" is served as its "index.html".
    pub async fn resolve(&self, host: &str, target: &str) -> Option<ServedFile> {
        let docroot = self.hosts.get(host)?;

        let mut target = target.to_string();
        if target.ends_with('/') {
            target.push_str("index.html");
        }

        // The target's leading slash would make join() discard the docroot
        let path = normalize(&docroot.join(target.trim_start_matches('/')));

        // Containment check is per path component, so a docroot "/www/a"
        // does not claim "/www/abc"
        if !path.starts_with(docroot) {
            return None;
        }

        let meta = tokio::fs::metadata(&path).await.ok()?;
        if !meta.is_file() {
            return None;
        }

        Some(ServedFile {
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            len: meta.len(),
            path,
        })
    }
}

/// Lexically normalizes a path: drops "." segments and resolves ".." against
/// the preceding component, without touching the filesystem. ".." never
/// climbs above the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
