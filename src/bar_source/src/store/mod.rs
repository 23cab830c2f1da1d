//! Object store abstraction for raw bar files.
//!
//! The pipeline only needs two operations from storage: enumerate the objects that
//! match a pattern, and fetch one object's bytes. Remote blob stores implement
//! [`ObjectStore`] the same way [`local::LocalFsStore`] does for a directory tree.

pub mod local;

use crate::errors::SourceError;

/// Read-only view over a hierarchical object namespace.
pub trait ObjectStore {
    /// Objects matching `pattern`, in ascending path order.
    ///
    /// A pattern is `<dir>/<file-glob>`; the glob applies to the final path
    /// component and understands `*` and `?`.
    fn list(&self, pattern: &str) -> Result<Vec<String>, SourceError>;

    /// Fetch the full contents of one object. Missing objects are
    /// [`SourceError::NotFound`].
    fn open(&self, path: &str) -> Result<Vec<u8>, SourceError>;
}

/// Match `name` against a glob made of literals, `*` (any run), and `?` (any one char).
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();

    let (mut pi, mut ni) = (0usize, 0usize);
    // Position of the last `*` seen and the name index it was matched against.
    let mut backtrack: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == '*' {
            backtrack = Some((pi, ni));
            pi += 1;
        } else if let Some((star, matched)) = backtrack {
            pi = star + 1;
            ni = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}
