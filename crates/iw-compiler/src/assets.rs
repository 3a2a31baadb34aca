//! Static asset set
//!
//! Paths (relative to an asset root) of the client-side files and
//! directories the compiled pages reference.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{CompileError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAssetSet {
    entries: BTreeSet<String>,
}

impl StaticAssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.entries.insert(path.into())
    }

    pub fn union(&mut self, other: &StaticAssetSet) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail with `UnknownAsset` on the first entry missing under `root`
    pub fn validate(&self, root: &Path) -> Result<()> {
        for entry in &self.entries {
            let path = root.join(entry);
            if !path.exists() {
                return Err(CompileError::UnknownAsset { path });
            }
        }
        Ok(())
    }

    /// Copy every entry from `root` into `dest`, keeping relative paths.
    /// Files are copied; directories are copied recursively.
    pub fn copy_into(&self, root: &Path, dest: &Path) -> Result<()> {
        for entry in &self.entries {
            let source = root.join(entry);
            let target = dest.join(entry);
            if source.is_dir() {
                copy_dir_recursive(&source, &target)?;
            } else {
                copy_file(&source, &target)?;
            }
            tracing::debug!("Copied asset {}", entry);
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for StaticAssetSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for StaticAssetSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(Into::into));
    }
}

/// Copy one file, creating parent directories as needed
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CompileError::io(parent, e))?;
    }
    fs::copy(source, target).map_err(|e| CompileError::io(source, e))?;
    Ok(())
}

/// Copy a directory tree, merging into an existing target
pub fn copy_dir_recursive(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| CompileError::io(target, e))?;
    let entries = fs::read_dir(source).map_err(|e| CompileError::io(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::io(source, e))?;
        let path = entry.path();
        let destination = target.join(entry.file_name());
        if path.is_dir() {
            copy_dir_recursive(&path, &destination)?;
        } else {
            copy_file(&path, &destination)?;
        }
    }
    Ok(())
}
