//! Rendered site discovery

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;

/// One file of the rendered site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFile {
    /// HTML page with the URL it is published under
    Page { path: PathBuf, url: String },
    /// Anything else, copied as is
    Other { path: PathBuf },
}

impl SiteFile {
    /// Path relative to the site root
    pub fn path(&self) -> &Path {
        match self {
            SiteFile::Page { path, .. } | SiteFile::Other { path } => path,
        }
    }
}

/// Every regular file under `root`, sorted by relative path
pub fn discover(root: &Path) -> Result<Vec<SiteFile>> {
    let root_text = root
        .to_str()
        .with_context(|| format!("site directory {} is not valid UTF-8", root.display()))?;
    let pattern = format!("{}/**/*", Pattern::escape(root_text));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).context("invalid site directory pattern")? {
        let path = entry.context("failed to read site directory")?;
        if !path.is_file() {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} is outside the site", path.display()))?
            .to_path_buf();

        if relative.extension().is_some_and(|ext| ext == "html") {
            let url = page_url(&relative);
            files.push(SiteFile::Page {
                path: relative,
                url,
            });
        } else {
            files.push(SiteFile::Other { path: relative });
        }
    }
    files.sort_by(|a, b| a.path().cmp(b.path()));
    tracing::debug!("Discovered {} file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// URL a page is published under: `a/b/index.html` is `a/b/`, the root
/// `index.html` is the empty URL, anything else keeps its path.
pub fn page_url(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();

    match parts.split_last() {
        Some((last, parents)) if last == "index.html" => {
            if parents.is_empty() {
                String::new()
            } else {
                format!("{}/", parents.join("/"))
            }
        }
        _ => parts.join("/"),
    }
}
