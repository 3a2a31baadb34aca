//! Page URLs
//!
//! A page URL is kept as its path segments. The canonical text form is
//! site-rooted with no trailing slash (`guide/intro/` becomes
//! `/guide/intro`, the site root is `/`), which is also the room key
//! in the backend plan.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageUrl {
    segments: Vec<String>,
}

impl PageUrl {
    /// Normalize a page-relative or site-rooted URL
    pub fn new(url: &str) -> Self {
        let segments = url
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Site root (`/`)
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of `target` (site-rooted, e.g. `/Widget.js`) relative to this
    /// page, treating the page URL as a directory.
    pub fn relative(&self, target: &str) -> String {
        let target: Vec<&str> = target
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();

        let common = self
            .segments
            .iter()
            .zip(&target)
            .take_while(|(a, b)| a.as_str() == **b)
            .count();

        let mut parts: Vec<&str> = Vec::with_capacity(self.segments.len() - common + target.len());
        parts.extend(std::iter::repeat_n("..", self.segments.len() - common));
        parts.extend(&target[common..]);

        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }

    /// Location of the room's WebSocket endpoint
    pub fn websocket_path(&self) -> String {
        if self.is_root() {
            "/ws".to_string()
        } else {
            format!("{self}/ws")
        }
    }

    /// Lowercase hex of the canonical text form
    pub fn hex(&self) -> String {
        hex::encode(self.to_string())
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for PageUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}
