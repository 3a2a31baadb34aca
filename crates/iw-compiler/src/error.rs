//! Compiler errors
//!
//! Every variant is fatal: a run either compiles every page or writes
//! nothing. Page-level variants carry enough context (page, widget kind,
//! position) to locate the offending markup.

use std::path::PathBuf;

use crate::markup::WidgetKind;

/// Result alias used throughout the compiler
pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("<{kind}> #{position} on page {page}: missing required attribute `{attribute}`")]
    MissingAttribute {
        kind: WidgetKind,
        page: String,
        position: usize,
        attribute: &'static str,
    },

    #[error(
        "<{kind}> #{position} on page {page}: invalid widget name `{name}` \
         (only lowercase letters, digits and `-` are allowed)"
    )]
    InvalidWidgetName {
        kind: WidgetKind,
        page: String,
        position: usize,
        name: String,
    },

    #[error("<{kind}> #{position} on page {page}: attribute `{attribute}` has invalid value `{value}`")]
    InvalidAttribute {
        kind: WidgetKind,
        page: String,
        position: usize,
        attribute: &'static str,
        value: String,
    },

    #[error("<{kind}> #{position} on page {page}: widget name `{name}` is already used on this page")]
    DuplicateWidgetName {
        kind: WidgetKind,
        page: String,
        position: usize,
        name: String,
    },

    #[error("<{kind}> #{position} on page {page}: widget markup cannot be placed inside <{outer}>")]
    NestedWidget {
        kind: WidgetKind,
        page: String,
        position: usize,
        outer: WidgetKind,
    },

    #[error("static asset `{}` does not exist", path.display())]
    UnknownAsset { path: PathBuf },

    #[error(transparent)]
    Html(#[from] iw_html::HtmlError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize {artifact}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Page URL the error belongs to, if it is page-level
    pub fn page(&self) -> Option<&str> {
        match self {
            Self::MissingAttribute { page, .. }
            | Self::InvalidWidgetName { page, .. }
            | Self::InvalidAttribute { page, .. }
            | Self::DuplicateWidgetName { page, .. }
            | Self::NestedWidget { page, .. } => Some(page),
            _ => None,
        }
    }
}
