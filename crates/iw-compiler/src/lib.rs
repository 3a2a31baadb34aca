//! iw-compiler - interactive widgets compiler
//!
//! Compiles rendered documentation pages that contain `x-*` widget markup
//! into self-contained interactive pages, plus everything a deployment
//! needs to run them: the backend execution plan, the reverse-proxy
//! configuration, packaging descriptors and the client-side assets.
//!
//! A run goes through a [`SiteBuild`]:
//!
//! ```no_run
//! use iw_compiler::{Deployment, SiteBuild, SiteConfig};
//! # fn main() -> iw_compiler::Result<()> {
//! let config = SiteConfig::default();
//! let mut build = SiteBuild::new(config.clone());
//! let html = build.compile_page("guide/", "<p><x-terminal image=\"alpine\" command=\"sh\"></x-terminal></p>")?;
//! let deployment = Deployment::new(&config, build.finish());
//! deployment.write("deploy".as_ref(), "assets".as_ref())?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod build;
pub mod config;
pub mod emit;
pub mod error;
pub mod identity;
pub mod markup;
pub mod page;
pub mod plan;
pub mod resolve;
pub mod script;
pub mod session;
pub mod transform;
pub mod widget;

pub use assets::StaticAssetSet;
pub use build::{FinishedBuild, SiteBuild};
pub use config::{LoggingLevel, SiteConfig};
pub use emit::{Artifacts, Deployment};
pub use error::{CompileError, Result};
pub use markup::{WidgetKind, WidgetMarkup};
pub use page::PageUrl;
pub use plan::{ExecutionPlan, ExecutorEntry, RoomPlan};
pub use resolve::ResourceLimits;
pub use transform::{PageCompilationResult, compile_document};
pub use widget::{Lifecycle, Variant, WidgetDescriptor};
