//! iw-build - publish a rendered site with interactive widgets
//!
//! Every page is compiled in memory first. Output is only written once the
//! whole site compiled and every static asset was found.

pub mod site;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use iw_compiler::emit::STATIC_DIR;
use iw_compiler::{Deployment, SiteBuild, SiteConfig};

use crate::site::SiteFile;

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Rendered site directory
    pub site: PathBuf,
    /// Deployment directory to create
    pub out: PathBuf,
    /// Root of the client-side widget assets
    pub assets: PathBuf,
    /// TOML site configuration; defaults when absent
    pub config: Option<PathBuf>,
}

/// What a run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub interactive_pages: usize,
    pub rooms: usize,
    pub assets: usize,
}

pub fn build_site(options: &BuildOptions) -> Result<BuildSummary> {
    let config = match &options.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SiteConfig::default(),
    };

    let files = site::discover(&options.site)?;
    let mut build = SiteBuild::new(config.clone());
    let mut pages = Vec::new();
    let mut others = Vec::new();

    for file in files {
        match file {
            SiteFile::Page { path, url } => {
                let source = options.site.join(&path);
                let html = fs::read_to_string(&source)
                    .with_context(|| format!("failed to read {}", source.display()))?;
                let compiled = build
                    .compile_page(&url, &html)
                    .with_context(|| format!("failed to compile {}", path.display()))?;
                pages.push((path, compiled));
            }
            SiteFile::Other { path } => others.push(path),
        }
    }

    let pages_compiled = build.pages_compiled();
    let interactive_pages = build.interactive_pages();
    let deployment = Deployment::new(&config, build.finish());
    let summary = BuildSummary {
        pages: pages_compiled,
        interactive_pages,
        rooms: deployment.finished().plan.pages.len(),
        assets: deployment.finished().assets.len(),
    };

    deployment
        .write(&options.out, &options.assets)
        .context("failed to write deployment")?;

    let static_dir = options.out.join(STATIC_DIR);
    for (path, html) in &pages {
        let target = static_dir.join(path);
        create_parent(&target)?;
        fs::write(&target, html).with_context(|| format!("failed to write {}", target.display()))?;
    }
    for path in &others {
        let source = options.site.join(path);
        let target = static_dir.join(path);
        create_parent(&target)?;
        fs::copy(&source, &target)
            .with_context(|| format!("failed to copy {}", source.display()))?;
    }

    tracing::info!(
        "Published {} page(s), {} interactive, into {}",
        summary.pages,
        summary.interactive_pages,
        options.out.display()
    );
    Ok(summary)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
