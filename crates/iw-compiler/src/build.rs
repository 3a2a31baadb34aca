//! Run accumulator
//!
//! A [`SiteBuild`] lives for one full run. Pages are compiled through it
//! one at a time; it folds their widgets into the execution plan and their
//! assets into the asset set. Both are only handed out by
//! [`SiteBuild::finish`], once every page has been seen.

use iw_dom::Document;

use crate::assets::StaticAssetSet;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::page::PageUrl;
use crate::plan::ExecutionPlan;
use crate::transform::{PageCompilationResult, compile_document};

/// Accumulated output of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedBuild {
    pub plan: ExecutionPlan,
    pub assets: StaticAssetSet,
}

#[derive(Debug)]
pub struct SiteBuild {
    config: SiteConfig,
    plan: ExecutionPlan,
    assets: StaticAssetSet,
    pages_compiled: usize,
    interactive_pages: usize,
}

impl SiteBuild {
    pub fn new(config: SiteConfig) -> Self {
        let plan = ExecutionPlan::new(&config);
        Self {
            config,
            plan,
            assets: StaticAssetSet::new(),
            pages_compiled: 0,
            interactive_pages: 0,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Compile one rendered page published under `url`.
    ///
    /// Returns the transformed markup, or `html` unchanged when the page
    /// has no widgets.
    pub fn compile_page(&mut self, url: &str, html: &str) -> Result<String> {
        let page_url = PageUrl::new(url);
        if html.trim().is_empty() {
            tracing::warn!("Page {} is empty", page_url);
        }

        let document = iw_html::parse_with_url(html, &page_url.to_string())?;
        let result = self.compile_document(&page_url, document)?;
        if result.is_interactive() {
            Ok(result.html())
        } else {
            Ok(html.to_string())
        }
    }

    /// Compile an already parsed page
    pub fn compile_document(
        &mut self,
        url: &PageUrl,
        document: Document,
    ) -> Result<PageCompilationResult> {
        let result = compile_document(document, url, &self.config)?;
        self.plan.add_page(&result, &self.config)?;
        self.assets.union(&result.assets);
        self.pages_compiled += 1;

        if result.is_interactive() {
            self.interactive_pages += 1;
            tracing::info!(
                "Compiled {} with {} widget(s) for {} backend",
                url,
                result.widgets.len(),
                self.config.sandbox_context_type
            );
        } else {
            tracing::info!("No widgets in {}, keeping it static", url);
        }
        Ok(result)
    }

    pub fn pages_compiled(&self) -> usize {
        self.pages_compiled
    }

    pub fn interactive_pages(&self) -> usize {
        self.interactive_pages
    }

    /// End the run and release the plan and assets
    pub fn finish(self) -> FinishedBuild {
        tracing::debug!(
            "Finished run: {} page(s), {} room(s), {} asset(s)",
            self.pages_compiled,
            self.plan.pages.len(),
            self.assets.len()
        );
        FinishedBuild {
            plan: self.plan,
            assets: self.assets,
        }
    }
}
