//! Routing and deployment emission
//!
//! Turns a finished run into the files a deployment needs. Everything is
//! rendered in memory first; [`Deployment::write`] checks the asset set
//! before touching the output directory so a failing run writes nothing.

mod compose;
mod nginx;

use std::fs;
use std::path::Path;

use crate::build::FinishedBuild;
use crate::config::SiteConfig;
use crate::error::{CompileError, Result};
use crate::plan::PLAN_FILE_NAME;

pub use compose::{render_compose, render_dockerfile};
pub use nginx::render as render_nginx;

pub const NGINX_FILE_NAME: &str = "interactive-widgets-nginx.conf";
pub const DOCKERFILE_NAME: &str = "Dockerfile";
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yaml";
/// Directory under the output root served by the front end
pub const STATIC_DIR: &str = "static";

/// Rendered deployment files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Absent when no page has widgets
    pub backend_plan: Option<String>,
    pub nginx_conf: String,
    pub dockerfile: String,
    pub compose: String,
}

#[derive(Debug)]
pub struct Deployment<'a> {
    config: &'a SiteConfig,
    finished: FinishedBuild,
}

impl<'a> Deployment<'a> {
    pub fn new(config: &'a SiteConfig, finished: FinishedBuild) -> Self {
        Self { config, finished }
    }

    pub fn finished(&self) -> &FinishedBuild {
        &self.finished
    }

    pub fn render(&self) -> Result<Artifacts> {
        let plan = &self.finished.plan;
        let backend_plan = if plan.has_rooms() {
            Some(plan.to_json()?)
        } else {
            None
        };
        Ok(Artifacts {
            backend_plan,
            nginx_conf: render_nginx(plan, self.config),
            dockerfile: render_dockerfile(),
            compose: render_compose(plan, self.config)?,
        })
    }

    /// Write every artifact under `out_dir` and copy the assets from
    /// `asset_root` into `out_dir/static`.
    pub fn write(&self, out_dir: &Path, asset_root: &Path) -> Result<()> {
        self.finished.assets.validate(asset_root)?;
        let artifacts = self.render()?;

        fs::create_dir_all(out_dir).map_err(|e| CompileError::io(out_dir, e))?;
        let plan_path = out_dir.join(PLAN_FILE_NAME);
        match &artifacts.backend_plan {
            Some(json) => write_file(&plan_path, json)?,
            None if plan_path.exists() => {
                fs::remove_file(&plan_path).map_err(|e| CompileError::io(&plan_path, e))?;
                tracing::debug!("Removed stale {}", plan_path.display());
            }
            None => {}
        }
        write_file(&out_dir.join(NGINX_FILE_NAME), &artifacts.nginx_conf)?;
        write_file(&out_dir.join(DOCKERFILE_NAME), &artifacts.dockerfile)?;
        write_file(&out_dir.join(COMPOSE_FILE_NAME), &artifacts.compose)?;

        let static_dir = out_dir.join(STATIC_DIR);
        self.finished.assets.copy_into(asset_root, &static_dir)?;

        tracing::info!(
            "Wrote deployment to {} ({} room(s), {} asset(s))",
            out_dir.display(),
            self.finished.plan.pages.len(),
            self.finished.assets.len()
        );
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| CompileError::io(path, e))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
