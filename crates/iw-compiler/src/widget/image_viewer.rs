//! `<x-image-viewer>`: shows an image file from the sandbox, refreshed by
//! the file monitor whenever it changes

use super::{Lifecycle, Sandbox, Variant, WidgetDescriptor, monitor_command};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::WidgetMarkup;
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageViewer {
    pub file: String,
    pub mime: String,
}

impl ImageViewer {
    pub const CLASS: &'static str = "ImageViewerWidget";
    pub const STATIC_ASSETS: &'static [&'static str] = &["ImageViewerWidget.js", "Widget.js"];

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![JsArgument::string(&self.file), JsArgument::string(&self.mime)]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let file = markup.require("file")?;
    let mime = markup.require("mime")?;
    let success = resolve::success_timeout(markup, config)?;
    let failure = resolve::failure_timeout(markup, config)?;
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(markup, &[file, mime, success.as_str(), failure.as_str()])?;

    let sandbox = Sandbox {
        lifecycle: Lifecycle::Always,
        image: config.monitor_image.clone(),
        command: monitor_command(config, file, success, failure),
        working_directory: None,
        enable_tty: false,
    };
    let variant = Variant::ImageViewer(ImageViewer {
        file: file.to_string(),
        mime: mime.to_string(),
    });
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
