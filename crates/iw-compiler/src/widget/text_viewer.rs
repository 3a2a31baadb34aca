//! `<x-text-viewer>`: read-only view of a file in the sandbox

use super::{Lifecycle, Sandbox, Variant, WidgetDescriptor, monitor_command};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::WidgetMarkup;
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct TextViewer {
    pub file: String,
    pub mode: Option<String>,
}

impl TextViewer {
    pub const CLASS: &'static str = "TextViewerWidget";
    pub const STATIC_ASSETS: &'static [&'static str] = &["TextViewerWidget.js", "Widget.js"];

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![
            JsArgument::string(&self.file),
            JsArgument::optional(self.mode.as_deref()),
        ]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let file = markup.require("file")?;
    let success = resolve::success_timeout(markup, config)?;
    let failure = resolve::failure_timeout(markup, config)?;
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(markup, &[file, success.as_str(), failure.as_str()])?;

    let sandbox = Sandbox {
        lifecycle: Lifecycle::Always,
        image: config.monitor_image.clone(),
        command: monitor_command(config, file, success, failure),
        working_directory: None,
        enable_tty: false,
    };
    let variant = Variant::TextViewer(TextViewer {
        file: file.to_string(),
        mode: markup.attribute("mode").map(str::to_string),
    });
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
