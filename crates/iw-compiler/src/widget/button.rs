//! `<x-button>`: runs a command to completion each time it is pressed

use super::{Lifecycle, Sandbox, Variant, WidgetDescriptor, split_command};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::WidgetMarkup;
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Command as written, shown by the browser-side widget
    pub command: String,
    pub label: String,
}

impl Button {
    pub const CLASS: &'static str = "ButtonWidget";
    pub const STATIC_ASSETS: &'static [&'static str] = &["ButtonWidget.js", "Widget.js"];

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![
            JsArgument::string(&self.command),
            JsArgument::string(&self.label),
        ]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let command = markup.require("command")?;
    let image = markup.require("image")?;
    let label = markup.require("label")?;
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(markup, &[command, image, label])?;

    let sandbox = Sandbox {
        lifecycle: Lifecycle::Once,
        image: image.to_string(),
        command: split_command(markup, "command", command)?,
        working_directory: resolve::working_directory(markup),
        enable_tty: false,
    };
    let variant = Variant::Button(Button {
        command: command.to_string(),
        label: label.to_string(),
    });
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
