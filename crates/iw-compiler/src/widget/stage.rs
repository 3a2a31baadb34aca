//! `<x-prologue>` and `<x-epilogue>`: commands bracketing a room's
//! lifetime. A prologue runs before the room is ready and readiness waits
//! for it; an epilogue runs after the other widgets finish.
//!
//! With the `hidden` flag the widget has no visible container.

use super::{Lifecycle, Sandbox, Variant, WidgetDescriptor, split_command};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::{WidgetKind, WidgetMarkup};
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub command: String,
    pub hidden: bool,
}

impl Stage {
    pub const PROLOGUE_CLASS: &'static str = "PrologueWidget";
    pub const EPILOGUE_CLASS: &'static str = "EpilogueWidget";
    pub const PROLOGUE_ASSETS: &'static [&'static str] = &["PrologueWidget.js", "Widget.js"];
    pub const EPILOGUE_ASSETS: &'static [&'static str] = &["EpilogueWidget.js", "Widget.js"];

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![JsArgument::string(&self.command), JsArgument::Bool(self.hidden)]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let command = markup.require("command")?;
    let image = markup.require("image")?;
    let working_directory = resolve::working_directory(markup);
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(
        markup,
        &[command, image, working_directory.as_deref().unwrap_or_default()],
    )?;

    let stage = Stage {
        command: command.to_string(),
        hidden: markup.has_flag("hidden"),
    };
    let (lifecycle, variant) = match markup.kind {
        WidgetKind::Epilogue => (Lifecycle::Epilogue, Variant::Epilogue(stage)),
        _ => (Lifecycle::Prologue, Variant::Prologue(stage)),
    };

    let sandbox = Sandbox {
        lifecycle,
        image: image.to_string(),
        command: split_command(markup, "command", command)?,
        working_directory,
        enable_tty: false,
    };
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
